//! Application - a subsidy application as seen by the review engines
//!
//! Applications are owned by the surrounding system; the engines only read
//! them. Everything required is validated here, at construction or
//! deserialization, so scoring never has to fail.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

use crate::amount::Amount;
use crate::error::{CoreError, CoreResult};

/// Subsidy category
///
/// Known categories are pre-defined. Any other code is kept as
/// `Unrecognized` instead of being rejected: unknown categories simply have
/// no amount bounds configured.
///
/// # Examples
/// ```
/// use agrisub_core::ApplicationType;
///
/// let t: ApplicationType = "Medical".parse().unwrap();
/// assert_eq!(t, ApplicationType::Medical);
///
/// let custom: ApplicationType = "irrigation".parse().unwrap();
/// assert!(matches!(custom, ApplicationType::Unrecognized(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApplicationType {
    /// Tuition and school fees
    Education,
    /// Hospital and treatment costs
    Medical,
    /// Housing repair or construction
    Housing,
    /// Farm business start-up or expansion
    Business,
    /// Catch-all category offered by the application form
    Other,
    /// A category code this build does not know about
    Unrecognized(String),
}

impl ApplicationType {
    /// All categories offered by the application form
    pub const KNOWN: [ApplicationType; 5] = [
        ApplicationType::Education,
        ApplicationType::Medical,
        ApplicationType::Housing,
        ApplicationType::Business,
        ApplicationType::Other,
    ];

    /// Returns the category code as a string slice
    pub fn code(&self) -> &str {
        match self {
            ApplicationType::Education => "education",
            ApplicationType::Medical => "medical",
            ApplicationType::Housing => "housing",
            ApplicationType::Business => "business",
            ApplicationType::Other => "other",
            ApplicationType::Unrecognized(s) => s.as_str(),
        }
    }

    /// Returns true if this category is one of the form's categories
    pub fn is_known(&self) -> bool {
        !matches!(self, ApplicationType::Unrecognized(_))
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ApplicationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        if s.is_empty() {
            return Err(CoreError::invalid("type", "empty application type"));
        }

        Ok(match s.as_str() {
            "education" => ApplicationType::Education,
            "medical" => ApplicationType::Medical,
            "housing" => ApplicationType::Housing,
            "business" => ApplicationType::Business,
            "other" => ApplicationType::Other,
            _ => ApplicationType::Unrecognized(s),
        })
    }
}

impl TryFrom<String> for ApplicationType {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ApplicationType> for String {
    fn from(t: ApplicationType) -> Self {
        t.code().to_string()
    }
}

/// Reviewer-assigned urgency
///
/// Parsed case-insensitively from strings and JSON alike.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(try_from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl TryFrom<String> for Priority {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.trim()
            .parse()
            .map_err(|_| CoreError::invalid("priority", format!("unknown priority '{}'", s)))
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.to_string()
    }
}

/// A subsidy application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Opaque identifier
    pub id: String,

    /// Applicant (family/user account) that submitted the application
    #[serde(default)]
    pub applicant_id: String,

    /// Subsidy category
    #[serde(rename = "type")]
    pub application_type: ApplicationType,

    /// Requested amount
    pub amount: Amount,

    #[serde(default)]
    pub priority: Priority,

    /// Attachment filenames in submission order
    #[serde(default)]
    pub attachments: Vec<String>,

    /// Applications of the same type already approved or pending for this
    /// applicant in the current period, as counted by the caller
    #[serde(default)]
    pub same_type_count_this_period: u32,

    /// Optional form fields that have no dedicated column
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl Application {
    /// Create a new application with a generated id
    ///
    /// Returns `CoreError::InvalidArgument` if the amount is not positive.
    pub fn new(
        applicant_id: impl Into<String>,
        application_type: ApplicationType,
        amount: Decimal,
        priority: Priority,
    ) -> CoreResult<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            applicant_id: applicant_id.into(),
            application_type,
            amount: Amount::new(amount)?,
            priority,
            attachments: Vec::new(),
            same_type_count_this_period: 0,
            details: BTreeMap::new(),
        })
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add an attachment filename
    pub fn with_attachment(mut self, filename: impl Into<String>) -> Self {
        self.attachments.push(filename.into());
        self
    }

    /// Add several attachment filenames
    pub fn with_attachments<I, S>(mut self, filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachments.extend(filenames.into_iter().map(Into::into));
        self
    }

    /// Set the caller-supplied count of same-type applications this period
    pub fn with_same_type_count(mut self, count: u32) -> Self {
        self.same_type_count_this_period = count;
        self
    }

    /// Set an optional form field
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Look up an optional form field
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}
