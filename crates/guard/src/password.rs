//! Additive password strength scoring

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length before the length bonus applies
pub const MIN_LENGTH: usize = 8;

/// Cap on the length bonus
const MAX_LENGTH_BONUS: i32 = 30;

/// Widely reused passwords, matched case-insensitively as substrings
const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "111111", "admin", "letmein", "welcome", "iloveyou", "abc123",
];

/// Keyboard and alphabet runs, matched case-insensitively as substrings
const KEYBOARD_SEQUENCES: &[&str] = &["qwerty", "asdf", "zxcv", "1234", "abcd"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordLevel {
    Weak,
    Fair,
    Strong,
}

impl fmt::Display for PasswordLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PasswordLevel::Weak => "weak",
            PasswordLevel::Fair => "fair",
            PasswordLevel::Strong => "strong",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStrength {
    /// 0..=100
    pub score: u8,
    /// Suggestions in evaluation order
    pub feedback: Vec<String>,
}

impl PasswordStrength {
    pub fn level(&self) -> PasswordLevel {
        match self.score {
            0..=39 => PasswordLevel::Weak,
            40..=69 => PasswordLevel::Fair,
            _ => PasswordLevel::Strong,
        }
    }
}

/// Score a password and explain what would improve it
pub fn check_password_strength(password: &str) -> PasswordStrength {
    let mut score: i32 = 0;
    let mut feedback = Vec::new();

    let len = password.chars().count();
    if len >= MIN_LENGTH {
        score += (len as i32 * 5).min(MAX_LENGTH_BONUS);
    } else {
        feedback.push(format!("use at least {} characters", MIN_LENGTH));
    }

    let classes: [(fn(char) -> bool, i32, &str); 4] = [
        (char::is_lowercase, 10, "add lowercase letters"),
        (char::is_uppercase, 10, "add uppercase letters"),
        (|c: char| c.is_ascii_digit(), 10, "add digits"),
        (is_symbol, 15, "add special characters"),
    ];
    for (matches, bonus, hint) in classes {
        if password.chars().any(matches) {
            score += bonus;
        } else {
            feedback.push(hint.to_string());
        }
    }

    if has_repeated_run(password) {
        score -= 10;
        feedback.push("avoid repeated characters".to_string());
    }

    let lowered = password.to_lowercase();
    for common in COMMON_PASSWORDS.iter().filter(|p| lowered.contains(**p)) {
        score -= 20;
        feedback.push(format!("avoid common passwords like \"{}\"", common));
    }
    for sequence in KEYBOARD_SEQUENCES.iter().filter(|s| lowered.contains(**s)) {
        score -= 15;
        feedback.push(format!("avoid keyboard sequences like \"{}\"", sequence));
    }

    PasswordStrength {
        score: score.clamp(0, 100) as u8,
        feedback,
    }
}

fn is_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

/// Three or more identical characters in a row
fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}
