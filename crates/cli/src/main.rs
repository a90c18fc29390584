//! Agrisub CLI - Main entry point

use agrisub_cli::{commands, ReviewContext};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agrisub")]
#[command(about = "Agrisub - subsidy application review and login guard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review one application or a JSON array of applications
    Review {
        /// Application JSON file
        file: PathBuf,
        /// Risk config JSON (defaults built in)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Historical decided cases JSON
        #[arg(long)]
        history: Option<PathBuf>,
        /// Emit verdicts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the risk assessment only
    Score {
        /// Application JSON file
        file: PathBuf,
        /// Risk config JSON (defaults built in)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Report password strength
    Password {
        password: String,
    },

    /// Print the default configuration as JSON
    Config {
        /// Print the login guard config instead of the risk config
        #[arg(long)]
        guard: bool,
    },

    /// Replay a recorded login attempt log through the guard
    LoginReplay {
        /// Attempt log JSON file
        file: PathBuf,
        /// Guard config JSON (defaults built in)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Review {
            file,
            config,
            history,
            json,
        } => {
            let ctx = ReviewContext::new(config.as_deref(), history.as_deref())?;
            commands::review(&ctx, &file, json, &mut out)?;
        }
        Commands::Score { file, config } => {
            let ctx = ReviewContext::new(config.as_deref(), None)?;
            commands::score(&ctx, &file, &mut out)?;
        }
        Commands::Password { password } => {
            commands::password(&password, &mut out)?;
        }
        Commands::Config { guard } => {
            commands::config(guard, &mut out)?;
        }
        Commands::LoginReplay { file, config } => {
            commands::login_replay(&file, config.as_deref(), &mut out)?;
        }
    }

    Ok(())
}
