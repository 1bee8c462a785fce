// claimdesk - review AI-extracted claims against collected posts

mod claims;
mod exit_codes;
mod posts;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimdesk_config::{DataPaths, Settings};
use claimdesk_io::{load_claims, FileBackend, SourceError};
use claimdesk_review::posts::PostSort;
use claimdesk_review::{DecisionStore, ReviewConfig, ReviewError, ReviewSession, Thresholds};

use exit_codes::{
    EXIT_CONFIG_INVALID, EXIT_ERROR, EXIT_EXPORT_FAILED, EXIT_LOAD_FAILED, EXIT_SUCCESS,
    EXIT_UNKNOWN_CLAIM, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "claimdesk")]
#[command(about = "Review extracted claims, record decisions, export the verified set")]
#[command(version)]
struct Cli {
    /// Directory containing posts.json and claims.json
    #[arg(long, global = true, env = "CLAIMDESK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Decision store file
    #[arg(long, global = true, env = "CLAIMDESK_DECISIONS")]
    decisions: Option<PathBuf>,

    /// Review profile (.review.toml) with thresholds and export settings
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List collected posts
    #[command(after_help = "\
Examples:
  claimdesk posts
  claimdesk posts --platform tiktok --sort shares
  claimdesk posts --json")]
    Posts {
        /// Platform to show (twitter, meta, tiktok, ...) or 'all'
        #[arg(long, default_value = "all")]
        platform: String,

        /// Sort order: date, likes or shares (default from settings)
        #[arg(long)]
        sort: Option<PostSort>,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Count posts per platform
    Platforms {
        #[arg(long)]
        json: bool,
    },

    /// Review claims: list buckets, record decisions, export
    #[command(subcommand)]
    Claims(claims::ClaimsCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = Context::load(&cli).and_then(|ctx| match cli.command {
        Commands::Posts { platform, sort, json } => posts::cmd_posts(&ctx, &platform, sort, json),
        Commands::Platforms { json } => posts::cmd_platforms(&ctx, json),
        Commands::Claims(cmd) => claims::cmd_claims(&ctx, cmd),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Diagnostics go to stderr, filtered by RUST_LOG (default: warn).
/// `log` records from the library crates are bridged in by `init`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EXPORT_FAILED, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG_INVALID, message: msg.into(), hint: None }
    }

    /// Create error from a failed posts/claims load.
    pub fn load(err: SourceError) -> Self {
        let hint = match &err {
            SourceError::Missing { .. } => {
                Some("pass --data-dir or set CLAIMDESK_DATA_DIR to the collector output".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_LOAD_FAILED, message: err.to_string(), hint }
    }

    pub fn review(err: ReviewError) -> Self {
        match err {
            ReviewError::UnknownClaim(_) => Self {
                code: EXIT_UNKNOWN_CLAIM,
                message: err.to_string(),
                hint: Some("run 'claimdesk claims list' to see claim ids".to_string()),
            },
            ReviewError::ConfigParse(_) | ReviewError::ConfigValidation(_) => {
                Self::config(err.to_string())
            }
            other => Self::general(other.to_string()),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Run context
// ============================================================================

/// Settings merged with command-line overrides.
pub struct Context {
    pub settings: Settings,
    pub paths: DataPaths,
    pub thresholds: Thresholds,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self, CliError> {
        let settings = Settings::load();
        let mut paths = settings.resolve(cli.data_dir.as_deref(), cli.decisions.as_deref());
        let mut thresholds = settings.thresholds;

        if let Some(profile_path) = &cli.profile {
            let input = fs::read_to_string(profile_path).map_err(|e| {
                CliError::config(format!("{}: {}", profile_path.display(), e))
            })?;
            let profile = ReviewConfig::from_toml(&input).map_err(|e| {
                CliError::review(e).with_hint(format!("check {}", profile_path.display()))
            })?;
            if let Some(name) = &profile.name {
                tracing::debug!(profile = %name, "using review profile");
            }
            thresholds = profile.thresholds;
            if let Some(file_name) = &profile.export.file_name {
                paths.export = PathBuf::from(file_name);
            }
        }

        tracing::debug!(
            claims = %paths.claims.display(),
            decisions = %paths.decisions.display(),
            "resolved data paths"
        );
        Ok(Self { settings, paths, thresholds })
    }

    /// Load claims.json and open the decision store over it.
    pub fn open_session(&self) -> Result<ReviewSession<FileBackend>, CliError> {
        let claims = load_claims(&self.paths.claims).map_err(CliError::load)?;
        let store = DecisionStore::open(FileBackend::new(&self.paths.decisions));
        Ok(ReviewSession::new(claims, store))
    }
}
