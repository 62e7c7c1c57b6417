//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bookshelf_config::ConfigError;
use bookshelf_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to catalog at {url}")]
    #[diagnostic(
        code(bookshelf::connection_failed),
        help(
            "Check that the catalog is reachable.\n\
             URL: {url}\n\
             Reason: {reason}\n\
             Use --catalog to point at a different one."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The catalog rejected the token: {message}")]
    #[diagnostic(
        code(bookshelf::auth_failed),
        help("Store a new token with: bookshelf config set-token")
    )]
    AuthFailed { message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(bookshelf::no_token),
        help(
            "Configure one with: bookshelf config init\n\
             Or pass --token / set BOOKSHELF_TOKEN."
        )
    )]
    NoToken { profile: String },

    // ── Books ────────────────────────────────────────────────────────

    #[error("Book '{id}' not found")]
    #[diagnostic(
        code(bookshelf::not_found),
        help("Run: bookshelf search <terms> to find book IDs")
    )]
    NotFound { id: String },

    #[error("The catalog put '{id}' on {reported}, not {requested}")]
    #[diagnostic(
        code(bookshelf::rejected),
        help("Nothing was changed locally. Run: bookshelf list to see the current shelves")
    )]
    Rejected {
        id: String,
        requested: String,
        reported: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Catalog error: {message}")]
    #[diagnostic(code(bookshelf::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bookshelf::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bookshelf::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: bookshelf config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(bookshelf::config))]
    Config(String),

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(bookshelf::keyring),
        help("Set token_env or token on the profile instead.")
    )]
    Keyring(String),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(bookshelf::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(bookshelf::timeout),
        help("Increase timeout with --timeout or check catalog responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("{0}")]
    #[diagnostic(code(bookshelf::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoToken { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::ControllerDisconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                reason: "catalog connection was closed".into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::BookNotFound { id } => CliError::NotFound { id },
            CoreError::UpdateNotApplied {
                id,
                requested,
                reported,
            } => CliError::Rejected {
                id: id.to_string(),
                requested: requested.display_name().into(),
                reported: reported.display_name().into(),
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Api { message, status } => CliError::ApiError {
                message: match status {
                    Some(status) => format!("HTTP {status}: {message}"),
                    None => message,
                },
            },
            CoreError::Config { message } => CliError::Config(message),
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoToken { profile } => CliError::NoToken { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config(other.to_string())
            }
        }
    }
}
