// ── Core error types ──
//
// User-facing errors from bookshelf-core. Consumers never see HTTP status
// codes or JSON parse failures directly; `From<bookshelf_api::Error>`
// translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::model::{BookId, Shelf};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach catalog at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller is not connected")]
    ControllerDisconnected,

    #[error("Catalog request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Book not found: {id}")]
    BookNotFound { id: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Catalog did not apply the change: {id} requested on '{requested}', reported on '{reported}'")]
    UpdateNotApplied {
        id: BookId,
        requested: Shelf,
        reported: Shelf,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Catalog error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bookshelf_api::Error> for CoreError {
    fn from(err: bookshelf_api::Error) -> Self {
        match err {
            bookshelf_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            bookshelf_api::Error::InvalidToken(reason) => CoreError::AuthenticationFailed {
                message: format!("token is not a valid header value: {reason}"),
            },
            bookshelf_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            bookshelf_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            bookshelf_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            bookshelf_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            bookshelf_api::Error::NotFound { resource } => CoreError::BookNotFound {
                id: resource
                    .rsplit('/')
                    .next()
                    .unwrap_or(resource.as_str())
                    .to_owned(),
            },
            bookshelf_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            bookshelf_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
