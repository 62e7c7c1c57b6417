// ── Runtime catalog configuration ──
//
// These types describe *how* to reach the catalog and how shelf changes
// are committed. They carry the token but never touch disk; the CLI builds
// a `CatalogConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-hosted catalogs with self-signed certs).
    DangerAcceptInvalid,
}

/// When a shelf change reaches the local collection.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UpdatePolicy {
    /// Apply after the catalog acknowledges the change.
    #[default]
    Confirmed,
    /// Apply immediately; roll back if the catalog fails or disagrees.
    Optimistic,
}

/// Configuration for one catalog connection.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog base URL.
    pub url: Url,
    /// Opaque per-user token sent as `Authorization`.
    pub token: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Upper bound passed to `POST /search`; `None` lets the catalog decide.
    pub max_search_results: Option<u32>,
    pub update_policy: UpdatePolicy,
}

impl CatalogConfig {
    /// Config with defaults for everything but the endpoint and token.
    pub fn new(url: Url, token: SecretString) -> Self {
        Self {
            url,
            token,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            max_search_results: Some(20),
            update_policy: UpdatePolicy::default(),
        }
    }
}
