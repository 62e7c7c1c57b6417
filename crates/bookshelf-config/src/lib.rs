//! Configuration for the bookshelf CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `bookshelf_core::CatalogConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use bookshelf_core::{CatalogConfig, DEFAULT_CATALOG_URL, TlsVerification, UpdatePolicy};

/// Keyring service name; entries are keyed `<profile>/token`.
pub const KEYRING_SERVICE: &str = "bookshelf";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoToken { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named catalog profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The profile name in effect: explicit, then `default_profile`, then `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default)]
    pub update_policy: UpdatePolicy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            max_results: default_max_results(),
            update_policy: UpdatePolicy::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_max_results() -> u32 {
    20
}
fn default_catalog() -> String {
    DEFAULT_CATALOG_URL.into()
}

/// A named catalog profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Catalog base URL.
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Token in plaintext. Prefer the keyring or `token_env`.
    pub token: Option<String>,

    /// Environment variable holding the token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    pub timeout: Option<u64>,

    /// Upper bound for search results.
    pub max_results: Option<u32>,

    pub update_policy: Option<UpdatePolicy>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            token: None,
            token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            max_results: None,
            update_policy: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Where `config.toml` lives on this platform.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bookshelf", "bookshelf").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bookshelf");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// `BOOKSHELF_`-prefixed variables override file values; nested keys use a
/// double underscore, e.g. `BOOKSHELF_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BOOKSHELF_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Write `cfg` to `config_path()`, creating the directory if needed.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve a profile's token: `token_env`, then the keyring, then plaintext.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_token_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_token,
    )
}

/// [`resolve_token`] with the env and keyring lookups supplied by the caller.
pub fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    if let Some(val) = profile.token_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(val));
    }

    if let Some(secret) = keyring(profile_name) {
        return Ok(SecretString::from(secret));
    }

    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken {
        profile: profile_name.into(),
    })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

fn keyring_token(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a profile's token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `CatalogConfig` from a profile, with `defaults` filling gaps.
pub fn profile_to_catalog_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CatalogConfig, ConfigError> {
    let token = resolve_token(profile, profile_name)?;
    build_catalog_config(profile, token, defaults)
}

/// Like [`profile_to_catalog_config`] with an already resolved token.
pub fn build_catalog_config(
    profile: &Profile,
    token: SecretString,
    defaults: &Defaults,
) -> Result<CatalogConfig, ConfigError> {
    let url = parse_catalog_url(&profile.catalog)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = CatalogConfig::new(url, token);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.max_search_results = Some(profile.max_results.unwrap_or(defaults.max_results));
    config.update_policy = profile.update_policy.unwrap_or(defaults.update_policy);
    Ok(config)
}

/// Parse and sanity-check a catalog base URL.
pub fn parse_catalog_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "catalog".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "catalog".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "home"

[defaults]
timeout = 12

[profiles.home]
catalog = "http://localhost:5001"
token_env = "HOME_SHELF_TOKEN"
update_policy = "optimistic"
max_results = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(None), "home");
        assert_eq!(cfg.defaults.timeout, 12);
        assert_eq!(cfg.defaults.output, "table");

        let home = cfg.profile("home").unwrap();
        assert_eq!(home.catalog, "http://localhost:5001");
        assert_eq!(home.update_policy, Some(UpdatePolicy::Optimistic));
        assert_eq!(home.max_results, Some(5));
        assert!(matches!(
            cfg.profile("work"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                token: Some("abc".into()),
                timeout: Some(9),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
    }

    #[test]
    fn token_resolution_order() {
        let profile = Profile {
            token: Some("plain".into()),
            token_env: Some("SHELF_TOKEN".into()),
            ..Profile::default()
        };

        let from_env = resolve_token_with(
            &profile,
            "p",
            |name| (name == "SHELF_TOKEN").then(|| "env".to_string()),
            |_| Some("ring".into()),
        )
        .unwrap();
        assert_eq!(from_env.expose_secret(), "env");

        let from_ring = resolve_token_with(&profile, "p", no_env, |name| {
            (name == "p").then(|| "ring".to_string())
        })
        .unwrap();
        assert_eq!(from_ring.expose_secret(), "ring");

        let plain = resolve_token_with(&profile, "p", no_env, no_env).unwrap();
        assert_eq!(plain.expose_secret(), "plain");

        let missing = resolve_token_with(&Profile::default(), "p", no_env, no_env);
        assert!(matches!(missing, Err(ConfigError::NoToken { ref profile }) if profile == "p"));
    }

    #[test]
    fn catalog_config_uses_profile_then_defaults() {
        let defaults = Defaults {
            timeout: 15,
            update_policy: UpdatePolicy::Optimistic,
            ..Defaults::default()
        };
        let profile = Profile {
            catalog: "https://books.example.com".into(),
            max_results: Some(7),
            ..Profile::default()
        };

        let cfg = build_catalog_config(&profile, SecretString::from("t"), &defaults).unwrap();
        assert_eq!(cfg.url.as_str(), "https://books.example.com/");
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert_eq!(cfg.max_search_results, Some(7));
        assert_eq!(cfg.update_policy, UpdatePolicy::Optimistic);
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);

        let insecure = Profile {
            insecure: Some(true),
            ..profile
        };
        let cfg = build_catalog_config(&insecure, SecretString::from("t"), &defaults).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_non_http_catalog() {
        assert!(parse_catalog_url("ftp://example.com").is_err());
        assert!(parse_catalog_url("not a url").is_err());
        assert!(parse_catalog_url("http://127.0.0.1:3001").is_ok());
    }
}
