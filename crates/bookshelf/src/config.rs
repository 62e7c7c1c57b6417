//! CLI configuration: thin wrapper around `bookshelf_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--catalog, --token, --insecure, --timeout, --optimistic).

use std::time::Duration;

use secrecy::SecretString;

use bookshelf_core::{CatalogConfig, DEFAULT_CATALOG_URL, TlsVerification, UpdatePolicy};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use bookshelf_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `CatalogConfig` from the config file, profile, and flags.
///
/// Flags win over the profile, the profile over `[defaults]`. Without a
/// matching profile, `--token` alone is enough to reach the default catalog.
pub fn resolve_catalog_config(global: &GlobalOpts, cfg: &Config) -> Result<CatalogConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let (profile, token) = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            let token = match global.token {
                Some(ref token) => SecretString::from(token.clone()),
                None => bookshelf_config::resolve_token(profile, &profile_name)?,
            };
            (profile.clone(), token)
        }
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None => {
            let token = global
                .token
                .clone()
                .ok_or(CliError::NoToken {
                    profile: profile_name,
                })?;
            (Profile::default(), SecretString::from(token))
        }
    };

    let profile = Profile {
        catalog: global
            .catalog
            .clone()
            .unwrap_or_else(|| profile.catalog.clone()),
        ..profile
    };

    let mut catalog = bookshelf_config::build_catalog_config(&profile, token, &cfg.defaults)?;

    if global.insecure {
        catalog.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        catalog.timeout = Duration::from_secs(secs);
    }
    if global.optimistic {
        catalog.update_policy = UpdatePolicy::Optimistic;
    }

    Ok(catalog)
}

/// Comma-separated profile names for help text.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Default catalog URL for prompts.
pub fn default_catalog() -> &'static str {
    DEFAULT_CATALOG_URL
}
