//! Config subcommand handlers.

use std::str::FromStr;

use dialoguer::{Input, Password, Select};

use bookshelf_core::UpdatePolicy;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    cfg
}

/// Format config as TOML-like text for the table view.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "max_results = {}", cfg.defaults.max_results);
    let _ = writeln!(out, "update_policy = \"{}\"", cfg.defaults.update_policy);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "catalog = \"{}\"", p.catalog);
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(max) = p.max_results {
            let _ = writeln!(out, "max_results = {max}");
        }
        if let Some(policy) = p.update_policy {
            let _ = writeln!(out, "update_policy = \"{policy}\"");
        }
    }

    out.trim_end().to_owned()
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// A prompt that could not run (closed stdin, no terminal) is a usage error.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// A fresh random token. The catalog partitions collections by token, so
/// a new token starts an empty collection.
fn generate_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn prompt_token() -> Result<String, CliError> {
    let token = Password::new()
        .with_prompt("Token")
        .interact()
        .map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(token.trim().to_owned())
}

/// Store the token in the keyring, or hand it back for plaintext config.
///
/// Returns `Some(token)` if the user chose plaintext.
fn prompt_token_storage(token: String, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        bookshelf_config::store_token(profile_name, &token)?;
        eprintln!("   ✓ Token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    let invalid = |field: &str, reason: &str| CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    };

    match key {
        "catalog" | "url" => {
            bookshelf_config::parse_catalog_url(&value)?;
            profile.catalog = value;
        }
        "token" => profile.token = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        "max_results" | "max-results" => {
            profile.max_results = Some(
                value
                    .parse()
                    .map_err(|_| invalid("max_results", "must be a positive number"))?,
            );
        }
        "update_policy" | "update-policy" => {
            profile.update_policy = Some(
                UpdatePolicy::from_str(&value)
                    .map_err(|_| invalid("update_policy", "must be 'confirmed' or 'optimistic'"))?,
            );
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: catalog, token, token_env, \
                     ca_cert, insecure, timeout, max_results, update_policy"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("bookshelf configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let catalog: String = Input::new()
                .with_prompt("Catalog URL")
                .default(config::default_catalog().into())
                .validate_with(|input: &String| {
                    bookshelf_config::parse_catalog_url(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let token_choices = &["Generate a new token (new collection)", "Enter an existing token"];
            let token = match Select::new()
                .with_prompt("Token")
                .items(token_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => {
                    let token = generate_token();
                    eprintln!("   Generated token: {token}");
                    token
                }
                _ => prompt_token()?,
            };
            let token = prompt_token_storage(token, &profile_name)?;

            let policy_choices = &[
                "Confirmed: show changes once the catalog accepts them",
                "Optimistic: show changes immediately, undo on failure",
            ];
            let update_policy = match Select::new()
                .with_prompt("Shelf update policy")
                .items(policy_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => UpdatePolicy::Confirmed,
                _ => UpdatePolicy::Optimistic,
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    catalog,
                    token,
                    update_policy: Some(update_policy),
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Try it: bookshelf list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            set_profile_key(profile, &key, value)?;

            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: bookshelf config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { generate } => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let token = if generate {
                generate_token()
            } else if let Some(ref token) = global.token {
                token.clone()
            } else {
                prompt_token()?
            };

            bookshelf_config::store_token(&profile_name, &token)?;
            if generate {
                println!("{token}");
            }
            if !global.quiet {
                eprintln!("✓ Token stored in system keyring for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}
