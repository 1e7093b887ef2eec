//! Intake configuration.
//!
//! Settings come from an optional JSON file (`intake.json` in the working
//! directory, or `--config PATH`). Each field is resolved in priority order:
//!
//! 1. CLI flag
//! 2. config file
//! 3. environment (`INTAKE_PROJECT_ID`, `FIRESTORE_EMULATOR_HOST`,
//!    `INTAKE_ACCESS_TOKEN`)
//! 4. built-in default
//!
//! Credential discovery is not done here: an access token is either supplied
//! or omitted (emulators accept unauthenticated requests).
use crate::cli::RootArgs;
use crate::duplicate::DuplicatePolicy;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_FILE: &str = "intake.json";
pub const DEFAULT_COLLECTION: &str = "employees";
pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_COUNTRY_CODE: &str = "254";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_PROJECT_ID: &str = "INTAKE_PROJECT_ID";
pub const ENV_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";
pub const ENV_ACCESS_TOKEN: &str = "INTAKE_ACCESS_TOKEN";

const MAX_COUNTRY_CODE_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Firestore,
    /// Process-local collection; nothing survives exit.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    pub schema_version: u32,
    pub backend: Backend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub database: String,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emulator_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub duplicate_check: DuplicatePolicy,
    pub country_code: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            backend: Backend::default(),
            project_id: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            emulator_host: None,
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            duplicate_check: DuplicatePolicy::default(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl IntakeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn load_config(path: &Path) -> Result<IntakeConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse config {}", path.display()))
}

/// Persist a config in a stable, pretty JSON form.
pub fn write_config(path: &Path, config: &IntakeConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let mut text = serde_json::to_string_pretty(config).context("serialize intake config")?;
    text.push('\n');
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))
}

/// Load an explicit config path, or `intake.json` under `cwd` when present,
/// or fall back to defaults.
pub fn load_optional(explicit: Option<&Path>, cwd: &Path) -> Result<IntakeConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let implicit = cwd.join(DEFAULT_CONFIG_FILE);
    if implicit.is_file() {
        return load_config(&implicit);
    }
    Ok(IntakeConfig::default())
}

/// Fill unset optional fields from the environment.
pub fn apply_env(config: &mut IntakeConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    if config.project_id.is_none() {
        config.project_id = non_empty(ENV_PROJECT_ID);
    }
    if config.emulator_host.is_none() {
        config.emulator_host = non_empty(ENV_EMULATOR_HOST);
    }
    if config.access_token.is_none() {
        config.access_token = non_empty(ENV_ACCESS_TOKEN);
    }
}

pub fn apply_args(config: &mut IntakeConfig, args: &RootArgs) {
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(project) = &args.project {
        config.project_id = Some(project.clone());
    }
    if let Some(collection) = &args.collection {
        config.collection = collection.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    if args.fail_closed {
        config.duplicate_check = DuplicatePolicy::FailClosed;
    }
}

pub fn validate_config(config: &IntakeConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported intake config schema_version {}",
            config.schema_version
        ));
    }
    if config.collection.trim().is_empty() {
        return Err(anyhow!("collection must be non-empty"));
    }
    if config.collection.contains('/') {
        return Err(anyhow!(
            "collection must be a top-level collection id (got {:?})",
            config.collection
        ));
    }
    if config.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be at least 1"));
    }
    let code = &config.country_code;
    if code.is_empty()
        || code.len() > MAX_COUNTRY_CODE_DIGITS
        || !code.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(anyhow!(
            "country_code must be 1-{MAX_COUNTRY_CODE_DIGITS} digits (got {code:?})"
        ));
    }
    if config.backend == Backend::Firestore {
        let project = config.project_id.as_deref().map(str::trim).unwrap_or("");
        if project.is_empty() {
            return Err(anyhow!(
                "firestore backend needs a project id (set project_id, --project, or {ENV_PROJECT_ID})"
            ));
        }
        if config.database.trim().is_empty() {
            return Err(anyhow!("database must be non-empty"));
        }
    }
    Ok(())
}

/// Resolve the effective config for this invocation.
pub fn resolve(args: &RootArgs) -> Result<IntakeConfig> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    let mut config = load_optional(args.config.as_deref(), &cwd)?;
    apply_env(&mut config, |key| std::env::var(key).ok());
    apply_args(&mut config, args);
    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
