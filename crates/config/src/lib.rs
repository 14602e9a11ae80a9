//! Layered configuration for html2pdf.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. `config.toml` in the platform configuration directory, when present.
//! 3. An explicitly requested file (TOML, YAML or JSON, picked by extension).
//! 4. Environment variables prefixed with `HTML2PDF_`. Nested keys are
//!    separated by a double underscore, e.g. `HTML2PDF_BROWSER__SANDBOX=false`.
//!
//! Command-line flags are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::Exn;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "HTML2PDF_";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    /// Directory generated output paths are placed in. Relative paths are
    /// resolved against the working directory.
    pub output_dir: PathBuf,
    pub readiness: ReadinessConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            output_dir: PathBuf::from("output"),
            readiness: ReadinessConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub executable_path: Option<PathBuf>,
    pub sandbox: bool,
}
impl Default for BrowserConfig {
    fn default() -> Self {
        Self { executable_path: None, sandbox: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// How long the network must stay idle before printing.
    pub quiet_period_ms: u64,
    /// Upper bound on waiting for the page to settle.
    pub timeout_secs: u64,
}
impl Default for ReadinessConfig {
    fn default() -> Self {
        Self { quiet_period_ms: 500, timeout_secs: 30 }
    }
}
impl ReadinessConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from every source, with `explicit` (if any) layered
    /// above the user configuration file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(explicit)?
            .extract()
            .map_err(|e| Exn::new(ErrorKind::Invalid(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// The merged provider stack without extracting it.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = user_config_path().filter(|p| p.is_file()) {
            tracing::debug!(path = %path.display(), "Loading user configuration");
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "Loading configuration file");
            figment = match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn validate(&self) -> Result<()> {
        if self.readiness.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("readiness.timeout_secs must be greater than zero".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("output_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

/// `config.toml` inside the platform configuration directory.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "html2pdf").map(|dirs| dirs.config_dir().join("config.toml"))
}
