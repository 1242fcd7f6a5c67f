use crate::error::{ConformError, Result};
use crate::registry::KnownFailures;
use crate::report::DEFAULT_AGENT;
use crate::verdict::Mode;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name looked up in the working directory and under the user config dir
pub const CONFIG_FILE_NAME: &str = "wsconform.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub known_failures: KnownFailuresConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_agent")]
    pub agent: String,
    #[serde(default = "default_partial_path")]
    pub partial_path: Utf8PathBuf,
    #[serde(default = "default_strict_path")]
    pub strict_path: Utf8PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnownFailuresConfig {
    /// Extra test case ids accepted as failing in partial mode
    #[serde(default)]
    pub cases: Vec<String>,
    /// Drop the compiled-in wsServer list and use `cases` alone
    #[serde(default)]
    pub replace_builtin: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            agent: default_agent(),
            partial_path: default_partial_path(),
            strict_path: default_strict_path(),
        }
    }
}

impl ReportConfig {
    /// Report location used by a run in `mode`
    pub fn path_for(&self, mode: Mode) -> &Utf8Path {
        match mode {
            Mode::Partial => &self.partial_path,
            Mode::Strict => &self.strict_path,
        }
    }
}

impl KnownFailuresConfig {
    pub fn registry(&self) -> KnownFailures {
        let mut known = if self.replace_builtin {
            KnownFailures::new()
        } else {
            KnownFailures::builtin()
        };
        known.extend(self.cases.iter().cloned());
        known
    }
}

// Default value functions
fn default_agent() -> String {
    DEFAULT_AGENT.to_owned()
}

fn default_partial_path() -> Utf8PathBuf {
    Utf8PathBuf::from("wsserver_autobahn/index.json")
}

fn default_strict_path() -> Utf8PathBuf {
    Utf8PathBuf::from("wsserver_autobahn/report/index.json")
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConformError::Config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_toml_str(&content)?;
        config.expand_paths();
        debug!("Configuration loaded from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConformError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first config file found, or fall back to defaults when
    /// there is none. A file that exists but does not parse is an error.
    pub fn discover() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE_NAME)),
            dirs::config_dir().map(|p| p.join("wsconform").join(CONFIG_FILE_NAME)),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|candidate| candidate.is_file())
    }

    fn expand_paths(&mut self) {
        // Helper function to expand tilde
        fn expand_tilde(path: &Utf8PathBuf) -> Utf8PathBuf {
            let path_str = path.as_str();
            if path_str.starts_with("~/") {
                if let Some(home) = dirs::home_dir() {
                    if let Some(home_str) = home.to_str() {
                        return Utf8PathBuf::from(path_str.replacen("~", home_str, 1));
                    }
                }
            }
            path.clone()
        }

        self.report.partial_path = expand_tilde(&self.report.partial_path);
        self.report.strict_path = expand_tilde(&self.report.strict_path);
    }

    fn validate(&self) -> Result<()> {
        if self.report.agent.trim().is_empty() {
            return Err(ConformError::Config("Agent name must not be empty".to_owned()));
        }

        if let Some(bad) = self
            .known_failures
            .cases
            .iter()
            .find(|id| id.is_empty() || id.chars().any(char::is_whitespace))
        {
            return Err(ConformError::Config(format!(
                "Invalid test case id in known_failures: {:?}",
                bad
            )));
        }
        Ok(())
    }
}
