//! Project configuration.
//!
//! Ripple reads an optional `ripple.yaml` from the project root. Every key has
//! a default, so an empty file, a partial file and a missing file are all
//! valid:
//!
//! ```yaml
//! base-package: com.shop
//! source-dir: src/main/java
//! test-dir: src/test/java
//! report-dir: build/reports/ripple
//! advisory:
//!   enabled: true
//!   model: gpt-4.1
//!   api-url-env: OPENAI_API_URL
//!   api-key-env: OPENAI_API_KEY
//!   timeout-secs: 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Name of the configuration file at the project root
pub const CONFIG_FILE_NAME: &str = "ripple.yaml";

/// Default package prefix for in-project imports
pub const DEFAULT_BASE_PACKAGE: &str = "com.example";

/// Configuration file structure for ripple
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct RippleConfig {
    /// Imports under this package are in-project references
    pub base_package: String,

    /// Production sources, relative to the project root
    pub source_dir: PathBuf,

    /// Test sources, relative to the project root
    pub test_dir: PathBuf,

    /// Where the JSON report is written, relative to the project root
    pub report_dir: PathBuf,

    /// Advisory summarization settings
    pub advisory: AdvisoryConfig,
}

/// Advisory configuration section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdvisoryConfig {
    /// Whether to call the advisory service at all
    pub enabled: bool,

    /// Chat model name sent with the request
    pub model: String,

    /// Environment variable holding the chat-completions URL
    pub api_url_env: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Upper bound for the whole advisory call
    pub timeout_secs: u64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            base_package: DEFAULT_BASE_PACKAGE.to_string(),
            source_dir: PathBuf::from("src/main/java"),
            test_dir: PathBuf::from("src/test/java"),
            report_dir: PathBuf::from("build/reports/ripple"),
            advisory: AdvisoryConfig::default(),
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4.1".to_string(),
            api_url_env: "OPENAI_API_URL".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AdvisoryConfig {
    /// Timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RippleConfig {
    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// this structure.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML or unknown value types.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load `ripple.yaml` from the project root, falling back to defaults.
    ///
    /// A missing file is normal. A file that cannot be read or parsed is
    /// logged and replaced by the defaults so the run can continue.
    pub async fn load_or_default(project_root: &Path) -> Self {
        let path = project_root.join(CONFIG_FILE_NAME);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            info!(path = %path.display(), "No configuration file, using defaults");
            return Self::default();
        }

        match Self::load(&path).await {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Absolute production source directory.
    #[must_use]
    pub fn source_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.source_dir)
    }

    /// Absolute test source directory.
    #[must_use]
    pub fn test_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.test_dir)
    }

    /// Absolute report directory.
    #[must_use]
    pub fn report_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.report_dir)
    }
}
