use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::{deserialize_duration, serialize_duration};

const CONFIG_FILE_NAME: &str = "bofa-scraper.toml";

fn default_login_url() -> String {
    "https://www.bankofamerica.com".to_string()
}

/// Default quiescence delay after every page action.
fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_account_selector() -> String {
    ".AccountItem".to_string()
}

/// Application configuration, as written in the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Portal landing page holding the sign-in form.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// How long to wait after a click or navigation for the page to finish
    /// rendering. The wait is unconditional.
    #[serde(
        default = "default_timeout",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Duration,

    /// Run Chrome without a window. The passcode is typed by hand, so this
    /// is only useful with a profile that is already signed in.
    pub headless: bool,

    /// Explicit Chrome/Chromium executable. Searched for when unset.
    pub chrome_path: Option<PathBuf>,

    /// Where per-account CSV files go. If relative, resolved from the config
    /// file location.
    pub output_dir: Option<PathBuf>,

    /// CSS selector for the account entries on the overview page.
    #[serde(default = "default_account_selector")]
    pub account_selector: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            timeout: default_timeout(),
            headless: false,
            chrome_path: None,
            output_dir: None,
            account_selector: default_account_selector(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the output directory against the directory holding the config file.
    pub fn resolve_output_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub login_url: String,
    pub timeout: Duration,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub account_selector: String,
}

impl ResolvedConfig {
    fn from_config(config: Config, config_dir: &Path) -> Self {
        let output_dir = config.resolve_output_dir(config_dir);
        Self {
            login_url: config.login_url,
            timeout: config.timeout,
            headless: config.headless,
            chrome_path: config.chrome_path,
            output_dir,
            account_selector: config.account_selector,
        }
    }

    /// Load and resolve config from a file path.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;
        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        Ok(Self::from_config(config, config_dir))
    }

    /// Load config, falling back to defaults when the file doesn't exist.
    ///
    /// Relative output paths then resolve against the directory the config
    /// file would have lived in.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        let config_path = if config_path.is_relative() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(config_path)
        } else {
            config_path.to_path_buf()
        };
        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;

        Ok(Self::from_config(Config::default(), config_dir))
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./bofa-scraper.toml` if it exists in current directory
/// 2. `bofa-scraper/bofa-scraper.toml` under the XDG data directory
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from(CONFIG_FILE_NAME);
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("bofa-scraper").join(CONFIG_FILE_NAME);
    }

    local_config
}
