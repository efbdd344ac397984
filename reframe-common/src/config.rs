//! Configuration loading and root folder resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is never fatal; the service starts on defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "REFRAME_ROOT_FOLDER";

/// Environment variable carrying the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable carrying the identity token secret
pub const TOKEN_SECRET_ENV: &str = "REFRAME_TOKEN_SECRET";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "reframe.db";

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Pre-built web UI bundle to serve alongside the API (optional)
    #[serde(default)]
    pub static_assets: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            host: default_host(),
            port: default_port(),
            static_assets: None,
            logging: LoggingConfig::default(),
            gemini: GeminiConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Generative-language API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

/// Identity token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for identity tokens. Absent disables verification.
    #[serde(default)]
    pub token_secret: Option<String>,

    #[serde(default = "default_token_max_age_secs")]
    pub token_max_age_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_max_age_secs: default_token_max_age_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    30
}

fn default_token_max_age_secs() -> u64 {
    86_400
}

/// Default config file location: `<config_dir>/reframe/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reframe").join("config.toml"))
}

/// Load TOML configuration
///
/// A missing file logs a warning and yields defaults. A file that exists but
/// cannot be read or parsed is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {} - using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Compiled default root folder for the platform
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("reframe"))
        .unwrap_or_else(|| PathBuf::from("./reframe_data"))
}

/// Resolves the root folder (CLI > ENV > TOML > compiled default)
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_value: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_value = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("{}: root folder from command line", self.module_name);
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                info!("{}: root folder from {}", self.module_name, ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            info!("{}: root folder from TOML config", self.module_name);
            return path.clone();
        }

        default_root_folder()
    }
}

/// Creates the root folder and locates files inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

/// Validate a secret-like value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Pick ENV over TOML for a secret, ignoring blank values
fn resolve_secret(env_name: &str, toml_value: Option<&String>, what: &str) -> Option<String> {
    let env_value = std::env::var(env_name).ok().filter(|k| is_valid_key(k));
    let toml_value = toml_value.filter(|k| is_valid_key(k)).cloned();

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML config. Using environment.",
            what
        );
    }

    match (env_value, toml_value) {
        (Some(key), _) => {
            info!("{} loaded from environment variable", what);
            Some(key)
        }
        (None, Some(key)) => {
            info!("{} loaded from TOML config", what);
            Some(key)
        }
        (None, None) => None,
    }
}

/// Resolve the Gemini API key (ENV > TOML)
pub fn resolve_gemini_api_key(config: &TomlConfig) -> Option<String> {
    let key = resolve_secret(GEMINI_API_KEY_ENV, config.gemini.api_key.as_ref(), "Gemini API key");
    if key.is_none() {
        warn!(
            "{} is not set - coaching responses will use built-in fallback advice",
            GEMINI_API_KEY_ENV
        );
    }
    key
}

/// Resolve the identity token secret (ENV > TOML)
///
/// `None` means token verification is disabled and every request runs as
/// the development identity.
pub fn resolve_token_secret(config: &TomlConfig) -> Option<String> {
    resolve_secret(TOKEN_SECRET_ENV, config.auth.token_secret.as_ref(), "Token secret")
}
