//! Configuration loading and root folder resolution
//!
//! Settings come from, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing config file is never fatal: the service logs a warning and
//! starts on defaults. A config file that exists but does not parse is an
//! error.

use crate::status::StatusVocabularies;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "CONTACTS_ROOT_FOLDER";

/// File name of the SQLite database inside the root folder
pub const DATABASE_FILE_NAME: &str = "contacts.db";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Public French address database (Base Adresse Nationale) search endpoint
pub const DEFAULT_GEOCODER_URL: &str = "https://api-adresse.data.gouv.fr/search/";

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding `contacts.db`
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// HTTP bind address
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Status vocabularies offered by the UI
    #[serde(default)]
    pub statuses: StatusVocabularies,

    /// Address autocomplete upstream
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Reverse phone-number lookup
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` string). `RUST_LOG` takes precedence.
    #[serde(default)]
    pub level: Option<String>,
}

/// Address geocoder settings
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    /// Search endpoint; the query is passed as `?q=`
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// Maximum number of suggestions requested upstream
    #[serde(default = "default_geocoder_limit")]
    pub limit: u32,

    /// Request timeout in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            limit: default_geocoder_limit(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_geocoder_limit() -> u32 {
    5
}

fn default_geocoder_timeout() -> u64 {
    10
}

/// Reverse lookup settings
///
/// The directory page is fetched from `url_template` with `{phone}`
/// replaced by the number. `name_selector` and `address_selector` are CSS
/// selectors; the first match of each is used.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub url_template: Option<String>,

    #[serde(default = "default_name_selector")]
    pub name_selector: String,

    #[serde(default = "default_address_selector")]
    pub address_selector: String,

    /// Directory pages are slow; default is generous
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url_template: None,
            name_selector: default_name_selector(),
            address_selector: default_address_selector(),
            timeout_secs: default_lookup_timeout(),
        }
    }
}

fn default_name_selector() -> String {
    ".denomination-links".to_string()
}

fn default_address_selector() -> String {
    ".bi-address a".to_string()
}

fn default_lookup_timeout() -> u64 {
    20
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the explicit config file, or the platform default one if present
    ///
    /// An explicit path must exist. The platform default is optional: when
    /// absent, defaults are returned. Nothing is logged here since this runs
    /// before the log level is known; call [`ConfigSource::log`] once tracing
    /// is up.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            let config = Self::load(path)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let config = Self::load(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path))),
            None => Ok((Self::default(), ConfigSource::NoConfigDir)),
        }
    }
}

/// Where [`TomlConfig::load_or_default`] got its settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Built-in defaults; no file at the platform location
    Missing(PathBuf),
    /// Built-in defaults; the platform has no config directory
    NoConfigDir,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "No config file at {}, using built-in defaults",
                path.display()
            ),
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using built-in defaults")
            }
        }
    }
}

/// Platform config file location (`<config_dir>/contacts/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("contacts").join("config.toml"))
}

/// Resolve the root folder following the priority order above
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// OS-dependent default root folder
///
/// `~/.local/share/contacts` on Linux, `~/Library/Application Support/contacts`
/// on macOS, `%LOCALAPPDATA%\contacts` on Windows.
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("contacts"))
        .unwrap_or_else(|| PathBuf::from("./contacts_data"))
}

/// Database file inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}
