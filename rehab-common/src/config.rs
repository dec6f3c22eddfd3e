//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration only: where the database lives, which port to
//! listen on, and the log level. Everything else is stored in the database.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `REHAB_ROOT_FOLDER` environment variable
//! 3. `REHAB_ROOT` environment variable
//! 4. `root_folder` key in the module's TOML config file
//! 5. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Primary root folder environment variable
pub const ROOT_FOLDER_ENV: &str = "REHAB_ROOT_FOLDER";

/// Alternative root folder environment variable
pub const ROOT_ENV: &str = "REHAB_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "rehab.db";

/// Default HTTP port for rehab-tracker
pub const DEFAULT_PORT: u16 = 5740;

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional in the file; missing fields take defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            bind_address: default_bind_address(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a file
    ///
    /// A missing file is not an error: defaults are returned. A file that
    /// exists but cannot be parsed is logged and also falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("Config file not found, using defaults: {}", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|content| Self::from_toml_str(&content))
        {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Compiled-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
        }
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/rehab
        dirs::data_local_dir()
            .map(|d| d.join("rehab"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/rehab"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/rehab
        dirs::data_dir()
            .map(|d| d.join("rehab"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/rehab"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\rehab
        dirs::data_local_dir()
            .map(|d| d.join("rehab"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\rehab"))
    } else {
        PathBuf::from("./rehab_data")
    }
}

/// Path of a module's TOML config file (`~/.config/rehab/<module>.toml`)
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rehab").join(format!("{}.toml", module_name)))
}

/// Resolves the root folder for a module
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            config_file: None,
        }
    }

    /// Set the command-line override (highest priority)
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Read `root_folder` from this file instead of the module default
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Resolve the root folder. Never fails; falls back to compiled defaults.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            return PathBuf::from(path);
        }

        if let Ok(path) = std::env::var(ROOT_ENV) {
            return PathBuf::from(path);
        }

        let config_path = self
            .config_file
            .clone()
            .or_else(|| config_file_path(&self.module_name));
        if let Some(config_path) = config_path {
            if let Some(root) = TomlConfig::load_or_default(&config_path).root_folder {
                return root;
            }
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Prepares the root folder and locates the database inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert!(config.root_folder.is_none());
    }

    #[test]
    fn test_toml_overrides() {
        let config = TomlConfig::from_toml_str(
            r#"
            root_folder = "/srv/rehab"
            port = 8080

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/rehab")));
        assert_eq!(config.port, 8080);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cli_arg_wins() {
        let resolver =
            RootFolderResolver::new("test-module").with_cli_arg(Some(PathBuf::from("/tmp/cli")));
        assert_eq!(resolver.resolve(), PathBuf::from("/tmp/cli"));
    }
}
