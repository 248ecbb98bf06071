// Quantiv settings
// Loaded from ~/.config/quantiv/config.toml (or an explicit --config path)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    /// File exists but cannot be read.
    Io { path: PathBuf, message: String },
    /// File is not valid TOML for this schema.
    Parse { path: PathBuf, message: String },
    /// Serialization failed while saving.
    Serialize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "invalid config {}: {message}", path.display())
            }
            Self::Serialize(msg) => write!(f, "cannot serialize config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the persisted files live. File names are resolved against `data_dir`
/// unless they are absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding every data file. Relative paths are taken from the
    /// working directory.
    pub data_dir: PathBuf,
    pub roster_file: PathBuf,
    pub notes_file: PathBuf,
    pub national_file: PathBuf,
    pub legacy_file: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            roster_file: PathBuf::from("students.json"),
            notes_file: PathBuf::from("notes.json"),
            national_file: PathBuf::from("national.json"),
            legacy_file: PathBuf::from("Bd.csv"),
        }
    }
}

impl StorageSettings {
    pub fn paths(&self) -> StoragePaths {
        StoragePaths {
            roster: self.data_dir.join(&self.roster_file),
            notes: self.data_dir.join(&self.notes_file),
            national: self.data_dir.join(&self.national_file),
            legacy: self.data_dir.join(&self.legacy_file),
        }
    }
}

/// Resolved file locations handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    /// Structured roster (JSON array of student records)
    pub roster: PathBuf,
    /// Assessment registry (JSON array)
    pub notes: PathBuf,
    /// National override (JSON object)
    pub national: PathBuf,
    /// Legacy flat-record file (CSV)
    pub legacy: PathBuf,
}

impl StoragePaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        StorageSettings { data_dir: dir.as_ref().to_path_buf(), ..StorageSettings::default() }
            .paths()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Decimal places in human-readable output
    pub precision: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantivConfig {
    pub storage: StorageSettings,
    pub report: ReportSettings,
}

impl QuantivConfig {
    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quantiv")
            .join("config.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Load from an explicit path. The file must exist and parse.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from the default location, falling back to defaults when there is
    /// no config file. A file that exists but does not parse is still an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Save to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, text).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn paths(&self) -> StoragePaths {
        self.storage.paths()
    }
}
