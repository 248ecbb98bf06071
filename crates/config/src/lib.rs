// Configuration loading

pub mod settings;

pub use settings::{ConfigError, QuantivConfig, ReportSettings, StoragePaths, StorageSettings};
