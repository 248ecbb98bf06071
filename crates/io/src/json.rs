// JSON files and whole-file rewrites

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use quantiv_recon::SourceState;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> SourceState<T> {
    let contents = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return SourceState::Missing,
        Err(e) => return SourceState::Malformed(e.to_string()),
    };
    match serde_json::from_str(&contents) {
        Ok(value) => SourceState::Loaded(value),
        Err(e) => SourceState::Malformed(e.to_string()),
    }
}

/// Serialize `value` as pretty JSON and replace `path` with it.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Replace a file's content (write to temp, then rename).
///
/// A failure at any point leaves the previous file untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let written = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::io(path, e));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StoreError::io(path, e)
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
