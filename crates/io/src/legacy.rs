// Legacy flat-record file (CSV)
// Header: Nom,Prénom,Groupe,Données. Données is a comma-joined score list,
// quoted by the CSV writer.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use quantiv_recon::{LegacyRow, SourceState};

use crate::error::StoreError;
use crate::json::write_atomic;

pub const HEADERS: [&str; 4] = ["Nom", "Prénom", "Groupe", "Données"];

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Files re-saved from Excel on Windows
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

pub fn read_rows(path: &Path) -> SourceState<Vec<LegacyRow>> {
    let content = match read_file_as_utf8(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return SourceState::Missing,
        Err(e) => return SourceState::Malformed(e.to_string()),
    };
    match parse_rows(&content) {
        Ok(rows) => SourceState::Loaded(rows),
        Err(e) => SourceState::Malformed(e),
    }
}

/// Parse CSV text into rows. Columns are located by header name; a missing
/// column reads as empty. Fields are trimmed.
pub fn parse_rows(content: &str) -> Result<Vec<LegacyRow>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let columns = HEADERS.map(column);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let field = |idx: usize| {
            columns[idx]
                .and_then(|c| record.get(c))
                .unwrap_or("")
                .to_string()
        };
        rows.push(LegacyRow {
            last_name: field(0),
            first_name: field(1),
            group_name: field(2),
            data: field(3),
        });
    }
    Ok(rows)
}

fn render(rows: &[LegacyRow]) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS).map_err(|e| StoreError::Serialize(e.to_string()))?;
    for row in rows {
        writer
            .write_record([&row.last_name, &row.first_name, &row.group_name, &row.data])
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Replace the whole file with `rows` (header always written).
pub fn rewrite(path: &Path, rows: &[LegacyRow]) -> Result<(), StoreError> {
    write_atomic(path, &render(rows)?)
}

/// Append one row, creating the file with its header when needed.
///
/// A file that is not valid UTF-8 (re-saved as Windows-1252) is rewritten as
/// UTF-8 with the new row, so the file never mixes encodings.
pub fn append_row(path: &Path, row: &LegacyRow) -> Result<(), StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    if bytes.is_empty() {
        return rewrite(path, std::slice::from_ref(row));
    }
    if std::str::from_utf8(&bytes).is_err() {
        let mut rows = match read_rows(path) {
            SourceState::Loaded(rows) => rows,
            SourceState::Missing => Vec::new(),
            SourceState::Malformed(reason) => {
                return Err(StoreError::Unreadable { path: path.to_path_buf(), reason })
            }
        };
        log::info!("{}: converting legacy file to UTF-8", path.display());
        rows.push(row.clone());
        return rewrite(path, &rows);
    }

    let needs_newline = !bytes.ends_with(b"\n");

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    if needs_newline {
        file.write_all(b"\r\n").map_err(|e| StoreError::io(path, e))?;
    }

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record([&row.last_name, &row.first_name, &row.group_name, &row.data])
        .map_err(|e| StoreError::io(path, e))?;
    writer.flush().map_err(|e| StoreError::io(path, e))
}

fn matches_name(row: &LegacyRow, last_name: &str, first_name: &str) -> bool {
    row.last_name.trim() == last_name.trim() && row.first_name.trim() == first_name.trim()
}

/// Rows left after removing every match; `None` when nothing matched.
pub fn without(rows: &[LegacyRow], last_name: &str, first_name: &str) -> Option<Vec<LegacyRow>> {
    let kept: Vec<LegacyRow> = rows
        .iter()
        .filter(|r| !matches_name(r, last_name, first_name))
        .cloned()
        .collect();
    (kept.len() != rows.len()).then_some(kept)
}

/// Update the first matching row in place. Returns whether one matched.
pub fn update_first(
    rows: &mut [LegacyRow],
    last_name: &str,
    first_name: &str,
    group_name: Option<&str>,
    data: Option<&str>,
) -> bool {
    match rows.iter_mut().find(|r| matches_name(r, last_name, first_name)) {
        Some(row) => {
            if let Some(group) = group_name {
                row.group_name = group.to_string();
            }
            if let Some(data) = data {
                row.data = data.to_string();
            }
            true
        }
        None => false,
    }
}

/// Case-insensitive, trimmed equality.
pub(crate) fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
