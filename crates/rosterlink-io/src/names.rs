//! One-name-per-line lists

use std::fs;
use std::path::Path;

use crate::reader::{read_text, IoError, IoResult};

/// Names from a list file, trimmed, blank lines dropped
pub fn read_name_list(path: &Path) -> IoResult<Vec<String>> {
    let names = parse_name_list(&read_text(path)?);
    tracing::debug!(path = %path.display(), count = names.len(), "loaded name list");
    Ok(names)
}

/// Parse list text; tolerates `\r\n` line endings and a leading BOM
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write one name per line, creating parent directories
pub fn write_name_list<S: AsRef<str>>(path: &Path, names: &[S]) -> IoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IoError::Io(e.to_string()))?;
    }

    let mut text = String::new();
    for name in names {
        text.push_str(name.as_ref());
        text.push('\n');
    }
    fs::write(path, text).map_err(|e| IoError::Io(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), count = names.len(), "wrote name list");
    Ok(())
}
