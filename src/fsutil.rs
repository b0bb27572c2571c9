use crate::error::{LockfileError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const BOM: char = '\u{feff}';

pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix(BOM).unwrap_or(content)
}

/// Read a text file, mapping "not found" to `None`. Every other I/O failure is returned unchanged.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LockfileError::io(path, e)),
    }
}

pub fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}

/// Try candidates in order and return the first that produces a value.
/// Errors short-circuit; `Ok(None)` moves on to the next candidate.
pub fn first_found<T, I, F>(candidates: I) -> Result<Option<T>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Result<Option<T>>,
{
    for candidate in candidates {
        if let Some(found) = candidate()? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Write through a sibling temp file and rename so readers never observe a half-written lockfile.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| LockfileError::io(parent, e))?;
        }
    }
    let tmp = path.with_extension("yaml.tmp");
    fs::write(&tmp, data).map_err(|e| LockfileError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| LockfileError::io(path, e))
}

pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LockfileError::io(path, e)),
    }
}
