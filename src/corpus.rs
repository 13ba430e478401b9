//! Discovery of normalized training corpora on disk.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{LexidError, Result};

/// Extracts the language code embedded in a `lang-<code>.txt` file name.
///
/// The code is the segment between the first `-` and the following `.`;
/// returns `None` when the name does not follow the convention.
#[must_use]
pub fn language_code_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, rest) = name.split_once('-')?;
    let code = rest.split('.').next()?;
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

/// Discovers the per-language corpus files inside a training directory.
///
/// One file per language is expected, named `lang-<code>.txt`.  Entries that
/// do not follow the convention are skipped with a warning.  The result is
/// sorted by language code so processing and reporting order is deterministic.
pub fn collect_language_files<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, PathBuf)>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LexidError::InvalidConfig(format!(
            "training directory {dir:?} does not exist"
        )));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| LexidError::io(err, Some(dir.to_path_buf())))? {
        let entry = entry.map_err(|err| LexidError::io(err, Some(dir.to_path_buf())))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match language_code_from_path(&path) {
            Some(code) => files.push((code, path)),
            None => warn!("skipping {path:?}: name does not follow the lang-<code>.txt convention"),
        }
    }
    if files.is_empty() {
        return Err(LexidError::InvalidConfig(format!(
            "no language files discovered in {dir:?}"
        )));
    }
    files.sort();
    Ok(files)
}
