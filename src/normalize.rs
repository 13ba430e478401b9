//! Raw-corpus normalization: markup filtering into one flat file per language.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{LexidError, Result};

/// Counters describing a completed normalization run.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Number of `lang-<code>.txt` files written.
    pub languages_written: usize,
    /// Number of raw input files read successfully.
    pub files_read: usize,
    /// Number of input files skipped because they were not valid UTF-8.
    pub files_skipped: usize,
    /// Number of lines kept across all languages.
    pub lines_kept: u64,
}

/// Drops markup artifact lines from raw corpus text.
///
/// Lines that are empty or begin with `<` or `(` are removed; surviving lines
/// are rejoined with trailing newlines.
#[must_use]
pub fn filter_markup_lines(text: &str) -> String {
    let mut filtered = String::with_capacity(text.len());
    for line in text.split('\n') {
        if line.is_empty() || line.starts_with('<') || line.starts_with('(') {
            continue;
        }
        filtered.push_str(line);
        filtered.push('\n');
    }
    filtered
}

/// Builds one `lang-<code>.txt` training file per language sub-directory.
///
/// `input_dir` holds one sub-directory per language code, each containing the
/// raw text files of that language.  Files that cannot be decoded as UTF-8
/// are skipped with a warning.  The output directory is created when absent
/// and existing output files are overwritten.
pub fn build_training_files<P, Q>(input_dir: P, output_dir: Q) -> Result<NormalizeSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    if !input_dir.is_dir() {
        return Err(LexidError::InvalidConfig(format!(
            "input directory {input_dir:?} does not exist"
        )));
    }
    fs::create_dir_all(output_dir)
        .map_err(|err| LexidError::io(err, Some(output_dir.to_path_buf())))?;

    let mut language_dirs: Vec<PathBuf> = Vec::new();
    for entry in
        fs::read_dir(input_dir).map_err(|err| LexidError::io(err, Some(input_dir.to_path_buf())))?
    {
        let entry = entry.map_err(|err| LexidError::io(err, Some(input_dir.to_path_buf())))?;
        if entry.path().is_dir() {
            language_dirs.push(entry.path());
        }
    }
    language_dirs.sort();
    if language_dirs.is_empty() {
        return Err(LexidError::InvalidConfig(format!(
            "no language sub-directories found in {input_dir:?}"
        )));
    }

    let mut summary = NormalizeSummary::default();
    for language_dir in language_dirs {
        let Some(code) = language_dir.file_name().and_then(|name| name.to_str()) else {
            warn!("skipping {language_dir:?}: directory name is not valid UTF-8");
            continue;
        };
        let out_path = output_dir.join(format!("lang-{code}.txt"));
        let out_file = File::create(&out_path)
            .map_err(|err| LexidError::io(err, Some(out_path.clone())))?;
        let mut writer = BufWriter::new(out_file);
        let mut lines_kept = 0u64;

        for entry in WalkDir::new(&language_dir).sort_by_file_name() {
            let entry = entry.map_err(|err| LexidError::Internal(err.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match fs::read_to_string(entry.path()) {
                Ok(text) => {
                    summary.files_read += 1;
                    let filtered = filter_markup_lines(&text);
                    lines_kept += filtered.bytes().filter(|&b| b == b'\n').count() as u64;
                    writer
                        .write_all(filtered.as_bytes())
                        .map_err(|err| LexidError::io(err, Some(out_path.clone())))?;
                }
                Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                    warn!("skipping undecodable file {:?}", entry.path());
                    summary.files_skipped += 1;
                }
                Err(err) => {
                    return Err(LexidError::io(err, Some(entry.path().to_path_buf())));
                }
            }
        }

        writer
            .flush()
            .map_err(|err| LexidError::io(err, Some(out_path.clone())))?;
        summary.languages_written += 1;
        summary.lines_kept += lines_kept;
        info!("wrote {out_path:?} ({lines_kept} lines)");
    }

    Ok(summary)
}
