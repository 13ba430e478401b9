//! Error-rate evaluation over labeled test data.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use crate::corpus::collect_language_files;
use crate::error::{LexidError, Result};
use crate::model::LanguageModel;
use crate::scorer::Scorer;

/// Running and final counts produced by an evaluation pass.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct EvalReport {
    /// Number of labeled sentences scored.
    pub sentence_count: u64,
    /// Number of sentences whose predicted language differed from the label.
    pub error_count: u64,
}

impl EvalReport {
    /// Error rate as a percentage of the scored sentences.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        if self.sentence_count == 0 {
            0.0
        } else {
            100.0 * self.error_count as f64 / self.sentence_count as f64
        }
    }

    fn record(&mut self, expected: &str, predicted: &str, sentence: &str) {
        self.sentence_count += 1;
        if predicted != expected {
            self.error_count += 1;
            debug!("{expected}->{predicted} {sentence:?}");
        }
    }

    fn maybe_report(&self, report_interval: usize) {
        if report_interval > 0 && self.sentence_count % report_interval as u64 == 0 {
            info!(
                "{} errors in {} sentences, error rate {:.4}%",
                self.error_count,
                self.sentence_count,
                self.error_rate()
            );
        }
    }
}

/// Scores every line of a `<code>\t<sentence>` test file against the model.
///
/// The model must be trained and the file must exist; both conditions are
/// reported as errors rather than panics.  Lines without a tab separator are
/// skipped with a warning.
pub fn evaluate_test_file<P: AsRef<Path>>(
    model: &LanguageModel,
    test_file: P,
    report_interval: usize,
) -> Result<EvalReport> {
    let scorer = Scorer::new(model)?;
    let path = test_file.as_ref();
    if !path.is_file() {
        return Err(LexidError::InvalidConfig(format!(
            "test file {path:?} does not exist"
        )));
    }
    let file = File::open(path).map_err(|err| LexidError::io(err, Some(path.to_path_buf())))?;

    let mut report = EvalReport::default();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|err| match err.kind() {
            std::io::ErrorKind::InvalidData => LexidError::Encoding {
                path: path.to_path_buf(),
            },
            _ => LexidError::io(err, Some(path.to_path_buf())),
        })?;
        let Some((expected, sentence)) = line.split_once('\t') else {
            warn!("skipping malformed test line {line:?}");
            continue;
        };
        let prediction = scorer.classify(sentence)?;
        report.record(expected, &prediction.language, sentence);
        report.maybe_report(report_interval);
    }

    info!(
        "evaluation complete: {} errors in {} sentences, error rate {:.4}%",
        report.error_count,
        report.sentence_count,
        report.error_rate()
    );
    Ok(report)
}

/// Replays the recorded training directory against the model.
///
/// Each language file is scored line by line and compared to the language the
/// file belongs to, capped at the sentence count consumed during training so
/// that a capped run evaluates only what it saw.  Development aid, not a held
/// out measurement.
pub fn evaluate_training_dir(model: &LanguageModel, report_interval: usize) -> Result<EvalReport> {
    let scorer = Scorer::new(model)?;
    let dir = model.training_dir().ok_or_else(|| {
        LexidError::InvalidConfig("model does not record a training directory".into())
    })?;
    let files = collect_language_files(dir)?;

    let mut report = EvalReport::default();
    for (language, path) in files {
        let Some(profile) = model.profile(&language) else {
            warn!("skipping {language:?}: not present in the trained model");
            continue;
        };
        let file = File::open(&path).map_err(|err| LexidError::io(err, Some(path.clone())))?;
        let limit = usize::try_from(profile.sentence_count()).unwrap_or(usize::MAX);
        for line in BufReader::new(file).lines().take(limit) {
            let Ok(sentence) = line else {
                warn!("stopping {language:?}: unreadable line");
                break;
            };
            let prediction = scorer.classify(&sentence)?;
            report.record(&language, &prediction.language, &sentence);
            report.maybe_report(report_interval);
        }
    }

    info!(
        "self-evaluation complete: {} errors in {} sentences, error rate {:.4}%",
        report.error_count,
        report.sentence_count,
        report.error_rate()
    );
    Ok(report)
}
