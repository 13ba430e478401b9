//! Training pass over a normalized corpus directory.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use log::{info, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::{TrainerBuilder, TrainerConfig};
use crate::corpus::collect_language_files;
use crate::error::Result;
use crate::metrics::{LanguageStats, StopReason, TrainingMetrics};
use crate::model::{LanguageModel, LanguageProfile};
use crate::tokenize::tokenize_with;

/// High-level façade configuring and executing training runs.
#[derive(Debug, Clone)]
pub struct Trainer {
    cfg: TrainerConfig,
}

/// Artifacts returned after a training session completes.
#[must_use]
#[derive(Debug, Clone)]
pub struct TrainerArtifacts {
    /// Trained language-identification model.
    pub model: LanguageModel,
    /// Per-language statistics captured during training.
    pub metrics: TrainingMetrics,
}

impl Trainer {
    /// Creates a new trainer for the supplied configuration.
    #[must_use]
    pub fn new(cfg: TrainerConfig) -> Self {
        Self { cfg }
    }

    /// Returns a [`TrainerBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerConfig::builder()
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.cfg
    }

    /// Trains a model from a directory holding one `lang-<code>.txt` file per
    /// language.
    ///
    /// Each language's table is built independently (the fan-out runs on the
    /// Rayon pool); the shared out-of-vocabulary probability is derived only
    /// after every language's probability table is complete.  Any failure
    /// returns an error without yielding a partially trained model.
    pub fn train<P: AsRef<Path>>(&self, corpus_dir: P) -> Result<TrainerArtifacts> {
        self.cfg.validate()?;
        let corpus_dir = corpus_dir.as_ref();
        let files = collect_language_files(corpus_dir)?;

        let start = Instant::now();
        let counted: Vec<Option<(LanguageProfile, LanguageStats)>> = files
            .par_iter()
            .map(|(code, path)| self.count_language(code, path))
            .collect();

        let mut profiles = BTreeMap::new();
        let mut languages = Vec::new();
        for (profile, stats) in counted.into_iter().flatten() {
            if profiles.insert(stats.language.clone(), profile).is_some() {
                warn!(
                    "duplicate corpus file for language {:?}; keeping the later one",
                    stats.language
                );
            }
            languages.push(stats);
        }
        languages.sort_by(|a, b| a.language.cmp(&b.language));

        let model = LanguageModel::from_profiles(
            profiles,
            Some(corpus_dir.to_path_buf()),
            self.cfg.clone(),
        )?;
        let metrics = TrainingMetrics {
            languages,
            total_duration: start.elapsed(),
        };

        if self.cfg.show_progress {
            info!(
                "trained {} languages in {:.2?}",
                model.language_count(),
                metrics.total_duration
            );
        }
        Ok(TrainerArtifacts { model, metrics })
    }

    /// Counts words for a single language file; returns `None` when the file
    /// cannot be opened (unreadable corpus files are skipped, not fatal).
    fn count_language(
        &self,
        language: &str,
        path: &Path,
    ) -> Option<(LanguageProfile, LanguageStats)> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!("skipping unreadable corpus file {path:?}: {err}");
                return None;
            }
        };

        let cap = self.cfg.max_words_per_lang;
        let mut word_counts: FxHashMap<String, u64> = FxHashMap::default();
        let mut sentence_count = 0u64;
        let mut total_word_count = 0u64;
        let mut stop_reason = StopReason::CorpusExhausted;

        'sentences: for line in BufReader::new(file).lines() {
            let sentence = match line {
                Ok(sentence) => sentence,
                Err(err) => {
                    warn!("stopping {language:?} after {sentence_count} sentences: {err}");
                    break;
                }
            };
            sentence_count += 1;
            for word in tokenize_with(&sentence, self.cfg.drop_empty_tokens) {
                if cap > 0 && word_counts.len() >= cap && !word_counts.contains_key(&word) {
                    stop_reason = StopReason::WordCapReached;
                    break 'sentences;
                }
                total_word_count += 1;
                *word_counts.entry(word).or_insert(0) += 1;
            }
            if self.cfg.report_interval > 0
                && sentence_count % self.cfg.report_interval as u64 == 0
            {
                info!(
                    "language {language}: {total_word_count} words, {sentence_count} sentences"
                );
            }
        }

        let stats = LanguageStats {
            language: language.to_string(),
            distinct_words: word_counts.len(),
            sentence_count,
            total_word_count,
            stop_reason,
        };
        if self.cfg.show_progress {
            info!(
                "language {language}: {} distinct words, {} sentences",
                stats.distinct_words, stats.sentence_count
            );
        }
        let profile = LanguageProfile::from_counts(word_counts, sentence_count, total_word_count);
        Some((profile, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexidError;
    use float_cmp::approx_eq;
    use std::fs;
    use tempfile::tempdir;

    fn trainer() -> Trainer {
        let cfg = TrainerConfig::builder()
            .show_progress(false)
            .build()
            .expect("valid config");
        Trainer::new(cfg)
    }

    fn write_corpus(dir: &Path, code: &str, lines: &[&str]) {
        let mut body = String::new();
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
        fs::write(dir.join(format!("lang-{code}.txt")), body).expect("write corpus file");
    }

    #[test]
    fn counts_words_and_sentences_per_language() {
        let dir = tempdir().expect("tempdir");
        write_corpus(dir.path(), "en", &["The cat sat.", "the cat ran"]);
        write_corpus(dir.path(), "fr", &["Le chat"]);

        let artifacts = trainer().train(dir.path()).expect("training succeeds");
        let en = artifacts.model.profile("en").expect("en profile");
        assert_eq!(en.word_count("the"), 2);
        assert_eq!(en.word_count("cat"), 2);
        assert_eq!(en.sentence_count(), 2);
        assert_eq!(en.total_word_count(), 6);
        assert_eq!(artifacts.model.language_count(), 2);
        assert_eq!(artifacts.metrics.languages.len(), 2);
    }

    #[test]
    fn probability_tables_sum_to_one() {
        let dir = tempdir().expect("tempdir");
        write_corpus(dir.path(), "en", &["the cat sat on the mat"]);

        let artifacts = trainer().train(dir.path()).expect("training succeeds");
        let sum: f64 = artifacts
            .model
            .profile("en")
            .expect("profile")
            .probabilities()
            .map(|(_, prob)| prob)
            .sum();
        assert!(approx_eq!(f64, sum, 1.0, epsilon = 1e-9));
    }

    #[test]
    fn oov_equals_global_minimum_probability() {
        let dir = tempdir().expect("tempdir");
        write_corpus(dir.path(), "en", &["the the the rare"]);
        write_corpus(dir.path(), "fr", &["le le"]);

        let artifacts = trainer().train(dir.path()).expect("training succeeds");
        let min = artifacts.model.min_word_probability().expect("trained");
        assert!(approx_eq!(f64, artifacts.model.out_of_vocab_prob(), min, ulps = 2));
        assert!(approx_eq!(f64, min, 0.25, epsilon = 1e-12));
    }

    #[test]
    fn word_cap_bounds_only_the_capped_language() {
        let dir = tempdir().expect("tempdir");
        write_corpus(dir.path(), "en", &["one two three", "four five six"]);
        write_corpus(dir.path(), "fr", &["un deux", "trois quatre"]);

        let cfg = TrainerConfig::builder()
            .max_words_per_lang(4)
            .show_progress(false)
            .build()
            .expect("valid config");
        let artifacts = Trainer::new(cfg).train(dir.path()).expect("training succeeds");

        let en = artifacts.model.profile("en").expect("en profile");
        assert!(en.distinct_words() <= 4);
        let fr = artifacts.model.profile("fr").expect("fr profile");
        assert_eq!(fr.distinct_words(), 4);

        let en_stats = artifacts
            .metrics
            .languages
            .iter()
            .find(|stats| stats.language == "en")
            .expect("en stats");
        assert_eq!(en_stats.stop_reason, StopReason::WordCapReached);
    }

    #[test]
    fn empty_token_counting_matches_the_configured_policy() {
        let dir = tempdir().expect("tempdir");
        write_corpus(dir.path(), "en", &["a  b"]);

        let kept = trainer().train(dir.path()).expect("training succeeds");
        assert_eq!(
            kept.model.profile("en").expect("profile").word_count(""),
            1
        );
        assert_eq!(
            kept.model.profile("en").expect("profile").total_word_count(),
            3
        );

        let cfg = TrainerConfig::builder()
            .drop_empty_tokens(true)
            .show_progress(false)
            .build()
            .expect("valid config");
        let dropped = Trainer::new(cfg).train(dir.path()).expect("training succeeds");
        assert_eq!(
            dropped.model.profile("en").expect("profile").word_count(""),
            0
        );
        assert_eq!(
            dropped
                .model
                .profile("en")
                .expect("profile")
                .total_word_count(),
            2
        );
    }

    #[test]
    fn missing_directory_aborts_without_a_model() {
        let dir = tempdir().expect("tempdir");
        let err = trainer()
            .train(dir.path().join("absent"))
            .expect_err("training must fail");
        assert!(matches!(err, LexidError::InvalidConfig(_)));
    }

    #[test]
    fn records_the_training_directory_in_the_model() {
        let dir = tempdir().expect("tempdir");
        write_corpus(dir.path(), "en", &["the cat"]);

        let artifacts = trainer().train(dir.path()).expect("training succeeds");
        assert_eq!(artifacts.model.training_dir(), Some(dir.path()));
        assert!(artifacts.model.is_trained());
    }
}
