//! The immutable trained model: per-language word tables plus the shared
//! out-of-vocabulary probability.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::TrainerConfig;
use crate::error::{LexidError, Result};

/// Placeholder out-of-vocabulary probability carried by untrained models.
const DEFAULT_OOV_PROB: f64 = 1e-10;

/// Word tables and running statistics for a single language.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageProfile {
    word_counts: FxHashMap<String, u64>,
    word_probs: FxHashMap<String, f64>,
    sentence_count: u64,
    total_word_count: u64,
}

impl LanguageProfile {
    /// Builds a profile from raw word counts, deriving the probability table.
    ///
    /// Each word's probability is its count divided by the sum of all counts
    /// in the table (with repetition), so the probabilities sum to 1.0 even
    /// when a distinct-word cap truncated the corpus.
    pub(crate) fn from_counts(
        word_counts: FxHashMap<String, u64>,
        sentence_count: u64,
        total_word_count: u64,
    ) -> Self {
        let sum: u64 = word_counts.values().sum();
        let word_probs = if sum == 0 {
            FxHashMap::default()
        } else {
            word_counts
                .iter()
                .map(|(word, &count)| (word.clone(), count as f64 / sum as f64))
                .collect()
        };
        Self {
            word_counts,
            word_probs,
            sentence_count,
            total_word_count,
        }
    }

    /// Returns the occurrence count recorded for a word.
    #[must_use]
    pub fn word_count(&self, word: &str) -> u64 {
        self.word_counts.get(word).copied().unwrap_or(0)
    }

    /// Returns the probability of a word, or `None` when it is out of vocabulary.
    #[must_use]
    pub fn probability(&self, word: &str) -> Option<f64> {
        self.word_probs.get(word).copied()
    }

    /// Iterates over the probability table.
    pub fn probabilities(&self) -> impl Iterator<Item = (&str, f64)> {
        self.word_probs.iter().map(|(word, &prob)| (word.as_str(), prob))
    }

    /// Number of distinct words in the count table.
    #[must_use]
    pub fn distinct_words(&self) -> usize {
        self.word_counts.len()
    }

    /// Number of sentences consumed while building the table.
    #[must_use]
    pub fn sentence_count(&self) -> u64 {
        self.sentence_count
    }

    /// Number of words consumed while building the table, counting repeats.
    #[must_use]
    pub fn total_word_count(&self) -> u64 {
        self.total_word_count
    }

    /// Smallest probability in the table, or `None` when the table is empty.
    #[must_use]
    pub fn min_probability(&self) -> Option<f64> {
        self.word_probs.values().copied().reduce(f64::min)
    }

    /// Most probable word and its probability; ties break to the
    /// lexicographically smallest word.
    #[must_use]
    pub fn most_probable_word(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (word, &prob) in &self.word_probs {
            let better = match best {
                None => true,
                Some((best_word, best_prob)) => {
                    prob > best_prob || (prob == best_prob && word.as_str() < best_word)
                }
            };
            if better {
                best = Some((word.as_str(), prob));
            }
        }
        best
    }
}

/// Trained language-identification model.
///
/// Produced by a completed training pass (or reconstructed from a persisted
/// snapshot) and read-only thereafter.  Languages enumerate in lexicographic
/// code order, which is also the documented tie-break order for scoring.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageModel {
    profiles: BTreeMap<String, LanguageProfile>,
    out_of_vocab_prob: f64,
    training_complete: bool,
    training_dir: Option<PathBuf>,
    config: TrainerConfig,
}

impl LanguageModel {
    /// Assembles a complete model from finished per-language profiles.
    ///
    /// The shared out-of-vocabulary probability is derived here, after every
    /// profile's table is final: it is the global minimum word probability
    /// scaled by [`TrainerConfig::oov_scale`].
    pub(crate) fn from_profiles(
        profiles: BTreeMap<String, LanguageProfile>,
        training_dir: Option<PathBuf>,
        config: TrainerConfig,
    ) -> Result<Self> {
        if profiles.is_empty() {
            return Err(LexidError::InvalidConfig(
                "a model requires at least one language".into(),
            ));
        }
        let min_prob = profiles
            .values()
            .filter_map(LanguageProfile::min_probability)
            .fold(f64::INFINITY, f64::min);
        if !min_prob.is_finite() {
            return Err(LexidError::InvalidConfig(
                "training corpus contained no words".into(),
            ));
        }
        Ok(Self {
            out_of_vocab_prob: min_prob * config.oov_scale,
            profiles,
            training_complete: true,
            training_dir,
            config,
        })
    }

    /// Builds a trained model directly from per-language word counts.
    ///
    /// Probability tables and the out-of-vocabulary scalar are computed
    /// exactly as [`crate::Trainer::train`] computes them; sentence counters
    /// stay at zero since no corpus lines were consumed.  Useful for small
    /// injected models.
    pub fn from_word_counts<I, L, W>(counts: I, config: TrainerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (L, Vec<(W, u64)>)>,
        L: Into<String>,
        W: Into<String>,
    {
        config.validate()?;
        let mut profiles = BTreeMap::new();
        for (language, words) in counts {
            let mut word_counts: FxHashMap<String, u64> = FxHashMap::default();
            let mut total = 0u64;
            for (word, count) in words {
                total += count;
                *word_counts.entry(word.into()).or_insert(0) += count;
            }
            profiles.insert(
                language.into(),
                LanguageProfile::from_counts(word_counts, 0, total),
            );
        }
        Self::from_profiles(profiles, None, config)
    }

    /// Creates an empty, untrained model.
    ///
    /// Scoring, evaluation, and minimum-probability queries reject it with
    /// [`LexidError::NotTrained`].
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
            out_of_vocab_prob: DEFAULT_OOV_PROB,
            training_complete: false,
            training_dir: None,
            config: TrainerConfig::default(),
        }
    }

    /// Returns `true` once a training pass has run to completion.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.training_complete
    }

    /// Iterates over the known language codes in lexicographic order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Number of languages in the model.
    #[must_use]
    pub fn language_count(&self) -> usize {
        self.profiles.len()
    }

    /// Returns the profile for a language code, if known.
    #[must_use]
    pub fn profile(&self, language: &str) -> Option<&LanguageProfile> {
        self.profiles.get(language)
    }

    /// Iterates over `(code, profile)` pairs in lexicographic code order.
    pub fn profiles(&self) -> impl Iterator<Item = (&str, &LanguageProfile)> {
        self.profiles
            .iter()
            .map(|(code, profile)| (code.as_str(), profile))
    }

    /// The shared probability substituted for words absent from a language's table.
    #[must_use]
    pub fn out_of_vocab_prob(&self) -> f64 {
        self.out_of_vocab_prob
    }

    /// The training directory the model was built from, when recorded.
    #[must_use]
    pub fn training_dir(&self) -> Option<&Path> {
        self.training_dir.as_deref()
    }

    /// Returns the [`TrainerConfig`] used to produce the model.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Smallest word probability across every language's table.
    pub fn min_word_probability(&self) -> Result<f64> {
        if !self.training_complete {
            return Err(LexidError::NotTrained(
                "the minimum word probability exists only after training".into(),
            ));
        }
        self.profiles
            .values()
            .filter_map(LanguageProfile::min_probability)
            .reduce(f64::min)
            .ok_or_else(|| LexidError::Internal("trained model holds no probabilities".into()))
    }
}
