//! Log-probability scoring and argmax language selection.

use serde::Serialize;

use crate::error::{LexidError, Result};
use crate::model::{LanguageModel, LanguageProfile};
use crate::tokenize::tokenize_with;

/// Best-matching language for a scored sentence.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Prediction {
    /// Winning language code.
    pub language: String,
    /// Summed natural-log probability of the sentence under that language.
    pub log_prob: f64,
}

/// Scores sentences against every language of a trained model.
///
/// Log-probabilities are summed rather than probabilities multiplied so that
/// long sentences cannot underflow to zero.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    model: &'a LanguageModel,
}

impl<'a> Scorer<'a> {
    /// Wraps a trained model, failing fast when training never completed.
    pub fn new(model: &'a LanguageModel) -> Result<Self> {
        if !model.is_trained() {
            return Err(LexidError::NotTrained(
                "scoring requires a completed training pass".into(),
            ));
        }
        Ok(Self { model })
    }

    /// Returns the language maximizing the sentence log-probability.
    ///
    /// Equal scores break to the lexicographically smallest language code,
    /// the model's enumeration order.
    pub fn classify(&self, sentence: &str) -> Result<Prediction> {
        let words = tokenize_with(sentence, self.model.config().drop_empty_tokens);
        let mut best: Option<Prediction> = None;
        for (language, profile) in self.model.profiles() {
            let log_prob = self.log_prob_for(&words, profile);
            if best.as_ref().map_or(true, |current| log_prob > current.log_prob) {
                best = Some(Prediction {
                    language: language.to_string(),
                    log_prob,
                });
            }
        }
        best.ok_or_else(|| LexidError::Internal("trained model has no languages".into()))
    }

    /// Sums the per-token log-probabilities of a sentence under one language.
    pub fn score_language(&self, sentence: &str, language: &str) -> Result<f64> {
        let profile = self.model.profile(language).ok_or_else(|| {
            LexidError::InvalidConfig(format!("unknown language code {language:?}"))
        })?;
        let words = tokenize_with(sentence, self.model.config().drop_empty_tokens);
        Ok(self.log_prob_for(&words, profile))
    }

    fn log_prob_for(&self, words: &[String], profile: &LanguageProfile) -> f64 {
        let oov = self.model.out_of_vocab_prob();
        words
            .iter()
            .map(|word| profile.probability(word).unwrap_or(oov).ln())
            .sum()
    }
}
