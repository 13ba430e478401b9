//! Configuration builder controlling training behavior.

use serde::{Deserialize, Serialize};

use crate::error::{LexidError, Result};

/// Configuration for word-frequency language-model training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainerConfig {
    /// Cap on distinct words collected per language; `0` trains on the full corpus.
    pub max_words_per_lang: usize,
    /// Sentences between progress reports during training; `0` is silent.
    pub report_interval: usize,
    /// Factor in `(0, 1]` applied to the global minimum word probability when
    /// deriving the shared out-of-vocabulary probability.
    pub oov_scale: f64,
    /// Drops the empty-string tokens produced by consecutive spaces instead of
    /// counting them as words.  Stored in the trained model so that scoring
    /// tokenizes queries exactly the way training tokenized the corpus.
    pub drop_empty_tokens: bool,
    /// Enables per-language summary logging through the `log` facade.
    pub show_progress: bool,
}

impl TrainerConfig {
    /// Returns a builder initialised with [`TrainerConfig::default`].
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::default()
    }

    /// Validates the invariants required for training.
    pub fn validate(&self) -> Result<()> {
        if !self.oov_scale.is_finite() || self.oov_scale <= 0.0 || self.oov_scale > 1.0 {
            return Err(LexidError::InvalidConfig(format!(
                "oov_scale ({}) must lie in (0, 1] so unseen words never outscore known ones",
                self.oov_scale
            )));
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_words_per_lang: 0,
            report_interval: 0,
            oov_scale: 1.0,
            drop_empty_tokens: false,
            show_progress: true,
        }
    }
}

/// Builder for [`TrainerConfig`].
#[derive(Debug, Default, Clone)]
pub struct TrainerBuilder {
    cfg: TrainerConfig,
}

impl TrainerBuilder {
    /// Creates a builder with [`TrainerConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the distinct-word cap per language (0 = unlimited).
    #[must_use]
    pub fn max_words_per_lang(mut self, value: usize) -> Self {
        self.cfg.max_words_per_lang = value;
        self
    }

    /// Sets the progress-report interval in sentences (0 = silent).
    #[must_use]
    pub fn report_interval(mut self, value: usize) -> Self {
        self.cfg.report_interval = value;
        self
    }

    /// Sets the factor applied to the global minimum word probability.
    #[must_use]
    pub fn oov_scale(mut self, value: f64) -> Self {
        self.cfg.oov_scale = value;
        self
    }

    /// Enables or disables dropping of empty-string tokens.
    #[must_use]
    pub fn drop_empty_tokens(mut self, enabled: bool) -> Self {
        self.cfg.drop_empty_tokens = enabled;
        self
    }

    /// Enables or disables per-language summary logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`TrainerConfig`].
    pub fn build(self) -> Result<TrainerConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = TrainerConfig::builder()
            .max_words_per_lang(10_000)
            .report_interval(500)
            .drop_empty_tokens(true)
            .show_progress(false)
            .build()
            .expect("config should be valid");
        assert_eq!(cfg.max_words_per_lang, 10_000);
        assert_eq!(cfg.report_interval, 500);
        assert!(cfg.drop_empty_tokens);
        assert!(!cfg.show_progress);
    }

    #[test]
    fn validate_rejects_zero_oov_scale() {
        let cfg = TrainerConfig {
            oov_scale: 0.0,
            ..TrainerConfig::default()
        };
        let err = cfg.validate().expect_err("validation should fail");
        assert!(matches!(
            err,
            LexidError::InvalidConfig(message) if message.contains("oov_scale")
        ));
    }

    #[test]
    fn validate_rejects_amplifying_oov_scale() {
        let err = TrainerConfig::builder()
            .oov_scale(1.5)
            .build()
            .expect_err("scale above 1 must be rejected");
        assert!(matches!(err, LexidError::InvalidConfig(_)));
    }
}
