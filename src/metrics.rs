//! Statistics describing a completed training pass.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reason a language's counting pass terminated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// The full corpus file was consumed.
    CorpusExhausted,
    /// The configured distinct-word cap was reached before the file ended.
    WordCapReached,
}

/// Per-language statistics captured while counting words.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageStats {
    /// Language code the statistics belong to.
    pub language: String,
    /// Number of distinct words retained in the count table.
    pub distinct_words: usize,
    /// Number of sentences (corpus lines) processed.
    pub sentence_count: u64,
    /// Number of words processed, counting repeats.
    pub total_word_count: u64,
    /// Reason the counting pass ended.
    pub stop_reason: StopReason,
}

/// Aggregate metrics produced by a training session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingMetrics {
    /// Per-language snapshots, ordered by language code.
    pub languages: Vec<LanguageStats>,
    /// Total duration of the training session.
    pub total_duration: Duration,
}
