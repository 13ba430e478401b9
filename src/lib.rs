//! Word-frequency language identification library and CLI.
//!
//! The crate trains a per-language word-probability model from a directory of
//! normalized corpus files (one `lang-<code>.txt` per language), scores
//! sentences against every known language by summed log-probability, and
//! persists the trained model as a compact binary snapshot.  Typical usage
//! trains a `LanguageModel`, classifies sentences through a `Scorer`, and
//! saves the model for later runs.
//!
//! ```no_run
//! use lexid::{Scorer, Trainer, TrainerConfig};
//!
//! # fn main() -> lexid::Result<()> {
//! let cfg = TrainerConfig::builder()
//!     .max_words_per_lang(10_000)
//!     .show_progress(false)
//!     .build()?;
//! let trainer = Trainer::new(cfg);
//! let artifacts = trainer.train("/path/to/corpus")?;
//! let scorer = Scorer::new(&artifacts.model)?;
//! let prediction = scorer.classify("le chat est noir")?;
//! println!("{} ({:.3})", prediction.language, prediction.log_prob);
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting
//! the library portion only can disable default features to avoid the CLI
//! dependencies: `lexid = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::multiple_crate_versions
)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod scorer;
pub mod serialization;
pub mod tokenize;
pub mod trainer;

pub use config::{TrainerBuilder, TrainerConfig};
pub use error::{LexidError, Result};
pub use evaluate::EvalReport;
pub use metrics::{LanguageStats, StopReason, TrainingMetrics};
pub use model::{LanguageModel, LanguageProfile};
pub use normalize::NormalizeSummary;
pub use scorer::{Prediction, Scorer};
pub use trainer::{Trainer, TrainerArtifacts};
