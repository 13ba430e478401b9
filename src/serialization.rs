//! Model blob persistence and human-facing model summaries.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde_json::{json, Value};

use crate::error::{LexidError, Result};
use crate::model::LanguageModel;

/// Persists the entire trained model state to a single binary file.
///
/// The blob is a bincode snapshot of the model value: every count table,
/// probability table, the out-of-vocabulary scalar, the completion flag, and
/// the training-directory reference.  Floats round-trip bit-identically.
pub fn save_model<P: AsRef<Path>>(model: &LanguageModel, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| LexidError::io(err, Some(path.to_path_buf())))?;
    bincode::serialize_into(BufWriter::new(file), model)?;
    Ok(())
}

/// Reconstructs a model from a blob written by [`save_model`].
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<LanguageModel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| LexidError::io(err, Some(path.to_path_buf())))?;
    let model = bincode::deserialize_from(BufReader::new(file))?;
    Ok(model)
}

/// Renders a JSON summary of a trained model.
///
/// The summary lists every language with its vocabulary size, sentence and
/// word counters, and most probable word, plus the shared out-of-vocabulary
/// probability.  Intended for inspection, not for reloading.
pub fn model_summary_json(model: &LanguageModel, pretty: bool) -> Result<String> {
    let languages: Vec<Value> = model
        .profiles()
        .map(|(code, profile)| {
            let top = profile.most_probable_word();
            json!({
                "language": code,
                "distinct_words": profile.distinct_words(),
                "sentences": profile.sentence_count(),
                "total_words": profile.total_word_count(),
                "most_probable_word": top.map(|(word, _)| word.to_string()),
                "most_probable_word_prob": top.map(|(_, prob)| prob),
            })
        })
        .collect();
    let summary = json!({
        "language_count": model.language_count(),
        "languages": languages,
        "out_of_vocab_prob": model.out_of_vocab_prob(),
        "trained": model.is_trained(),
        "training_dir": model.training_dir().map(|dir| dir.display().to_string()),
    });

    if pretty {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(serde_json::to_string(&summary)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerConfig;
    use tempfile::tempdir;

    fn sample_model() -> LanguageModel {
        LanguageModel::from_word_counts(
            [
                ("en", vec![("the", 7), ("cat", 3), ("sat", 1)]),
                ("fr", vec![("le", 5), ("chat", 2)]),
            ],
            TrainerConfig::default(),
        )
        .expect("model should build")
    }

    #[test]
    fn round_trip_preserves_the_entire_model() {
        let model = sample_model();
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("lexid.model");

        save_model(&model, &path).expect("save");
        let restored = load_model(&path).expect("load");

        assert_eq!(restored, model);
        assert_eq!(
            restored.out_of_vocab_prob().to_bits(),
            model.out_of_vocab_prob().to_bits()
        );
        let original = model.profile("en").expect("profile");
        let loaded = restored.profile("en").expect("profile");
        for (word, prob) in original.probabilities() {
            let restored_prob = loaded.probability(word).expect("word survives");
            assert_eq!(restored_prob.to_bits(), prob.to_bits());
        }
    }

    #[test]
    fn loading_a_corrupt_blob_is_a_serialization_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.model");
        std::fs::write(&path, b"not a model").expect("write");
        let err = load_model(&path).expect_err("must fail");
        assert!(matches!(err, LexidError::Serialization(_)));
    }

    #[test]
    fn summary_json_is_well_formed() {
        let model = sample_model();
        let json = model_summary_json(&model, true).expect("summary");
        let value: Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["language_count"], 2);
        assert_eq!(value["languages"][0]["language"], "en");
        assert_eq!(value["languages"][0]["most_probable_word"], "the");
        assert!(value["out_of_vocab_prob"].is_f64());
    }
}
