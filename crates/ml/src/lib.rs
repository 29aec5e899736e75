mod nearest;
mod tfidf;
mod tokenize;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use safar_core::{Intent, IntentExampleSet};
use tracing::{info, warn};

pub use nearest::{load_examples_jsonl, NearestExampleClassifier};
pub use tfidf::TfIdfVectorizer;
pub use tokenize::tokenize;

#[derive(Debug, Clone)]
pub struct IntentPrediction {
    pub intent: Intent,
    pub confidence: f32,
    pub model: &'static str,
}

pub trait IntentClassifier: Send + Sync {
    fn predict(&self, text: &str) -> IntentPrediction;
}

/// Classifier plus the example set it was fitted on. The examples are kept
/// around because the help reply quotes them.
#[derive(Clone)]
pub struct SafarMlStack {
    pub classifier: Arc<dyn IntentClassifier>,
    pub examples: Arc<IntentExampleSet>,
}

impl SafarMlStack {
    pub fn builtin(threshold: f32) -> Result<Self> {
        Self::from_examples(IntentExampleSet::builtin(), threshold)
    }

    pub fn from_examples(examples: IntentExampleSet, threshold: f32) -> Result<Self> {
        let classifier = NearestExampleClassifier::fit(&examples, threshold)?;
        Ok(Self {
            classifier: Arc::new(classifier),
            examples: Arc::new(examples),
        })
    }

    /// Fits on the JSONL dataset when one is given and usable, otherwise on
    /// the built-in phrases.
    pub fn load(dataset_path: Option<&Path>, threshold: f32) -> Result<Self> {
        let Some(path) = dataset_path else {
            return Self::builtin(threshold);
        };

        match load_examples_jsonl(path).and_then(|examples| Self::from_examples(examples, threshold)) {
            Ok(stack) => {
                info!(
                    dataset = %path.display(),
                    examples = stack.examples.len(),
                    "intent classifier fitted from dataset"
                );
                Ok(stack)
            }
            Err(err) => {
                warn!(
                    dataset = %path.display(),
                    error = %err,
                    "falling back to built-in intent examples"
                );
                Self::builtin(threshold)
            }
        }
    }
}
