use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use safar_core::{normalize_text, Intent, IntentExampleSet};
use serde::Deserialize;
use tracing::debug;

use crate::tfidf::{cosine_similarity, TfIdfVectorizer};
use crate::{IntentClassifier, IntentPrediction};

#[derive(Debug, Deserialize)]
struct LabeledExample {
    text: String,
    intent: String,
}

/// Reads `{"text": ..., "intent": ...}` lines. Labels that do not name a
/// dispatchable intent are skipped.
pub fn load_examples_jsonl(path: impl AsRef<Path>) -> Result<IntentExampleSet> {
    let raw = fs::read_to_string(path.as_ref()).with_context(|| {
        format!(
            "failed reading intent training dataset at {}",
            path.as_ref().display()
        )
    })?;

    let mut examples = IntentExampleSet::new();
    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let example: LabeledExample = serde_json::from_str(line)
            .with_context(|| format!("invalid jsonl training line {}", line_no + 1))?;
        match Intent::parse(&example.intent) {
            Some(Intent::Unknown) | None => {
                debug!(label = %example.intent, "skipping unrecognised intent label");
            }
            Some(intent) => examples.push(intent, example.text),
        }
    }

    if examples.is_empty() {
        anyhow::bail!("training dataset produced zero intent examples");
    }

    Ok(examples)
}

/// Nearest labelled example in TF-IDF space. The winning example must beat
/// `threshold`, otherwise the text is `Intent::Unknown`.
#[derive(Debug, Clone)]
pub struct NearestExampleClassifier {
    model_name: &'static str,
    vectorizer: TfIdfVectorizer,
    examples: Vec<(Intent, Vec<f32>)>,
    threshold: f32,
}

impl NearestExampleClassifier {
    pub const DEFAULT_THRESHOLD: f32 = 0.5;

    pub fn fit(examples: &IntentExampleSet, threshold: f32) -> Result<Self> {
        if examples.is_empty() {
            anyhow::bail!("cannot fit an intent classifier without examples");
        }

        let corpus = examples
            .iter()
            .map(|(_, phrase)| normalize_text(phrase))
            .collect::<Vec<_>>();
        let vectorizer = TfIdfVectorizer::fit(&corpus);

        let vectors = examples
            .iter()
            .zip(&corpus)
            .map(|((intent, _), doc)| (intent, vectorizer.transform(doc)))
            .collect();

        Ok(Self {
            model_name: "tfidf-nearest-example",
            vectorizer,
            examples: vectors,
            threshold,
        })
    }

    /// Index and similarity of the closest example; the first one wins ties.
    pub fn best_match(&self, text: &str) -> Option<(usize, f32)> {
        let query = self.vectorizer.transform(&normalize_text(text));
        let mut best: Option<(usize, f32)> = None;

        for (idx, (_, vector)) in self.examples.iter().enumerate() {
            let score = cosine_similarity(&query, vector);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((idx, score));
            }
        }

        best
    }
}

impl IntentClassifier for NearestExampleClassifier {
    fn predict(&self, text: &str) -> IntentPrediction {
        let (intent, confidence) = match self.best_match(text) {
            Some((idx, score)) if score > self.threshold => (self.examples[idx].0, score),
            Some((_, score)) => (Intent::Unknown, score),
            None => (Intent::Unknown, 0.0),
        };

        IntentPrediction {
            intent,
            confidence,
            model: self.model_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> NearestExampleClassifier {
        NearestExampleClassifier::fit(
            &IntentExampleSet::builtin(),
            NearestExampleClassifier::DEFAULT_THRESHOLD,
        )
        .unwrap()
    }

    #[test]
    fn every_example_classifies_as_its_own_intent() {
        let examples = IntentExampleSet::builtin();
        let classifier = builtin();

        for (intent, phrase) in examples.iter() {
            let prediction = classifier.predict(phrase);
            assert_eq!(prediction.intent, intent, "phrase {phrase:?}");
            assert!(prediction.confidence > 0.99, "phrase {phrase:?}");
        }
    }

    #[test]
    fn unrelated_text_is_unknown() {
        let classifier = builtin();
        assert_eq!(classifier.predict("purple elephants dance").intent, Intent::Unknown);
        assert_eq!(classifier.predict("").intent, Intent::Unknown);
        assert_eq!(classifier.predict("").confidence, 0.0);
    }

    #[test]
    fn close_paraphrases_still_match() {
        let classifier = builtin();
        assert_eq!(classifier.predict("Book a flight please").intent, Intent::BookFlight);
        assert_eq!(classifier.predict("GOODBYE!").intent, Intent::Farewell);
        assert_eq!(classifier.predict("show my booking").intent, Intent::MyBooking);
    }

    #[test]
    fn contractions_keep_their_clipped_stems() {
        let classifier = builtin();

        // "ca" is not in the vocabulary, so "can't" must not drift to "what can you do"
        let cant = classifier.predict("can't");
        assert_eq!(cant.intent, Intent::Unknown);
        assert_eq!(cant.confidence, 0.0);

        let dont = classifier.predict("don't you");
        assert_eq!(dont.intent, Intent::Help);
        assert!(dont.confidence > 0.6, "confidence {}", dont.confidence);
    }

    #[test]
    fn ties_resolve_to_the_first_example() {
        let mut examples = IntentExampleSet::new();
        examples.push(Intent::Help, "assist");
        examples.push(Intent::Farewell, "assist");
        let classifier = NearestExampleClassifier::fit(&examples, 0.5).unwrap();

        assert_eq!(classifier.best_match("assist").map(|(idx, _)| idx), Some(0));
        assert_eq!(classifier.predict("assist").intent, Intent::Help);
    }

    #[test]
    fn threshold_above_one_rejects_everything() {
        let classifier = NearestExampleClassifier::fit(&IntentExampleSet::builtin(), 1.5).unwrap();
        assert_eq!(classifier.predict("help").intent, Intent::Unknown);
    }

    #[test]
    fn empty_example_set_is_rejected() {
        assert!(NearestExampleClassifier::fit(&IntentExampleSet::new(), 0.5).is_err());
    }
}
