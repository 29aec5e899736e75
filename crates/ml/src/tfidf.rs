//! TF-IDF vectorizer over a small phrase corpus.

use std::collections::{HashMap, HashSet};

use crate::tokenize::tokenize;

/// Fitted term weighting. Vectors are raw term counts scaled by smoothed IDF
/// and L2-normalised, so the dot product of two vectors is their cosine.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    n_documents: usize,
}

impl TfIdfVectorizer {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut vocabulary = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in documents {
            let unique = tokenize(doc.as_ref()).into_iter().collect::<HashSet<_>>();
            for token in unique {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token).or_insert(next);
                if idx == document_frequency.len() {
                    document_frequency.push(0);
                }
                document_frequency[idx] += 1;
            }
        }

        // idf = ln((1 + n) / (1 + df)) + 1
        let n = documents.len() as f32;
        let idf = document_frequency
            .iter()
            .map(|df| ((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0)
            .collect();

        Self {
            vocabulary,
            idf,
            n_documents: documents.len(),
        }
    }

    pub fn transform(&self, document: &str) -> Vec<f32> {
        let mut weights = vec![0.0_f32; self.vocabulary.len()];

        for token in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                weights[idx] += 1.0;
            }
        }

        for (weight, idf) in weights.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }

        normalize(&mut weights);
        weights
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut a_norm = 0.0;
    let mut b_norm = 0.0;
    for (lhs, rhs) in a.iter().zip(b.iter()) {
        dot += lhs * rhs;
        a_norm += lhs * lhs;
        b_norm += rhs * rhs;
    }

    if a_norm == 0.0 || b_norm == 0.0 {
        0.0
    } else {
        dot / (a_norm.sqrt() * b_norm.sqrt())
    }
}

fn normalize(values: &mut [f32]) {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in values.iter_mut() {
            *value /= norm;
        }
    }
}
