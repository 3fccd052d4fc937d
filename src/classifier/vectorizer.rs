use std::collections::HashMap;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use crate::text;

/// Default cap on the vocabulary size.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// A sparse TF-IDF feature vector.
///
/// Entries are (feature index, weight) pairs sorted by index; indices are
/// positions in the vectorizer's frozen vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(usize, f32)>,
    dim: usize,
}

impl FeatureVector {
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// Dimensionality of the dense space this vector lives in.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Sparse dot product against a dense weight vector.
    pub fn dot(&self, dense: &Array1<f32>) -> f32 {
        self.entries.iter().map(|&(i, w)| w * dense[i]).sum()
    }
}

/// Converts text into L2-normalized TF-IDF feature vectors.
///
/// The vocabulary is built once by [`TfidfVectorizer::fit`] from a training
/// corpus and frozen afterwards: terms are ranked by corpus-wide frequency
/// (ties broken by first-seen order) and capped at `max_features`. Stopwords
/// are removed before counting, and out-of-vocabulary tokens are silently
/// dropped at transform time.
///
/// # Example
/// ```
/// use moodscan::TfidfVectorizer;
///
/// let corpus = ["i feel so sad and alone", "great day today, feeling happy"];
/// let mut vectorizer = TfidfVectorizer::new();
/// vectorizer.fit(&corpus).unwrap();
///
/// let vector = vectorizer.transform("i am sad").unwrap();
/// assert!(!vector.entries().is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: HashMap<String, usize>,
    idf: Option<Array1<f32>>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::with_max_features(DEFAULT_MAX_FEATURES)
    }

    pub fn with_max_features(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: HashMap::new(),
            idf: None,
        }
    }

    /// Normalizes, tokenizes and stopword-filters a piece of text. Both fit
    /// and transform go through here so the two can never disagree.
    fn prepare(text: &str) -> Vec<String> {
        let normalized = text::normalize(text);
        text::tokenize(&normalized)
            .into_iter()
            .filter(|t| !text::is_stopword(t))
            .map(str::to_string)
            .collect()
    }

    /// Builds the vocabulary and IDF weights from a training corpus.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<(), PipelineError> {
        if corpus.is_empty() {
            return Err(PipelineError::Validation(
                "cannot fit a vectorizer on an empty corpus".to_string(),
            ));
        }

        let n_docs = corpus.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut next_rank = 0usize;

        for doc in corpus {
            let tokens = Self::prepare(doc.as_ref());
            let mut seen_in_doc: std::collections::HashSet<&str> =
                std::collections::HashSet::new();
            for token in &tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
                first_seen.entry(token.clone()).or_insert_with(|| {
                    let rank = next_rank;
                    next_rank += 1;
                    rank
                });
                seen_in_doc.insert(token);
            }
            for token in seen_in_doc {
                *doc_freq.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        // Rank by corpus-wide frequency, ties by first-seen order
        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| first_seen[&a.0].cmp(&first_seen[&b.0])));
        ranked.truncate(self.max_features);

        let mut idf = Array1::<f32>::zeros(ranked.len());
        let mut vocabulary = HashMap::with_capacity(ranked.len());
        for (index, (term, _)) in ranked.into_iter().enumerate() {
            let df = doc_freq[&term];
            // Smoothed IDF; strictly positive even for terms in every document
            idf[index] = (((1 + n_docs) as f32) / ((1 + df) as f32)).ln() + 1.0;
            vocabulary.insert(term, index);
        }

        self.vocabulary = vocabulary;
        self.idf = Some(idf);
        Ok(())
    }

    /// Maps text into the frozen vocabulary as an L2-normalized TF-IDF vector.
    ///
    /// Out-of-vocabulary tokens are dropped; text with no in-vocabulary tokens
    /// yields an empty (all-zero) vector, which is valid output. Calling this
    /// before [`TfidfVectorizer::fit`] is a programming error.
    pub fn transform(&self, text: &str) -> Result<FeatureVector, PipelineError> {
        let idf = self.idf.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("transform called before fit".to_string())
        })?;

        let mut counts: HashMap<usize, f32> = HashMap::new();
        for token in Self::prepare(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * idf[index]))
            .collect();
        entries.sort_by_key(|&(index, _)| index);

        let norm: f32 = entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 1e-10 {
            for entry in &mut entries {
                entry.1 /= norm;
            }
        }

        Ok(FeatureVector {
            entries,
            dim: self.vocabulary.len(),
        })
    }

    /// Transforms a batch of texts.
    pub fn transform_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<Vec<FeatureVector>, PipelineError> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        self.idf.is_some()
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(corpus: &[&str]) -> TfidfVectorizer {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(corpus).unwrap();
        vectorizer
    }

    #[test]
    fn test_transform_before_fit_is_an_error() {
        let vectorizer = TfidfVectorizer::new();
        let err = vectorizer.transform("hello").unwrap_err();
        assert!(matches!(err, PipelineError::NotFitted(_)));
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        let mut vectorizer = TfidfVectorizer::new();
        let err = vectorizer.fit::<&str>(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn test_vocabulary_excludes_stopwords() {
        let vectorizer = fitted(&["the cat and the dog", "a bird is flying"]);
        let vocab = vectorizer.vocabulary();
        assert!(!vocab.contains_key("the"));
        assert!(!vocab.contains_key("and"));
        assert!(vocab.contains_key("cat"));
        assert!(vocab.contains_key("bird"));
    }

    #[test]
    fn test_max_features_caps_vocabulary_by_frequency() {
        let corpus = ["sad sad sad happy happy alone"];
        let mut vectorizer = TfidfVectorizer::with_max_features(2);
        vectorizer.fit(&corpus).unwrap();

        let vocab = vectorizer.vocabulary();
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains_key("sad"));
        assert!(vocab.contains_key("happy"));
        assert!(!vocab.contains_key("alone"));
    }

    #[test]
    fn test_frequency_ties_break_by_first_seen_order() {
        let corpus = ["zebra apple", "zebra apple"];
        let mut vectorizer = TfidfVectorizer::with_max_features(1);
        vectorizer.fit(&corpus).unwrap();
        // both terms occur twice; "zebra" was seen first
        assert!(vectorizer.vocabulary().contains_key("zebra"));
    }

    #[test]
    fn test_transform_drops_out_of_vocabulary_tokens() {
        let vectorizer = fitted(&["sad alone", "happy day"]);
        let vector = vectorizer.transform("sad wombat").unwrap();

        let vocab_size = vectorizer.vocabulary_size();
        assert_eq!(vector.dim(), vocab_size);
        for &(index, weight) in vector.entries() {
            assert!(index < vocab_size);
            assert!(weight > 0.0);
        }
        assert_eq!(vector.entries().len(), 1); // only "sad" survives
    }

    #[test]
    fn test_transform_l2_normalizes() {
        let vectorizer = fitted(&["sad alone night", "happy day sun"]);
        let vector = vectorizer.transform("sad alone day").unwrap();
        let norm: f32 = vector.entries().iter().map(|&(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_of_unknown_text_is_empty_not_an_error() {
        let vectorizer = fitted(&["sad alone"]);
        let vector = vectorizer.transform("completely unrelated words").unwrap();
        assert!(vector.entries().is_empty());
    }

    #[test]
    fn test_serde_round_trip_preserves_outputs() {
        let vectorizer = fitted(&["i feel so sad and alone", "great day today, feeling happy"]);
        let json = serde_json::to_string(&vectorizer).unwrap();
        let restored: TfidfVectorizer = serde_json::from_str(&json).unwrap();

        let a = vectorizer.transform("i am sad today").unwrap();
        let b = restored.transform("i am sad today").unwrap();
        assert_eq!(a, b);
    }
}
