use std::fmt;

use super::error::PipelineError;
use super::model::LogisticRegression;
use super::vectorizer::TfidfVectorizer;
use crate::artifact::{ArtifactError, ArtifactStore};

/// The two screening outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Depressed,
    NotDepressed,
}

impl Label {
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Label::Depressed
        } else {
            Label::NotDepressed
        }
    }

    pub fn as_class(self) -> u8 {
        match self {
            Label::Depressed => 1,
            Label::NotDepressed => 0,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Depressed => write!(f, "⚠️ Depressed"),
            Label::NotDepressed => write!(f, "✅ Not Depressed"),
        }
    }
}

/// A loaded, immutable (vectorizer, model) pair ready for inference.
///
/// A `Classifier` only ever exists in the loaded state: it is constructed by
/// [`Classifier::load`] from a persisted artifact (or assembled from freshly
/// fitted parts by the trainer) and is read-only thereafter. There is no
/// unload; dropping the value is the only transition out.
///
/// # Example
/// ```no_run
/// use moodscan::{ArtifactStore, Classifier};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = ArtifactStore::new("artifacts")?;
/// let classifier = Classifier::load(&store)?;
/// let label = classifier.classify("i feel alone")?;
/// println!("Prediction: {}", label);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    vectorizer: TfidfVectorizer,
    model: LogisticRegression,
}

impl Classifier {
    /// Assembles a classifier from an already-fitted vectorizer and model.
    ///
    /// Fails with [`PipelineError::NotFitted`] if either part is unfitted and
    /// [`PipelineError::Validation`] if their dimensionalities disagree.
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        model: LogisticRegression,
    ) -> Result<Self, PipelineError> {
        if !vectorizer.is_fitted() {
            return Err(PipelineError::NotFitted(
                "vectorizer has not been fitted".to_string(),
            ));
        }
        let n_features = model.n_features().ok_or_else(|| {
            PipelineError::NotFitted("model has not been fitted".to_string())
        })?;
        if n_features != vectorizer.vocabulary_size() {
            return Err(PipelineError::Validation(format!(
                "model dimensionality {} does not match vocabulary size {}",
                n_features,
                vectorizer.vocabulary_size()
            )));
        }
        Ok(Self { vectorizer, model })
    }

    /// Loads the persisted artifact pair from a store.
    pub fn load(store: &ArtifactStore) -> Result<Self, ArtifactError> {
        let (vectorizer, model) = store.load()?;
        Self::from_parts(vectorizer, model)
            .map_err(|e| ArtifactError::Corrupt(e.to_string()))
    }

    /// Classifies a piece of raw text.
    ///
    /// The text is normalized and vectorized with the frozen vocabulary, then
    /// scored by the model. No state is carried between calls.
    pub fn classify(&self, text: &str) -> Result<Label, PipelineError> {
        self.classify_with_score(text).map(|(label, _)| label)
    }

    /// Like [`Classifier::classify`], also returning the probability of the
    /// positive class.
    pub fn classify_with_score(&self, text: &str) -> Result<(Label, f32), PipelineError> {
        let vector = self.vectorizer.transform(text)?;
        let probability = self.model.predict_probability(&vector)?;
        Ok((Label::from_class(u8::from(probability >= 0.5)), probability))
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Depressed.to_string(), "⚠️ Depressed");
        assert_eq!(Label::NotDepressed.to_string(), "✅ Not Depressed");
    }

    #[test]
    fn test_label_class_round_trip() {
        assert_eq!(Label::from_class(1), Label::Depressed);
        assert_eq!(Label::from_class(0), Label::NotDepressed);
        assert_eq!(Label::Depressed.as_class(), 1);
        assert_eq!(Label::NotDepressed.as_class(), 0);
    }

    #[test]
    fn test_from_parts_rejects_unfitted_components() {
        let result = Classifier::from_parts(TfidfVectorizer::new(), LogisticRegression::new());
        assert!(matches!(result, Err(PipelineError::NotFitted(_))));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_dimensions() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&["sad alone dark"]).unwrap();

        let mut other = TfidfVectorizer::new();
        other.fit(&["happy"]).unwrap();
        let features = other.transform_batch(&["happy", "happy"]).unwrap();
        let mut model = LogisticRegression::new();
        model.fit(&features, &[1, 0]).unwrap();

        let result = Classifier::from_parts(vectorizer, model);
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }
}
