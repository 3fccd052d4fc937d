use log::warn;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use super::vectorizer::FeatureVector;

/// Default cap on gradient descent iterations.
pub const DEFAULT_MAX_ITER: usize = 200;

/// Binary logistic regression over sparse TF-IDF features.
///
/// Trained by batch gradient descent until the gradient norm drops below the
/// tolerance or the iteration cap is reached. Hitting the cap is not an error:
/// a warning is logged and the best-effort parameters are kept. Training is
/// fully deterministic (zero-initialized, no randomness), so two fits on
/// identical input produce identical parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Option<Array1<f32>>,
    bias: f32,
    learning_rate: f32,
    max_iter: usize,
    tolerance: f32,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            learning_rate: 0.5,
            max_iter: DEFAULT_MAX_ITER,
            tolerance: 1e-4,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sigmoid activation: σ(z) = 1 / (1 + e^(-z))
    fn sigmoid(z: f32) -> f32 {
        1.0 / (1.0 + (-z).exp())
    }

    /// Fits the model to vectorized training data.
    ///
    /// # Arguments
    /// * `features` - One sparse vector per sample, all of equal dimensionality
    /// * `labels` - Binary labels (0 or 1), one per sample
    pub fn fit(
        &mut self,
        features: &[FeatureVector],
        labels: &[u8],
    ) -> Result<(), PipelineError> {
        if features.len() != labels.len() {
            return Err(PipelineError::Validation(format!(
                "feature/label count mismatch: {} vs {}",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(PipelineError::Validation(
                "cannot fit with zero samples".to_string(),
            ));
        }
        if let Some(label) = labels.iter().find(|&&l| l > 1) {
            return Err(PipelineError::Validation(format!(
                "labels must be 0 or 1, got {}",
                label
            )));
        }

        let n_features = features[0].dim();
        if features.iter().any(|f| f.dim() != n_features) {
            return Err(PipelineError::Validation(
                "feature vectors have inconsistent dimensionality".to_string(),
            ));
        }

        let n_samples = features.len() as f32;
        let mut weights = Array1::<f32>::zeros(n_features);
        let mut bias = 0.0f32;
        let mut converged = false;

        for _ in 0..self.max_iter {
            let mut weight_grad = Array1::<f32>::zeros(n_features);
            let mut bias_grad = 0.0f32;

            for (vector, &label) in features.iter().zip(labels) {
                let z = bias + vector.dot(&weights);
                let error = Self::sigmoid(z) - label as f32;
                bias_grad += error;
                for &(index, value) in vector.entries() {
                    weight_grad[index] += error * value;
                }
            }

            bias_grad /= n_samples;
            weight_grad /= n_samples;

            bias -= self.learning_rate * bias_grad;
            weights.scaled_add(-self.learning_rate, &weight_grad);

            let max_grad = weight_grad
                .iter()
                .fold(bias_grad.abs(), |acc, g| acc.max(g.abs()));
            if max_grad < self.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                "gradient descent hit the {} iteration cap before converging; keeping best-effort parameters",
                self.max_iter
            );
        }

        self.weights = Some(weights);
        self.bias = bias;
        Ok(())
    }

    /// Probability of the positive class for one sample.
    pub fn predict_probability(&self, vector: &FeatureVector) -> Result<f32, PipelineError> {
        let weights = self.weights.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("predict called before fit".to_string())
        })?;
        if vector.dim() != weights.len() {
            return Err(PipelineError::Prediction(format!(
                "feature dimensionality {} does not match model ({})",
                vector.dim(),
                weights.len()
            )));
        }
        Ok(Self::sigmoid(self.bias + vector.dot(weights)))
    }

    /// Predicts 0 or 1; label 1 iff the probability is at least 0.5.
    pub fn predict(&self, vector: &FeatureVector) -> Result<u8, PipelineError> {
        Ok(u8::from(self.predict_probability(vector)? >= 0.5))
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// Dimensionality of the fitted weight vector, if fitted.
    pub fn n_features(&self) -> Option<usize> {
        self.weights.as_ref().map(Array1::len)
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::vectorizer::TfidfVectorizer;

    fn toy_features() -> (Vec<FeatureVector>, Vec<u8>, TfidfVectorizer) {
        let corpus = [
            "i feel so sad and alone",
            "everything is hopeless and dark",
            "great day today, feeling happy",
            "wonderful sunshine and good friends",
        ];
        let labels = vec![1, 1, 0, 0];
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus).unwrap();
        let features = vectorizer.transform_batch(&corpus).unwrap();
        (features, labels, vectorizer)
    }

    #[test]
    fn test_predict_before_fit_is_an_error() {
        let (features, _, _) = toy_features();
        let model = LogisticRegression::new();
        let err = model.predict(&features[0]).unwrap_err();
        assert!(matches!(err, PipelineError::NotFitted(_)));
    }

    #[test]
    fn test_fit_rejects_mismatched_lengths() {
        let (features, _, _) = toy_features();
        let mut model = LogisticRegression::new();
        let err = model.fit(&features, &[1]).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn test_fit_rejects_non_binary_labels() {
        let (features, _, _) = toy_features();
        let mut model = LogisticRegression::new();
        let err = model.fit(&features, &[1, 1, 0, 3]).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn test_fit_separates_toy_corpus() {
        let (features, labels, _) = toy_features();
        let mut model = LogisticRegression::new();
        model.fit(&features, &labels).unwrap();

        for (vector, &label) in features.iter().zip(&labels) {
            assert_eq!(model.predict(vector).unwrap(), label);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (features, labels, _) = toy_features();

        let mut a = LogisticRegression::new();
        a.fit(&features, &labels).unwrap();
        let mut b = LogisticRegression::new();
        b.fit(&features, &labels).unwrap();

        assert_eq!(a.bias(), b.bias());
        let pa = a.predict_probability(&features[0]).unwrap();
        let pb = b.predict_probability(&features[0]).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_probability_is_bounded() {
        let (features, labels, vectorizer) = toy_features();
        let mut model = LogisticRegression::new();
        model.fit(&features, &labels).unwrap();

        let vector = vectorizer.transform("i am sad").unwrap();
        let p = model.predict_probability(&vector).unwrap();
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn test_iteration_cap_still_yields_usable_model() {
        let (features, labels, _) = toy_features();
        let mut model = LogisticRegression::new().with_max_iter(3);
        model.fit(&features, &labels).unwrap();
        assert!(model.is_fitted());
        assert!(model.predict(&features[0]).is_ok());
    }

    #[test]
    fn test_dimension_mismatch_is_a_prediction_error() {
        let (features, labels, _) = toy_features();
        let mut model = LogisticRegression::new();
        model.fit(&features, &labels).unwrap();

        let mut other = TfidfVectorizer::new();
        other.fit(&["one two"]).unwrap();
        let foreign = other.transform("one").unwrap();

        let err = model.predict(&foreign).unwrap_err();
        assert!(matches!(err, PipelineError::Prediction(_)));
    }
}
