use log::info;

use super::error::PipelineError;
use super::model::{LogisticRegression, DEFAULT_MAX_ITER};
use super::service::Classifier;
use super::vectorizer::{TfidfVectorizer, DEFAULT_MAX_FEATURES};
use crate::dataset::Dataset;
use crate::metrics::ClassificationReport;

/// Default fraction of the balanced dataset held out for evaluation.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Default random seed for balancing and splitting.
pub const DEFAULT_SEED: u64 = 42;

/// Runs the full training flow with a fluent configuration interface.
///
/// The flow is: normalize → balance classes → shuffle/split → fit vectorizer
/// on the training texts → fit the model on vectorized features → evaluate on
/// the held-out split.
///
/// # Example
/// ```
/// use moodscan::{Dataset, LabeledExample, Trainer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dataset = Dataset::from_examples(vec![
///     LabeledExample::new("i feel so sad and alone", 1),
///     LabeledExample::new("great day today, feeling happy", 0),
/// ]);
///
/// let outcome = Trainer::new().with_test_ratio(0.0).train(&dataset)?;
/// let label = outcome.classifier.classify("i am sad")?;
/// println!("Prediction: {}", label);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    max_features: usize,
    max_iter: usize,
    learning_rate: f32,
    test_ratio: f64,
    seed: u64,
}

/// What a training run produced.
#[derive(Debug)]
pub struct TrainOutcome {
    pub classifier: Classifier,
    /// Evaluation on the held-out split; `None` when the split was empty.
    pub report: Option<ClassificationReport>,
    pub train_size: usize,
    pub test_size: usize,
}

impl Trainer {
    pub fn new() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            max_iter: DEFAULT_MAX_ITER,
            learning_rate: 0.5,
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Fraction of the balanced dataset held out for evaluation. Zero skips
    /// evaluation and trains on everything.
    pub fn with_test_ratio(mut self, test_ratio: f64) -> Self {
        self.test_ratio = test_ratio.clamp(0.0, 0.9);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Trains a classifier on the dataset.
    pub fn train(&self, dataset: &Dataset) -> Result<TrainOutcome, PipelineError> {
        if dataset.is_empty() {
            return Err(PipelineError::Data("dataset is empty".to_string()));
        }

        let normalized = dataset.normalized();
        let (negatives, positives) = normalized.class_counts();
        info!("Class counts before balancing: {} negative / {} positive", negatives, positives);

        // A dataset that is already a single class fails in balance(); a
        // two-example dataset with one of each passes through unchanged.
        let balanced = normalized.balance(self.seed)?;

        let (train, test) = balanced.train_test_split(self.test_ratio, self.seed);
        info!("Split: {} train / {} test", train.len(), test.len());

        let (train_texts, train_labels) = train.texts_and_labels();
        let mut vectorizer = TfidfVectorizer::with_max_features(self.max_features);
        vectorizer.fit(&train_texts)?;
        info!("Fitted vectorizer with {} vocabulary terms", vectorizer.vocabulary_size());

        let train_features = vectorizer.transform_batch(&train_texts)?;
        let mut model = LogisticRegression::new()
            .with_max_iter(self.max_iter)
            .with_learning_rate(self.learning_rate);
        model.fit(&train_features, &train_labels)?;

        let report = if test.is_empty() {
            None
        } else {
            let (test_texts, test_labels) = test.texts_and_labels();
            let test_features = vectorizer.transform_batch(&test_texts)?;
            let predictions = test_features
                .iter()
                .map(|f| model.predict(f))
                .collect::<Result<Vec<_>, _>>()?;
            let report = ClassificationReport::compute(&test_labels, &predictions);
            info!("Evaluation on held-out split:\n{}", report);
            Some(report)
        };

        Ok(TrainOutcome {
            classifier: Classifier::from_parts(vectorizer, model)?,
            report,
            train_size: train.len(),
            test_size: test.len(),
        })
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new()
    }
}
