//! An offline text-classification pipeline for depression-signal screening.
//!
//! The pipeline turns a CSV of labeled posts into a persisted TF-IDF +
//! logistic regression classifier: normalize → balance classes → train/test
//! split → vectorize → fit → save, then load the artifact and classify lines
//! of text. All state lives in explicit values; there is no ambient global.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use moodscan::{Dataset, LabeledExample, Trainer};
//!
//! let dataset = Dataset::from_examples(vec![
//!     LabeledExample::new("i feel so sad and alone", 1),
//!     LabeledExample::new("everything is hopeless", 1),
//!     LabeledExample::new("great day today, feeling happy", 0),
//!     LabeledExample::new("wonderful time with friends", 0),
//! ]);
//!
//! let outcome = Trainer::new().with_test_ratio(0.0).train(&dataset)?;
//! let label = outcome.classifier.classify("i am sad")?;
//! println!("Prediction: {}", label);
//! # Ok(())
//! # }
//! ```
//!
//! # Persistence
//!
//! A trained (vectorizer, model) pair is saved as a versioned artifact and
//! loaded back for inference:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use moodscan::{ArtifactStore, Classifier, Dataset, DatasetSchema, Trainer};
//!
//! let dataset = Dataset::load("dataset/posts.csv", &DatasetSchema::default())?;
//! let outcome = Trainer::new().train(&dataset)?;
//!
//! let store = ArtifactStore::new_default()?;
//! store.save(outcome.classifier.vectorizer(), outcome.classifier.model())?;
//!
//! let classifier = Classifier::load(&store)?;
//! println!("Prediction: {}", classifier.classify("i feel alone")?);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod classifier;
pub mod dataset;
pub mod metrics;
pub mod text;

pub use artifact::{ArtifactError, ArtifactStore, ARTIFACT_VERSION};
pub use classifier::{
    Classifier, FeatureVector, Label, LogisticRegression, PipelineError, TfidfVectorizer,
    TrainOutcome, Trainer,
};
pub use dataset::{Dataset, DatasetSchema, LabeledExample};
pub use metrics::{ClassMetrics, ClassificationReport};

/// Initializes the process-wide logger from the `RUST_LOG` environment.
/// Called once by the binary before any pipeline work.
pub fn init_logger() {
    env_logger::init();
}
