//! The classification core: vectorizer, model, inference service and trainer.

pub mod error;
pub mod model;
pub mod service;
pub mod trainer;
pub mod vectorizer;

pub use error::PipelineError;
pub use model::{LogisticRegression, DEFAULT_MAX_ITER};
pub use service::{Classifier, Label};
pub use trainer::{TrainOutcome, Trainer, DEFAULT_SEED, DEFAULT_TEST_RATIO};
pub use vectorizer::{FeatureVector, TfidfVectorizer, DEFAULT_MAX_FEATURES};
