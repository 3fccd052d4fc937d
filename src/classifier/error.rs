use std::fmt;
use std::io;

/// Represents the different types of errors that can occur in the pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Required columns are missing or unparseable in the input dataset
    Schema(String),
    /// The dataset is degenerate (e.g. one class is entirely absent)
    Data(String),
    /// transform/predict was called before fit/load
    NotFitted(String),
    /// Error occurred due to invalid input parameters
    Validation(String),
    /// Error occurred while making predictions
    Prediction(String),
    /// Error occurred while reading or writing a dataset file
    Io(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(msg) => write!(f, "Schema error: {}", msg),
            Self::Data(msg) => write!(f, "Data error: {}", msg),
            Self::NotFitted(msg) => write!(f, "Not fitted: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::Prediction(msg) => write!(f, "Prediction error: {}", msg),
            Self::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<io::Error> for PipelineError {
    fn from(err: io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}
