//! Dataset loading, balancing and splitting.
//!
//! Datasets are plain CSV files with one free-text column and one binary-label
//! column. The column names are configuration, not contract; the defaults
//! match the Reddit depression dataset (`clean_text` / `is_depression`).

use std::fs::File;
use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::classifier::PipelineError;
use crate::text;

/// Names of the two required dataset columns.
#[derive(Debug, Clone)]
pub struct DatasetSchema {
    pub text_column: String,
    pub label_column: String,
}

impl DatasetSchema {
    pub fn new(text_column: impl Into<String>, label_column: impl Into<String>) -> Self {
        Self {
            text_column: text_column.into(),
            label_column: label_column.into(),
        }
    }
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self::new("clean_text", "is_depression")
    }
}

/// A single row of labeled text. The label is binary: 1 for the positive
/// (depressed) class, 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    pub text: String,
    pub label: u8,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, label: u8) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// An ordered collection of labeled examples.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    examples: Vec<LabeledExample>,
}

impl Dataset {
    pub fn from_examples(examples: Vec<LabeledExample>) -> Self {
        Self { examples }
    }

    /// Loads a dataset from a CSV file.
    ///
    /// Fails with [`PipelineError::Schema`] if either configured column is
    /// absent from the header or a label cell is not `0` or `1`.
    pub fn load<P: AsRef<Path>>(path: P, schema: &DatasetSchema) -> Result<Self, PipelineError> {
        let file = File::open(path.as_ref()).map_err(|e| {
            PipelineError::Io(format!("failed to open {:?}: {}", path.as_ref(), e))
        })?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        let text_idx = headers
            .iter()
            .position(|h| h == schema.text_column)
            .ok_or_else(|| {
                PipelineError::Schema(format!(
                    "dataset must contain a '{}' column",
                    schema.text_column
                ))
            })?;
        let label_idx = headers
            .iter()
            .position(|h| h == schema.label_column)
            .ok_or_else(|| {
                PipelineError::Schema(format!(
                    "dataset must contain a '{}' column",
                    schema.label_column
                ))
            })?;

        let mut examples = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let text = record.get(text_idx).unwrap_or_default().to_string();
            let raw_label = record.get(label_idx).unwrap_or_default().trim();
            let label = match raw_label {
                "0" => 0,
                "1" => 1,
                other => {
                    return Err(PipelineError::Schema(format!(
                        "row {}: label must be 0 or 1, got '{}'",
                        row + 1,
                        other
                    )))
                }
            };
            examples.push(LabeledExample { text, label });
        }

        info!("Loaded {} examples from {:?}", examples.len(), path.as_ref());
        Ok(Self { examples })
    }

    /// Writes the dataset back out as a two-column CSV, overwriting any
    /// previous contents at the destination.
    pub fn write_csv<P: AsRef<Path>>(
        &self,
        path: P,
        schema: &DatasetSchema,
    ) -> Result<(), PipelineError> {
        let file = File::create(path.as_ref()).map_err(|e| {
            PipelineError::Io(format!("failed to create {:?}: {}", path.as_ref(), e))
        })?;
        let mut writer = csv::Writer::from_writer(file);

        writer.write_record([schema.text_column.as_str(), schema.label_column.as_str()])?;
        for example in &self.examples {
            let label = example.label.to_string();
            writer.write_record([example.text.as_str(), label.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Counts of (label 0, label 1) examples.
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.examples.iter().filter(|e| e.label == 1).count();
        (self.examples.len() - positives, positives)
    }

    /// Returns a copy of the dataset with every text normalized.
    pub fn normalized(&self) -> Self {
        let examples = self
            .examples
            .iter()
            .map(|e| LabeledExample {
                text: text::normalize(&e.text),
                label: e.label,
            })
            .collect();
        Self { examples }
    }

    /// Balances the two classes by upsampling the minority class with
    /// replacement until it matches the majority class count.
    ///
    /// The output is deterministic for a fixed seed: majority rows first in
    /// their original order, then the resampled minority rows. Shuffling is
    /// deferred to [`Dataset::train_test_split`].
    ///
    /// Fails with [`PipelineError::Data`] when either class is empty.
    pub fn balance(&self, seed: u64) -> Result<Self, PipelineError> {
        let (negatives, positives) = self.class_counts();
        if negatives == 0 || positives == 0 {
            return Err(PipelineError::Data(format!(
                "cannot balance a dataset with a missing class ({} negative, {} positive)",
                negatives, positives
            )));
        }

        if negatives == positives {
            return Ok(self.clone());
        }

        let (majority, minority): (Vec<_>, Vec<_>) = if positives > negatives {
            let (pos, neg): (Vec<_>, Vec<_>) =
                self.examples.iter().partition(|e| e.label == 1);
            (pos, neg)
        } else {
            self.examples.iter().partition(|e| e.label == 0)
        };

        let mut rng = StdRng::seed_from_u64(seed);
        let mut examples: Vec<LabeledExample> =
            majority.iter().map(|e| (*e).clone()).collect();
        for _ in 0..majority.len() {
            let pick = rng.random_range(0..minority.len());
            examples.push(minority[pick].clone());
        }

        info!(
            "Balanced dataset: {} per class (was {} negative / {} positive)",
            majority.len(),
            negatives,
            positives
        );
        Ok(Self { examples })
    }

    /// Splits into (train, test) after a seeded shuffle.
    pub fn train_test_split(&self, test_ratio: f64, seed: u64) -> (Self, Self) {
        let mut indices: Vec<usize> = (0..self.examples.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test_size = ((self.examples.len() as f64) * test_ratio).round() as usize;
        let test_size = test_size.min(self.examples.len());

        let test = indices[..test_size]
            .iter()
            .map(|&i| self.examples[i].clone())
            .collect();
        let train = indices[test_size..]
            .iter()
            .map(|&i| self.examples[i].clone())
            .collect();

        (Self { examples: train }, Self { examples: test })
    }

    /// Borrows the texts and labels as parallel slices-of-refs, the shape the
    /// vectorizer and model consume.
    pub fn texts_and_labels(&self) -> (Vec<&str>, Vec<u8>) {
        let texts = self.examples.iter().map(|e| e.text.as_str()).collect();
        let labels = self.examples.iter().map(|e| e.label).collect();
        (texts, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn skewed_dataset(negatives: usize, positives: usize) -> Dataset {
        let mut examples = Vec::new();
        for i in 0..negatives {
            examples.push(LabeledExample::new(format!("fine day {i}"), 0));
        }
        for i in 0..positives {
            examples.push(LabeledExample::new(format!("sad day {i}"), 1));
        }
        Dataset::from_examples(examples)
    }

    #[test]
    fn test_balance_equalizes_class_counts() {
        let dataset = skewed_dataset(100, 10);
        let balanced = dataset.balance(42).unwrap();
        assert_eq!(balanced.class_counts(), (100, 100));
        assert_eq!(balanced.len(), 200);
    }

    #[test]
    fn test_balance_majority_comes_first() {
        let dataset = skewed_dataset(3, 1);
        let balanced = dataset.balance(42).unwrap();
        let labels: Vec<u8> = balanced.examples().iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_balance_handles_positive_majority() {
        let dataset = skewed_dataset(2, 5);
        let balanced = dataset.balance(7).unwrap();
        assert_eq!(balanced.class_counts(), (5, 5));
    }

    #[test]
    fn test_balance_is_deterministic_per_seed() {
        let dataset = skewed_dataset(20, 5);
        let a = dataset.balance(42).unwrap();
        let b = dataset.balance(42).unwrap();
        assert_eq!(a.examples(), b.examples());
    }

    #[test]
    fn test_balance_rejects_single_class() {
        let dataset = skewed_dataset(10, 0);
        let err = dataset.balance(42).unwrap_err();
        assert!(matches!(err, PipelineError::Data(_)));
    }

    #[test]
    fn test_train_test_split_sizes_and_determinism() {
        let dataset = skewed_dataset(80, 20);
        let (train, test) = dataset.train_test_split(0.2, 42);
        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);

        let (train2, test2) = dataset.train_test_split(0.2, 42);
        assert_eq!(train.examples(), train2.examples());
        assert_eq!(test.examples(), test2.examples());
    }

    #[test]
    fn test_load_rejects_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "body,sentiment").unwrap();
        writeln!(file, "hello,0").unwrap();

        let err = Dataset::load(&path, &DatasetSchema::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn test_load_rejects_non_binary_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_labels.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "clean_text,is_depression").unwrap();
        writeln!(file, "hello,2").unwrap();

        let err = Dataset::load(&path, &DatasetSchema::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn test_csv_round_trip_with_custom_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let schema = DatasetSchema::new("post", "flag");

        let dataset = skewed_dataset(2, 2);
        dataset.write_csv(&path, &schema).unwrap();

        let loaded = Dataset::load(&path, &schema).unwrap();
        assert_eq!(loaded.examples(), dataset.examples());
    }

    #[test]
    fn test_normalized_rewrites_texts() {
        let dataset = Dataset::from_examples(vec![LabeledExample::new("So SAD!! 99", 1)]);
        let normalized = dataset.normalized();
        assert_eq!(normalized.examples()[0].text, "so sad");
        assert_eq!(normalized.examples()[0].label, 1);
    }
}
