//! Evaluation metrics for the held-out split.

use std::fmt;

/// Precision/recall/F1 for one class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassMetrics {
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub support: usize,
}

impl ClassMetrics {
    fn compute(y_true: &[u8], y_pred: &[u8], class: u8) -> Self {
        let mut true_positives = 0usize;
        let mut predicted = 0usize;
        let mut actual = 0usize;

        for (&t, &p) in y_true.iter().zip(y_pred) {
            if p == class {
                predicted += 1;
            }
            if t == class {
                actual += 1;
                if p == class {
                    true_positives += 1;
                }
            }
        }

        let precision = ratio(true_positives, predicted);
        let recall = ratio(true_positives, actual);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
            support: actual,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

/// Per-class and overall classification quality on a labeled set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub accuracy: f32,
    pub negative: ClassMetrics,
    pub positive: ClassMetrics,
}

impl ClassificationReport {
    /// Compares predictions against ground truth. Both slices must be the
    /// same length and nonempty.
    pub fn compute(y_true: &[u8], y_pred: &[u8]) -> Self {
        debug_assert_eq!(y_true.len(), y_pred.len());
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
        Self {
            accuracy: ratio(correct, y_true.len()),
            negative: ClassMetrics::compute(y_true, y_pred, 0),
            positive: ClassMetrics::compute(y_true, y_pred, 1),
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1", "support")?;
        for (name, m) in [("not depressed", &self.negative), ("depressed", &self.positive)] {
            writeln!(
                f,
                "{:>14} {:>9.3} {:>9.3} {:>9.3} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        write!(f, "{:>14} {:>9.3}", "accuracy", self.accuracy)
    }
}
