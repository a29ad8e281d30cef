//! Storage for the per-epoch metric series of the current training run.
//!
//! The buffer owns the accuracy and loss sequences as one unit: they are
//! replaced together, never mutated element-wise, and readers only ever see
//! read-only prefixes.

use thiserror::Error;

/// Which of the two metric series to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    /// Per-epoch training accuracy.
    Accuracy,
    /// Per-epoch training loss.
    Loss,
}

/// Errors raised by [`SeriesBuffer`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    /// The accuracy and loss sequences differ in length.
    #[error("Metric series lengths differ (accuracy {accuracy}, loss {loss})")]
    ShapeMismatch {
        /// Length of the offered accuracy sequence.
        accuracy: usize,
        /// Length of the offered loss sequence.
        loss: usize,
    },
    /// A prefix longer than the stored series was requested.
    #[error("Requested prefix of {requested} from a series of {available}")]
    OutOfRange {
        /// Prefix length asked for.
        requested: usize,
        /// Stored series length.
        available: usize,
    },
}

/// Equal-length accuracy/loss sequences for the current run.
#[derive(Debug, Default)]
pub struct SeriesBuffer {
    accuracy: Vec<f64>,
    loss: Vec<f64>,
}

impl SeriesBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly received accuracy/loss pair.
    ///
    /// Rejects unequal lengths without touching the stored contents. Any
    /// display range derived from the previous contents is stale after a
    /// successful replace and must be recomputed by the caller.
    pub fn replace(&mut self, accuracy: Vec<f64>, loss: Vec<f64>) -> Result<(), SeriesError> {
        if accuracy.len() != loss.len() {
            return Err(SeriesError::ShapeMismatch {
                accuracy: accuracy.len(),
                loss: loss.len(),
            });
        }
        self.accuracy = accuracy;
        self.loss = loss;
        Ok(())
    }

    /// The first `count` elements of one series as a read-only view.
    pub fn prefix(&self, kind: SeriesKind, count: usize) -> Result<&[f64], SeriesError> {
        let series = self.series(kind);
        if count > series.len() {
            return Err(SeriesError::OutOfRange {
                requested: count,
                available: series.len(),
            });
        }
        Ok(&series[..count])
    }

    /// One full series as a read-only view.
    pub fn series(&self, kind: SeriesKind) -> &[f64] {
        match kind {
            SeriesKind::Accuracy => &self.accuracy,
            SeriesKind::Loss => &self.loss,
        }
    }

    /// Number of epochs stored (both series share it).
    pub fn len(&self) -> usize {
        self.accuracy.len()
    }

    /// Whether no run has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.accuracy.is_empty()
    }
}
