//! Trigram-based statistical language model.
//!
//! This crate provides:
//! - A chained hash table tallying whole trigrams for corpus reports
//! - Bounded-heap top-K selection over counted items
//! - A three-level word tree predicting the next word of a two-word prefix
//! - A compact binary format to reload a trained model without retraining
//! - Text normalization and the sliding window producing trigrams
//!
//! The crate is single-threaded by design: a model is built and queried by
//! one owner. Resource exhaustion is fatal and goes through [`resource`].

/// Frequency table, top-K selection, trigram tree, codec and trainer.
pub mod model;

/// Tokenizer and sliding trigram window.
pub mod text;

/// Plain-text reports (frequency listings, results file, prediction answers).
pub mod report;

/// Validated training and query parameters.
pub mod config;

/// Library error types.
pub mod error;

/// Centralized policy for allocation failure.
pub mod resource;

/// File helpers.
///
/// Not exposed
pub(crate) mod io;

pub use error::{CodecError, ConfigError, TrainError};
pub use model::codec::Format;
pub use model::frequency_table::{FrequencyEntry, FrequencyTable, TableStats};
pub use model::trainer::{Trainer, TrainingSummary};
pub use model::trigram_model::{ModelStatistics, Prediction, TrigramModel};
