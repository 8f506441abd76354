//! Counting and prediction structures of the trigram model.
//!
//! Data flows from the trainer into two independent structures:
//! - `FrequencyTable` tallies `"w1 w2 w3"` keys for whole-corpus reports
//! - `TrigramModel` indexes counts by w1 → w2 → w3 for prediction
//!
//! Only the model is persisted (`codec`); the table lives for one run.

/// Chained hash table with djb2 hashing and load diagnostics.
pub mod frequency_table;

/// Bounded min-heap selection of the K largest counts.
pub mod top_k;

/// Three-level word tree with prefix prediction.
pub mod trigram_model;

/// Binary encode/decode of a `TrigramModel` and atomic file persistence.
pub mod codec;

/// Training pipeline feeding both structures from a token stream.
pub mod trainer;

/// Owned node of the word tree.
///
/// Not exposed
mod node;
