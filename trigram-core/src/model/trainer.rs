use std::fmt;
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::TrainConfig;
use crate::error::TrainError;
use crate::io::read_file;
use crate::text::{tokenize, trigram_key, trigrams};

use super::frequency_table::FrequencyTable;
use super::trigram_model::TrigramModel;

/// Counters of a training run.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrainingSummary {
	/// Tokens consumed.
	pub words: usize,
	/// Trigram windows produced (repeats included).
	pub trigrams: usize,
	/// Distinct trigrams in the frequency table.
	pub unique_trigrams: usize,
}

impl fmt::Display for TrainingSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Read {} words, generated {} trigrams ({} unique)",
			self.words, self.trigrams, self.unique_trigrams
		)
	}
}

/// Builds the frequency table and the trigram model side by side.
///
/// Every trigram window is both tallied under its `"w1 w2 w3"` key (for
/// whole-corpus reporting) and inserted in the tree (for prediction).
///
/// # Notes
/// - Windows never span two calls to [`Trainer::feed`]: each slice is an
///   independent token sequence.
#[derive(Debug)]
pub struct Trainer {
	table: FrequencyTable,
	model: TrigramModel,
	words: usize,
	trigrams: usize,
}

impl Trainer {
	/// Creates a trainer with an empty table of `config.capacity()` buckets.
	pub fn new(config: &TrainConfig) -> Self {
		debug!("creating frequency table with {} buckets", config.capacity());
		Self {
			table: FrequencyTable::new(config.capacity()),
			model: TrigramModel::new(),
			words: 0,
			trigrams: 0,
		}
	}

	/// Feeds a token sequence in corpus order. Returns the number of trigrams it produced.
	pub fn feed<S: AsRef<str>>(&mut self, tokens: &[S]) -> usize {
		let mut produced = 0;
		for (w1, w2, w3) in trigrams(tokens) {
			self.table.insert(&trigram_key(w1, w2, w3));
			self.model.insert(w1, w2, w3);
			produced += 1;
		}
		self.words += tokens.len();
		self.trigrams += produced;
		produced
	}

	/// Reads, tokenizes and feeds a whole corpus file.
	///
	/// # Errors
	/// - [`TrainError::Io`] if the file cannot be read
	/// - [`TrainError::NotEnoughWords`] if it holds fewer than 3 words;
	///   nothing is fed in that case
	pub fn train_file<P: AsRef<Path>>(&mut self, path: P) -> Result<TrainingSummary, TrainError> {
		let path = path.as_ref();
		let tokens = tokenize(&read_file(path)?);
		info!("read {} words from {}", tokens.len(), path.display());

		if tokens.len() < 3 {
			warn!("{} holds only {} words", path.display(), tokens.len());
			return Err(TrainError::NotEnoughWords(tokens.len()));
		}

		let produced = self.feed(&tokens);
		info!("generated {produced} trigrams ({} unique)", self.table.len());
		Ok(self.summary())
	}

	pub fn summary(&self) -> TrainingSummary {
		TrainingSummary {
			words: self.words,
			trigrams: self.trigrams,
			unique_trigrams: self.table.len(),
		}
	}

	pub fn table(&self) -> &FrequencyTable {
		&self.table
	}

	pub fn model(&self) -> &TrigramModel {
		&self.model
	}

	/// Consumes the trainer, handing over both structures.
	pub fn finish(self) -> (FrequencyTable, TrigramModel) {
		(self.table, self.model)
	}
}
