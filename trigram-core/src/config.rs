use crate::error::ConfigError;

/// Default number of buckets of the trigram frequency table.
///
/// A large prime keeps djb2 chains short on corpora of a few million words.
pub const DEFAULT_CAPACITY: usize = 1_000_003;

/// Number of trigrams printed on the console after training.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

/// Number of candidates returned by a prediction query.
pub const DEFAULT_TOP_N: usize = 5;

/// Parameters of a training run.
///
/// # Invariants
/// - `capacity >= 1`
///
/// A limit of `0` means "no limit" (every trigram is listed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainConfig {
	/// Bucket count of the frequency table, fixed for its whole lifetime.
	capacity: usize,

	/// Number of trigrams written to the results file (0 = all).
	pub report_limit: usize,

	/// Number of trigrams shown on the console (0 = all).
	pub display_limit: usize,
}

impl Default for TrainConfig {
	fn default() -> Self {
		Self {
			capacity: DEFAULT_CAPACITY,
			report_limit: 0,
			display_limit: DEFAULT_DISPLAY_LIMIT,
		}
	}
}

impl TrainConfig {
	/// Returns the frequency table bucket count.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Sets the frequency table bucket count.
	///
	/// # Errors
	/// Returns [`ConfigError::ZeroCapacity`] if `capacity` is 0.
	pub fn set_capacity(&mut self, capacity: usize) -> Result<(), ConfigError> {
		if capacity == 0 {
			return Err(ConfigError::ZeroCapacity);
		}
		self.capacity = capacity;
		Ok(())
	}
}

/// Parameters of a prediction query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
	top_n: usize,
}

impl Default for QueryConfig {
	fn default() -> Self {
		Self { top_n: DEFAULT_TOP_N }
	}
}

impl QueryConfig {
	/// Maximum number of candidates returned per query.
	pub fn top_n(&self) -> usize {
		self.top_n
	}

	/// # Errors
	/// Returns [`ConfigError::ZeroPredictions`] if `top_n` is 0.
	pub fn set_top_n(&mut self, top_n: usize) -> Result<(), ConfigError> {
		if top_n == 0 {
			return Err(ConfigError::ZeroPredictions);
		}
		self.top_n = top_n;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let train = TrainConfig::default();
		assert_eq!(train.capacity(), DEFAULT_CAPACITY);
		assert_eq!(train.report_limit, 0);
		assert_eq!(train.display_limit, 10);
		assert_eq!(QueryConfig::default().top_n(), 5);
	}

	#[test]
	fn rejects_zero_values() {
		let mut train = TrainConfig::default();
		assert_eq!(train.set_capacity(0), Err(ConfigError::ZeroCapacity));
		assert_eq!(train.capacity(), DEFAULT_CAPACITY);
		train.set_capacity(17).unwrap();
		assert_eq!(train.capacity(), 17);

		let mut query = QueryConfig::default();
		assert_eq!(query.set_top_n(0), Err(ConfigError::ZeroPredictions));
		query.set_top_n(3).unwrap();
		assert_eq!(query.top_n(), 3);
	}
}
