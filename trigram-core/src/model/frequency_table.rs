use std::fmt;

use serde::Serialize;

use crate::resource;

/// djb2 string hash (`hash * 33 + byte`, seeded with 5381) reduced modulo `size`.
///
/// Arithmetic wraps at 64 bits like an `unsigned long` accumulator.
pub fn djb2(key: &str, size: usize) -> usize {
	let mut hash: u64 = 5381;
	for &byte in key.as_bytes() {
		hash = (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte));
	}
	(hash % size as u64) as usize
}

/// A key and the number of times it was inserted.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FrequencyEntry {
	pub key: String,
	pub count: usize,
}

/// Chained hash table counting string occurrences.
///
/// The bucket count is fixed at construction; the table never resizes, so the
/// load factor grows with the number of distinct keys.
///
/// # Invariants
/// - Keys are unique across the whole table
/// - Every count is >= 1 and equals the number of insertions of its key
/// - `len` equals the total number of chained entries
#[derive(Debug)]
pub struct FrequencyTable {
	buckets: Vec<Vec<FrequencyEntry>>,
	len: usize,
}

impl FrequencyTable {
	/// Creates an empty table with `capacity` buckets.
	///
	/// A capacity of 0 is raised to 1. Failing to allocate the buckets is fatal.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		let mut buckets = Vec::new();
		resource::reserve(&mut buckets, capacity, "hash table buckets");
		buckets.resize_with(capacity, Vec::new);
		Self { buckets, len: 0 }
	}

	/// Number of buckets.
	pub fn capacity(&self) -> usize {
		self.buckets.len()
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Records one occurrence of `key`.
	///
	/// Increments the count of an existing entry, otherwise appends a new entry
	/// with count 1 at the end of the bucket's chain.
	pub fn insert(&mut self, key: &str) {
		let index = djb2(key, self.buckets.len());
		let chain = &mut self.buckets[index];

		if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
			entry.count += 1;
			return;
		}

		let entry = FrequencyEntry {
			key: resource::copy_str(key, "hash key"),
			count: 1,
		};
		resource::push(chain, entry, "hash node");
		self.len += 1;
	}

	/// Returns the count of `key`, or 0 if it was never inserted.
	pub fn get(&self, key: &str) -> usize {
		self.buckets[djb2(key, self.buckets.len())]
			.iter()
			.find(|entry| entry.key == key)
			.map_or(0, |entry| entry.count)
	}

	/// Iterates over every entry, bucket by bucket then in chain order.
	pub fn iter(&self) -> impl Iterator<Item = &FrequencyEntry> {
		self.buckets.iter().flatten()
	}

	/// Snapshot of every entry, in [`Self::iter`] order.
	pub fn entries(&self) -> Vec<FrequencyEntry> {
		let mut entries = Vec::new();
		resource::reserve(&mut entries, self.len, "entries array");
		entries.extend(self.iter().cloned());
		entries
	}

	/// Computes bucket usage diagnostics. Pure observation.
	pub fn stats(&self) -> TableStats {
		let mut empty_buckets = 0;
		let mut max_chain_length = 0;
		let mut total_chain_length = 0;

		for chain in &self.buckets {
			if chain.is_empty() {
				empty_buckets += 1;
			} else {
				total_chain_length += chain.len();
				max_chain_length = max_chain_length.max(chain.len());
			}
		}

		let capacity = self.buckets.len();
		let used = capacity - empty_buckets;
		TableStats {
			capacity,
			unique_keys: self.len,
			load_factor: self.len as f64 / capacity as f64,
			empty_buckets,
			empty_fraction: empty_buckets as f64 / capacity as f64,
			max_chain_length,
			avg_chain_length: if used > 0 { total_chain_length as f64 / used as f64 } else { 0.0 },
		}
	}
}

/// Bucket usage summary of a [`FrequencyTable`].
///
/// Chain lengths are measured over non-empty buckets only.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TableStats {
	pub capacity: usize,
	pub unique_keys: usize,
	pub load_factor: f64,
	pub empty_buckets: usize,
	pub empty_fraction: f64,
	pub max_chain_length: usize,
	pub avg_chain_length: f64,
}

impl fmt::Display for TableStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "=== Hash Table Statistics ===")?;
		writeln!(f, "Table size: {}", self.capacity)?;
		writeln!(f, "Unique keys: {}", self.unique_keys)?;
		writeln!(f, "Load factor: {:.2}", self.load_factor)?;
		writeln!(f, "Empty buckets: {} ({:.1}%)", self.empty_buckets, self.empty_fraction * 100.0)?;
		writeln!(f, "Max chain length: {}", self.max_chain_length)?;
		write!(f, "Avg chain length: {:.2}", self.avg_chain_length)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::tests::exhausts_within;

	#[test]
	fn djb2_matches_reference_values() {
		// 5381 * 33 + 'a' (97)
		assert_eq!(djb2("a", usize::MAX), 177_670);
		assert_eq!(djb2("", 1_000_003), 5381);
		assert_eq!(djb2("ab", 1_000_003), (177_670 * 33 + 98) % 1_000_003);
		assert!(djb2("some longer key", 7) < 7);
	}

	#[test]
	fn counts_insertions() {
		let mut table = FrequencyTable::new(101);
		for _ in 0..5 {
			table.insert("the cat sat");
		}
		table.insert("cat sat on");
		assert_eq!(table.get("the cat sat"), 5);
		assert_eq!(table.get("cat sat on"), 1);
		assert_eq!(table.get("missing"), 0);
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn get_is_unaffected_by_other_keys() {
		// A single bucket forces every key into the same chain.
		let mut table = FrequencyTable::new(1);
		table.insert("x");
		table.insert("x");
		for i in 0..50 {
			table.insert(&format!("other {i}"));
		}
		assert_eq!(table.get("x"), 2);
		assert_eq!(table.len(), 51);
	}

	#[test]
	fn chain_appends_in_insertion_order() {
		let mut table = FrequencyTable::new(1);
		table.insert("b");
		table.insert("a");
		table.insert("b");
		let keys: Vec<_> = table.iter().map(|e| (e.key.as_str(), e.count)).collect();
		assert_eq!(keys, vec![("b", 2), ("a", 1)]);
	}

	#[test]
	fn entries_lists_every_key_once() {
		let mut table = FrequencyTable::new(13);
		let words = ["a", "b", "c", "a", "d", "a", "b"];
		for w in words {
			table.insert(w);
		}
		let mut entries = table.entries();
		entries.sort_by(|x, y| x.key.cmp(&y.key));
		let pairs: Vec<_> = entries.iter().map(|e| (e.key.as_str(), e.count)).collect();
		assert_eq!(pairs, vec![("a", 3), ("b", 2), ("c", 1), ("d", 1)]);
	}

	#[test]
	fn stats_on_single_bucket() {
		let mut table = FrequencyTable::new(4);
		for key in ["k1", "k2", "k3"] {
			table.insert(key);
		}
		let stats = table.stats();
		assert_eq!(stats.capacity, 4);
		assert_eq!(stats.unique_keys, 3);
		assert!((stats.load_factor - 0.75).abs() < 1e-9);
		let used = 4 - stats.empty_buckets;
		assert!((stats.avg_chain_length - 3.0 / used as f64).abs() < 1e-9);
		assert!(stats.max_chain_length >= 1 && stats.max_chain_length <= 3);
	}

	#[test]
	fn stats_on_empty_table() {
		let stats = FrequencyTable::new(10).stats();
		assert_eq!(stats.empty_buckets, 10);
		assert_eq!(stats.max_chain_length, 0);
		assert_eq!(stats.avg_chain_length, 0.0);
		assert_eq!(stats.load_factor, 0.0);
		assert!(stats.to_string().contains("Empty buckets: 10 (100.0%)"));
	}

	#[test]
	fn zero_capacity_is_raised() {
		let mut table = FrequencyTable::new(0);
		table.insert("x");
		assert_eq!(table.capacity(), 1);
		assert_eq!(table.get("x"), 1);
	}

	#[test]
	fn bucket_allocation_goes_through_policy() {
		assert!(exhausts_within(0, || {
			FrequencyTable::new(8);
		}));
		assert!(!exhausts_within(1, || {
			FrequencyTable::new(8);
		}));
	}
}
