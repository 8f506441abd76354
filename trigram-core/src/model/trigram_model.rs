use std::fmt;

use rand::Rng;
use serde::Serialize;

use super::node::Node;
use super::top_k::Counted;

/// A predicted third word for a (w1, w2) prefix.
///
/// Owned by the caller: it stays valid after the model is mutated or dropped.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Prediction {
	pub word: String,
	pub count: usize,
	/// `count` divided by the total count of all continuations of the prefix.
	pub probability: f64,
}

impl Counted for Prediction {
	fn count(&self) -> usize {
		self.count
	}
}

/// Size summary of a [`TrigramModel`].
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelStatistics {
	/// Number of insertions, repeated trigrams included.
	pub total_trigrams: usize,
	/// Distinct first words.
	pub first_words: usize,
	/// Distinct (w1, w2) prefixes.
	pub bigrams: usize,
}

impl fmt::Display for ModelStatistics {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "=== Language Model Statistics ===")?;
		writeln!(f, "Total trigrams: {}", self.total_trigrams)?;
		writeln!(f, "Unique first words: {}", self.first_words)?;
		write!(f, "Unique bigrams (w1, w2): {}", self.bigrams)
	}
}

/// Trigram language model stored as a three-level word tree.
///
/// The root's children are first words, their children second words, and
/// theirs the observed third words with occurrence counts.
///
/// # Responsibilities
/// - Count trigrams during training
/// - Rank the continuations of a two-word prefix
/// - Sample continuations for text generation
///
/// # Invariants
/// - The tree is never deeper than 3 below the root
/// - `total_trigrams` is the number of insertions (not of distinct trigrams)
/// - Children are unique per parent and kept in first-insertion order
///
/// There is no smoothing: an unseen prefix has no prediction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrigramModel {
	root: Node,
	total_trigrams: usize,
}

impl Default for TrigramModel {
	fn default() -> Self {
		Self {
			root: Node::root(),
			total_trigrams: 0,
		}
	}
}

impl TrigramModel {
	/// Creates an empty model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of (w1, w2, w3).
	pub fn insert(&mut self, w1: &str, w2: &str, w3: &str) {
		self.root
			.child_or_insert(w1)
			.child_or_insert(w2)
			.child_or_insert(w3)
			.increment();
		self.total_trigrams += 1;
	}

	/// Number of insertions since creation (or as recorded in a decoded stream).
	pub fn total_trigrams(&self) -> usize {
		self.total_trigrams
	}

	pub fn is_empty(&self) -> bool {
		self.root.children().is_empty()
	}

	pub(crate) fn root(&self) -> &Node {
		&self.root
	}

	pub(crate) fn root_mut(&mut self) -> &mut Node {
		&mut self.root
	}

	pub(crate) fn set_total_trigrams(&mut self, total: usize) {
		self.total_trigrams = total;
	}

	/// Node of the (w1, w2) prefix, if it has at least one continuation.
	fn prefix(&self, w1: &str, w2: &str) -> Option<&Node> {
		let node = self.root.find_child(w1)?.find_child(w2)?;
		if node.children().is_empty() { None } else { Some(node) }
	}

	/// Returns the most frequent continuation of (w1, w2).
	///
	/// On equal counts the first maximal child in child order wins.
	/// Returns `None` if the prefix was never seen.
	pub fn predict_next(&self, w1: &str, w2: &str) -> Option<Prediction> {
		let node = self.prefix(w1, w2)?;
		let total = node.children_total();

		let mut best: Option<&Node> = None;
		for child in node.children() {
			if best.is_none_or(|b| child.count() > b.count()) {
				best = Some(child);
			}
		}

		best.filter(|_| total > 0).map(|child| Prediction {
			word: child.word().to_owned(),
			count: child.count(),
			probability: child.count() as f64 / total as f64,
		})
	}

	/// Returns up to `n` continuations of (w1, w2), most frequent first.
	///
	/// Equal counts keep child order. `n` larger than the number of
	/// continuations is clamped; an unseen prefix gives an empty `Vec`.
	pub fn predict_top_n(&self, w1: &str, w2: &str, n: usize) -> Vec<Prediction> {
		let Some(node) = self.prefix(w1, w2) else {
			return Vec::new();
		};
		let total = node.children_total();
		if total == 0 {
			return Vec::new();
		}

		// Fan-out per prefix is small: a full stable sort is enough here
		let mut ranked: Vec<&Node> = node.children().iter().collect();
		ranked.sort_by(|a, b| b.count().cmp(&a.count()));

		ranked
			.into_iter()
			.take(n)
			.map(|child| Prediction {
				word: child.word().to_owned(),
				count: child.count(),
				probability: child.count() as f64 / total as f64,
			})
			.collect()
	}

	/// Samples a continuation of (w1, w2) with probability proportional to its count.
	pub fn sample_next<R: Rng>(&self, w1: &str, w2: &str, rng: &mut R) -> Option<&str> {
		self.prefix(w1, w2)?.sample(rng).map(Node::word)
	}

	/// Generates up to `max_words` words following the seed (w1, w2).
	///
	/// Each word is sampled from the last two words; generation stops early
	/// when the current prefix was never seen. The seed is not included.
	pub fn generate<R: Rng>(&self, w1: &str, w2: &str, max_words: usize, rng: &mut R) -> Vec<String> {
		let mut words = Vec::new();
		let mut previous = w1.to_owned();
		let mut last = w2.to_owned();

		while words.len() < max_words {
			let Some(next) = self.sample_next(&previous, &last, rng) else {
				break;
			};
			let next = next.to_owned();
			words.push(next.clone());
			previous = std::mem::replace(&mut last, next);
		}

		words
	}

	/// Computes totals over the first two levels of the tree.
	pub fn statistics(&self) -> ModelStatistics {
		ModelStatistics {
			total_trigrams: self.total_trigrams,
			first_words: self.root.children().len(),
			bigrams: self.root.children().iter().map(|n| n.children().len()).sum(),
		}
	}

	/// Iterates over every stored (w1, w2, w3, count), in tree order.
	pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str, usize)> {
		self.root.children().iter().flat_map(|n1| {
			n1.children().iter().flat_map(move |n2| {
				n2.children()
					.iter()
					.map(move |n3| (n1.word(), n2.word(), n3.word(), n3.count()))
			})
		})
	}

	/// Checks that both models hold the same trigrams with the same counts,
	/// regardless of child order.
	///
	/// `==` additionally requires identical child order.
	pub fn is_equivalent(&self, other: &Self) -> bool {
		if self.total_trigrams != other.total_trigrams {
			return false;
		}
		let mut mine: Vec<_> = self.triples().collect();
		let mut theirs: Vec<_> = other.triples().collect();
		mine.sort_unstable();
		theirs.sort_unstable();
		mine == theirs
	}
}
