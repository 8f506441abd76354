use rand::Rng;

use crate::resource;

/// A node of the trigram tree.
///
/// A `Node` is either the synthetic root (empty word, only holds first words)
/// or a word at depth 1, 2 or 3 of a trigram. Only depth-3 nodes carry a
/// meaningful `count`: the number of times their (w1, w2, w3) path was inserted.
///
/// ## Responsibilities:
/// - Own its children (no node is ever shared)
/// - Find or create a child by exact word match
/// - Sample a child proportionally to its count
///
/// ## Invariants
/// - No two children share a word
/// - Children keep insertion order; they are neither sorted nor indexed
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
	word: String,
	count: usize,
	children: Vec<Node>,
}

impl Node {
	/// Creates the wordless root.
	pub(crate) fn root() -> Self {
		Self {
			word: String::new(),
			count: 0,
			children: Vec::new(),
		}
	}

	/// Creates a childless node for `word`.
	pub(crate) fn new(word: &str) -> Self {
		Self {
			word: resource::copy_str(word, "word in tree node"),
			count: 0,
			children: Vec::new(),
		}
	}

	pub(crate) fn word(&self) -> &str {
		&self.word
	}

	pub(crate) fn count(&self) -> usize {
		self.count
	}

	pub(crate) fn set_count(&mut self, count: usize) {
		self.count = count;
	}

	pub(crate) fn increment(&mut self) {
		self.count += 1;
	}

	pub(crate) fn children(&self) -> &[Node] {
		&self.children
	}

	/// Linear scan for the child holding `word`.
	pub(crate) fn find_child(&self, word: &str) -> Option<&Node> {
		self.children.iter().find(|child| child.word == word)
	}

	/// Returns the child holding `word`, appending a new one if absent.
	pub(crate) fn child_or_insert(&mut self, word: &str) -> &mut Node {
		let index = match self.children.iter().position(|child| child.word == word) {
			Some(index) => index,
			None => {
				resource::push(&mut self.children, Node::new(word), "children array");
				self.children.len() - 1
			}
		};
		&mut self.children[index]
	}

	/// Sum of the children's counts.
	pub(crate) fn children_total(&self) -> usize {
		self.children.iter().map(Node::count).sum()
	}

	/// Picks a child with probability proportional to its count.
	///
	/// Returns `None` if there are no children or all counts are zero.
	pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Option<&Node> {
		let total = self.children_total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for child in &self.children {
			if r < child.count {
				return Some(child);
			}
			r -= child.count;
		}

		// Unreachable while `total` is the sum of the counts walked above
		self.children.last()
	}
}
