//! Top-K selection over counted items.
//!
//! Selecting the K largest of N items with a bounded min-heap costs
//! O(N log K) instead of the O(N log N) of a full sort, which matters when
//! listing the top 10 trigrams out of hundreds of thousands.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::resource;

use super::frequency_table::FrequencyEntry;

/// An item ranked by an occurrence count.
pub trait Counted {
	fn count(&self) -> usize;
}

impl Counted for FrequencyEntry {
	fn count(&self) -> usize {
		self.count
	}
}

impl<T: Counted + ?Sized> Counted for &T {
	fn count(&self) -> usize {
		(**self).count()
	}
}

/// Heap slot: the count of an item and its position in the input.
///
/// Ordered by count, then by *descending* position, so the heap minimum is the
/// latest of the lowest-count items. Evicting it first keeps earlier items on ties.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Slot {
	count: usize,
	index: usize,
}

impl Ord for Slot {
	fn cmp(&self, other: &Self) -> Ordering {
		self.count.cmp(&other.count).then_with(|| other.index.cmp(&self.index))
	}
}

impl PartialOrd for Slot {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Returns the `limit` items with the largest counts, sorted by count descending.
///
/// - `limit == 0` means "no limit": every item is returned, fully sorted.
/// - `limit >= items.len()` is clamped to `items.len()` and also fully sorted.
/// - Otherwise a min-heap of size `limit` is maintained over the input.
///
/// Ties keep input order in every path, so the result always equals the first
/// `min(limit, N)` items of a stable descending sort.
pub fn top_k<T: Counted>(mut items: Vec<T>, limit: usize) -> Vec<T> {
	if limit == 0 || limit >= items.len() {
		items.sort_by(|a, b| b.count().cmp(&a.count()));
		return items;
	}

	let mut storage = Vec::new();
	resource::reserve(&mut storage, limit, "top-k heap");
	let mut heap: BinaryHeap<Reverse<Slot>> = BinaryHeap::from(storage);

	for (index, item) in items.iter().enumerate() {
		let slot = Slot { count: item.count(), index };
		if heap.len() < limit {
			heap.push(Reverse(slot));
		} else if let Some(mut min) = heap.peek_mut() {
			if slot.count > min.0.count {
				*min = Reverse(slot);
			}
		}
	}

	let mut kept: Vec<Slot> = heap.into_iter().map(|Reverse(slot)| slot).collect();
	kept.sort_unstable_by_key(|slot| slot.index);

	let mut survivors = Vec::new();
	resource::reserve(&mut survivors, limit, "top-k results");
	let mut wanted = kept.iter().map(|slot| slot.index).peekable();
	for (index, item) in items.into_iter().enumerate() {
		match wanted.peek() {
			Some(&next) if next == index => {
				survivors.push(item);
				wanted.next();
			}
			Some(_) => {}
			None => break,
		}
	}

	survivors.sort_by(|a, b| b.count().cmp(&a.count()));
	survivors
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	#[derive(Clone, Debug, PartialEq)]
	struct Item(&'static str, usize);

	impl Counted for Item {
		fn count(&self) -> usize {
			self.1
		}
	}

	fn stable_sorted<T: Counted + Clone>(items: &[T]) -> Vec<T> {
		let mut all = items.to_vec();
		all.sort_by(|a, b| b.count().cmp(&a.count()));
		all
	}

	#[test]
	fn selects_largest() {
		let items = vec![Item("a", 3), Item("b", 9), Item("c", 1), Item("d", 7), Item("e", 4)];
		assert_eq!(top_k(items, 2), vec![Item("b", 9), Item("d", 7)]);
	}

	#[test]
	fn zero_means_everything() {
		let items = vec![Item("a", 1), Item("b", 3), Item("c", 2)];
		assert_eq!(top_k(items, 0), vec![Item("b", 3), Item("c", 2), Item("a", 1)]);
	}

	#[test]
	fn limit_above_len_is_clamped() {
		let items = vec![Item("a", 1), Item("b", 3)];
		assert_eq!(top_k(items, 10), vec![Item("b", 3), Item("a", 1)]);
		assert!(top_k(Vec::<Item>::new(), 3).is_empty());
	}

	#[test]
	fn ties_keep_input_order() {
		let items = vec![Item("a", 5), Item("b", 5), Item("c", 2), Item("d", 5)];
		assert_eq!(top_k(items.clone(), 2), vec![Item("a", 5), Item("b", 5)]);
		assert_eq!(top_k(items, 3), vec![Item("a", 5), Item("b", 5), Item("d", 5)]);
	}

	#[test]
	fn matches_full_sort_for_every_limit() {
		let mut rng = StdRng::seed_from_u64(0x7419);
		for _ in 0..20 {
			let n = rng.random_range(0..40);
			let items: Vec<Item> = (0..n).map(|_| Item("x", rng.random_range(1..8))).collect();
			let sorted = stable_sorted(&items);
			for limit in 0..=n + 2 {
				let selected = top_k(items.clone(), limit);
				let expected_len = if limit == 0 { n } else { limit.min(n) };
				assert_eq!(selected.len(), expected_len);
				assert!(selected.windows(2).all(|w| w[0].1 >= w[1].1));
				let counts: Vec<_> = selected.iter().map(|i| i.1).collect();
				let expected: Vec<_> = sorted[..expected_len].iter().map(|i| i.1).collect();
				assert_eq!(counts, expected);
			}
		}
	}

	#[test]
	fn works_on_borrowed_entries() {
		let entries = vec![
			FrequencyEntry { key: "x y z".into(), count: 2 },
			FrequencyEntry { key: "a b c".into(), count: 4 },
			FrequencyEntry { key: "d e f".into(), count: 1 },
		];
		let borrowed: Vec<&FrequencyEntry> = entries.iter().collect();
		let top = top_k(borrowed, 1);
		assert_eq!(top, vec![&entries[1]]);
	}
}
