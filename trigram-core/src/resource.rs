//! Process-wide policy for resource exhaustion.
//!
//! Every structure in this crate grows through [`reserve`], [`push`] or
//! [`copy_str`]. A failed reservation is never returned to the caller: it is
//! routed to the installed [`ExhaustionHandler`], which by default logs the
//! cause and aborts the process.
//!
//! The policy is thread-local so tests can install a panicking handler and a
//! reservation budget without affecting each other.

use std::cell::Cell;

/// Diverging callback invoked when a structure cannot grow.
///
/// The argument names what was being allocated.
pub type ExhaustionHandler = fn(&str) -> !;

#[derive(Clone, Copy)]
struct Policy {
	handler: ExhaustionHandler,
	/// Remaining reservations before exhaustion is simulated. `None` = unlimited.
	budget: Option<usize>,
}

const DEFAULT_POLICY: Policy = Policy {
	handler: abort_process,
	budget: None,
};

thread_local! {
	static POLICY: Cell<Policy> = const { Cell::new(DEFAULT_POLICY) };
}

fn abort_process(what: &str) -> ! {
	log::error!("memory allocation failed for {what}, aborting");
	eprintln!("Memory allocation failed for {what}");
	std::process::abort()
}

/// Installs `handler` for the current thread.
pub fn set_handler(handler: ExhaustionHandler) {
	POLICY.with(|cell| {
		let mut policy = cell.get();
		policy.handler = handler;
		cell.set(policy);
	});
}

/// Limits the current thread to `reservations` more allocations.
///
/// Once spent, the next allocation is treated as exhausted. `None` removes
/// the limit.
pub fn set_budget(reservations: Option<usize>) {
	POLICY.with(|cell| {
		let mut policy = cell.get();
		policy.budget = reservations;
		cell.set(policy);
	});
}

/// Restores the default abort-on-exhaustion policy with no budget.
pub fn reset() {
	POLICY.with(|cell| cell.set(DEFAULT_POLICY));
}

/// Reports exhaustion of `what` through the installed handler.
pub fn exhausted(what: &str) -> ! {
	let handler = POLICY.with(|cell| cell.get().handler);
	handler(what)
}

/// Consumes one unit of budget, or reports exhaustion when none is left.
fn spend(what: &str) {
	let allowed = POLICY.with(|cell| {
		let mut policy = cell.get();
		let allowed = match policy.budget {
			None => true,
			Some(0) => false,
			Some(remaining) => {
				policy.budget = Some(remaining - 1);
				true
			}
		};
		cell.set(policy);
		allowed
	});
	if !allowed {
		exhausted(what);
	}
}

/// Makes room for `additional` more elements in `buf`.
///
/// Only an actual reallocation counts against the budget.
pub(crate) fn reserve<T>(buf: &mut Vec<T>, additional: usize, what: &str) {
	if buf.capacity() - buf.len() >= additional {
		return;
	}
	spend(what);
	if buf.try_reserve(additional).is_err() {
		exhausted(what);
	}
}

/// Appends `value` to `buf`, growing it under the policy.
pub(crate) fn push<T>(buf: &mut Vec<T>, value: T, what: &str) {
	reserve(buf, 1, what);
	buf.push(value);
}

/// Returns an owned copy of `text`, allocated under the policy.
pub(crate) fn copy_str(text: &str, what: &str) -> String {
	let mut owned = String::new();
	if !text.is_empty() {
		spend(what);
		if owned.try_reserve_exact(text.len()).is_err() {
			exhausted(what);
		}
		owned.push_str(text);
	}
	owned
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use std::panic::{self, AssertUnwindSafe};

	pub(crate) fn panic_handler(what: &str) -> ! {
		panic!("exhausted: {what}")
	}

	/// Runs `f` with a panicking handler and the given budget, then restores
	/// the default policy. Returns `true` when `f` hit exhaustion.
	pub(crate) fn exhausts_within<F: FnOnce()>(budget: usize, f: F) -> bool {
		set_handler(panic_handler);
		set_budget(Some(budget));
		let outcome = panic::catch_unwind(AssertUnwindSafe(f));
		reset();
		outcome.is_err()
	}

	#[test]
	fn budget_counts_only_real_growth() {
		let mut buf: Vec<u32> = Vec::with_capacity(4);
		let hit = exhausts_within(0, || {
			for i in 0..4 {
				push(&mut buf, i, "test buffer");
			}
		});
		assert!(!hit);
		assert_eq!(buf, vec![0, 1, 2, 3]);
	}

	#[test]
	fn exhausted_budget_reaches_handler() {
		let mut buf: Vec<u32> = Vec::new();
		assert!(exhausts_within(0, || push(&mut buf, 7, "test buffer")));
		assert!(buf.is_empty());
	}

	#[test]
	fn copy_str_spends_budget() {
		assert!(exhausts_within(0, || {
			copy_str("word", "word");
		}));
		assert!(!exhausts_within(0, || {
			assert_eq!(copy_str("", "word"), "");
		}));
		assert!(!exhausts_within(1, || {
			assert_eq!(copy_str("word", "word"), "word");
		}));
	}

	#[test]
	fn reset_removes_budget() {
		set_budget(Some(0));
		reset();
		let mut buf: Vec<u8> = Vec::new();
		push(&mut buf, 1, "test buffer");
		assert_eq!(buf, vec![1]);
	}
}
