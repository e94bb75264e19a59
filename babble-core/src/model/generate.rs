use crate::model::store::{SENTINEL, WordStore};

/// Default upper bound on the number of words in one generated utterance.
pub const DEFAULT_STEP_CAP: usize = 64;

/// Produces new utterances by weighted random walks over a [`WordStore`].
///
/// A walk starts at the sentinel node and normally ends on a node with no
/// outgoing edges. Self-loops and cycles are reachable from ordinary
/// traffic, so the walk also stops at a configured step cap.
///
/// # Invariants
/// - `step_cap` is always >= 1
#[derive(Clone, Copy, Debug)]
pub struct GenerateEngine {
	/// Maximum number of words appended to one utterance.
	step_cap: usize,
}

impl Default for GenerateEngine {
	fn default() -> Self {
		Self { step_cap: DEFAULT_STEP_CAP }
	}
}

impl GenerateEngine {
	/// Creates an engine with a custom step cap.
	///
	/// # Errors
	/// Returns an error if `step_cap` is zero.
	pub fn new(step_cap: usize) -> Result<Self, String> {
		if step_cap == 0 {
			return Err("Step cap must be at least 1".to_owned());
		}
		Ok(Self { step_cap })
	}

	/// Upper bound on the number of words per generated utterance.
	pub fn step_cap(&self) -> usize {
		self.step_cap
	}

	/// Performs one weighted random walk and returns the words visited.
	///
	/// The result may be empty: a store that has learned nothing has no
	/// edges out of the sentinel, and an empty utterance is a normal
	/// outcome rather than an error.
	pub fn generate(&self, store: &WordStore) -> Vec<String> {
		let mut words = Vec::new();

		let mut current = match store.node(SENTINEL) {
			Some(node) => node,
			None => return words,
		};

		while words.len() < self.step_cap {
			let next = match current.next_word() {
				Some(word) => word.to_owned(),
				None => break,
			};

			// Learning creates the target node before the edge, so the
			// lookup only fails on foreign data; stop rather than guess.
			current = match store.node(&next) {
				Some(node) => node,
				None => break,
			};
			words.push(next);
		}

		words
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::learn::LearnEngine;

	#[test]
	fn an_empty_store_generates_nothing() {
		let engine = GenerateEngine::default();
		assert!(engine.generate(&WordStore::new()).is_empty());
	}

	#[test]
	fn a_single_chain_is_reproduced_exactly() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();
		learner.learn(&mut store, "a b c");

		let engine = GenerateEngine::default();
		for _ in 0..20 {
			assert_eq!(engine.generate(&store), ["a", "b", "c"]);
		}
	}

	#[test]
	fn the_walk_stops_at_the_step_cap() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();
		// "a a" learns a self-loop, so the walk can only end at the cap.
		learner.learn(&mut store, "a a");

		let engine = GenerateEngine::new(10).unwrap();
		for _ in 0..20 {
			assert_eq!(engine.generate(&store).len(), 10);
		}
	}

	#[test]
	fn a_zero_step_cap_is_rejected() {
		assert!(GenerateEngine::new(0).is_err());
		assert!(GenerateEngine::new(1).is_ok());
	}
}
