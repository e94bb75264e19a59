use crate::model::store::{SENTINEL, WordStore};

/// Ingests observed utterances into a [`WordStore`].
///
/// Learning is a single pass over the tokens of one utterance: a cursor
/// starts at the sentinel node and one edge weight is bumped per token.
/// Repeated observation of a transition increments the existing edge
/// rather than creating a duplicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LearnEngine;

impl LearnEngine {
	pub fn new() -> Self {
		Self
	}

	/// Incorporates one utterance into the graph.
	///
	/// The text is split on whitespace; empty tokens from repeated
	/// separators are discarded, and blank input is a silent no-op.
	/// Tokens are stored verbatim, case preserved. For each token the
	/// target node is resolved (created on first sight), the association
	/// from the cursor node is found or created, its weight is incremented
	/// by one, and the cursor advances to the target.
	///
	/// A single-token utterance creates exactly one edge, sentinel to
	/// token. Identical consecutive tokens create a self-loop; that is
	/// intended, not an error.
	pub fn learn(&self, store: &mut WordStore, text: &str) {
		let mut current = SENTINEL.to_owned();

		for token in text.split_whitespace() {
			store.get_or_create(token);
			store.get_or_create(&current).observe(token);
			current = token.to_owned();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_input_changes_nothing() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();

		learner.learn(&mut store, "");
		learner.learn(&mut store, "   ");
		learner.learn(&mut store, " \t ");

		let stats = store.stats();
		assert_eq!(stats.words, 0);
		assert_eq!(stats.observations, 0);
	}

	#[test]
	fn repeated_observation_increments_a_single_edge() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();

		learner.learn(&mut store, "a b");
		learner.learn(&mut store, "a b");

		let a = store.node("a").unwrap();
		assert_eq!(a.outgoing().len(), 1);
		assert_eq!(a.outgoing()[0].target(), "b");
		assert_eq!(a.outgoing()[0].weight(), 2);

		let sentinel = store.node(SENTINEL).unwrap();
		assert_eq!(sentinel.outgoing().len(), 1);
		assert_eq!(sentinel.outgoing()[0].weight(), 2);
	}

	#[test]
	fn a_single_token_creates_exactly_one_edge() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();

		learner.learn(&mut store, "hello");

		let stats = store.stats();
		assert_eq!(stats.words, 1);
		assert_eq!(stats.links, 1);
		assert!(!store.node("hello").unwrap().has_next());
	}

	#[test]
	fn repeated_separators_produce_no_empty_tokens() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();

		learner.learn(&mut store, "  a \t  b  ");

		assert_eq!(store.stats().words, 2);
		assert_eq!(store.node("a").unwrap().outgoing()[0].target(), "b");
	}

	#[test]
	fn identical_consecutive_tokens_create_a_self_loop() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();

		learner.learn(&mut store, "a a");

		let a = store.node("a").unwrap();
		assert_eq!(a.outgoing().len(), 1);
		assert_eq!(a.outgoing()[0].target(), "a");
		assert_eq!(a.outgoing()[0].weight(), 1);
	}

	#[test]
	fn case_is_preserved() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();

		learner.learn(&mut store, "Hello hello");

		assert_eq!(store.stats().words, 2);
		assert!(store.node("Hello").is_some());
		assert!(store.node("hello").is_some());
	}

	#[test]
	fn weights_count_exact_transition_occurrences() {
		let learner = LearnEngine::new();
		let mut store = WordStore::new();

		learner.learn(&mut store, "a b c");
		learner.learn(&mut store, "a b d");
		learner.learn(&mut store, "b c");

		let weight = |source: &str, target: &str| -> u64 {
			store
				.node(source)
				.unwrap()
				.outgoing()
				.iter()
				.find(|assoc| assoc.target() == target)
				.map(|assoc| assoc.weight())
				.unwrap_or(0)
		};

		assert_eq!(weight(SENTINEL, "a"), 2);
		assert_eq!(weight(SENTINEL, "b"), 1);
		assert_eq!(weight("a", "b"), 2);
		assert_eq!(weight("b", "c"), 2);
		assert_eq!(weight("b", "d"), 1);
		assert_eq!(weight("c", "b"), 0);
	}
}
