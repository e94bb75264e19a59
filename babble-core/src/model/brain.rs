use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::generate::GenerateEngine;
use crate::model::learn::LearnEngine;
use crate::model::store::{StoreStats, WordStore};

/// Thread-safe facade over one [`WordStore`] and its two engines.
///
/// The store is an explicit instance owned here: created at start-up,
/// optionally flushed to a snapshot at shutdown, never an ambient
/// singleton. Learning takes the write lock, so one learning event
/// (find-or-create node, find-or-create edge, increment) is a single
/// atomic unit; generation and statistics only take the read lock and may
/// run concurrently with each other.
///
/// # Responsibilities
/// - Mediate all access to the shared graph
/// - Expose learning, generation, statistics, snapshots and merging
#[derive(Debug)]
pub struct Brain {
	store: RwLock<WordStore>,
	learner: LearnEngine,
	generator: GenerateEngine,
}

impl Default for Brain {
	fn default() -> Self {
		Self::new()
	}
}

impl Brain {
	/// Creates a brain over an empty store with the default step cap.
	pub fn new() -> Self {
		Self::from_store(WordStore::new())
	}

	/// Wraps an existing store, keeping the default step cap.
	pub fn from_store(store: WordStore) -> Self {
		Self {
			store: RwLock::new(store),
			learner: LearnEngine::new(),
			generator: GenerateEngine::default(),
		}
	}

	/// Replaces the generation step cap.
	///
	/// # Errors
	/// Returns an error if `step_cap` is zero.
	pub fn with_step_cap(mut self, step_cap: usize) -> Result<Self, String> {
		self.generator = GenerateEngine::new(step_cap)?;
		Ok(self)
	}

	/// Loads a brain from a corpus file (see [`WordStore::open`]).
	pub fn open<P: AsRef<Path>>(corpus_path: P) -> Result<Self, Box<dyn std::error::Error>> {
		Ok(Self::from_store(WordStore::open(corpus_path)?))
	}

	/// Restores a brain from a snapshot written by [`Brain::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
		Ok(Self::from_store(WordStore::load(path)?))
	}

	/// Incorporates one observed utterance. Blank input is a no-op.
	pub fn learn(&self, text: &str) {
		self.learner.learn(&mut self.write(), text);
	}

	/// Generates one utterance, tokens joined by single spaces.
	///
	/// An empty string is a valid result: the store has nothing to say yet.
	pub fn generate(&self) -> String {
		self.generator.generate(&self.read()).join(" ")
	}

	/// Aggregate counts over the underlying store.
	pub fn stats(&self) -> StoreStats {
		self.read().stats()
	}

	/// Clones the current graph, e.g. for an external persistence flush.
	pub fn snapshot(&self) -> WordStore {
		self.read().clone()
	}

	/// Sums another store's observations into this one.
	pub fn absorb(&self, other: &WordStore) -> Result<(), String> {
		self.write().merge(other)
	}

	/// Writes the current graph to a snapshot file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
		self.read().save(path)
	}

	/// Replaces the current graph with a snapshot from disk.
	pub fn restore<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
		let store = WordStore::load(path)?;
		*self.write() = store;
		Ok(())
	}

	// A poisoned lock only means another thread panicked mid-call; weights
	// are monotonic counters and nodes are never removed, so the graph
	// itself stays consistent. Recover the guard instead of dropping the
	// operation.
	fn read(&self) -> RwLockReadGuard<'_, WordStore> {
		self.store.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, WordStore> {
		self.store.write().unwrap_or_else(PoisonError::into_inner)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn learn_then_generate_through_the_facade() {
		let brain = Brain::new();
		assert_eq!(brain.generate(), "");

		brain.learn("hello world");
		assert_eq!(brain.generate(), "hello world");
	}

	#[test]
	fn absorb_adds_foreign_observations() {
		let brain = Brain::new();
		brain.learn("a b");

		let mut other = WordStore::new();
		LearnEngine::new().learn(&mut other, "a b");

		brain.absorb(&other).unwrap();

		let stats = brain.stats();
		assert_eq!(stats.words, 2);
		assert_eq!(stats.observations, 4);
	}

	#[test]
	fn concurrent_learning_keeps_every_observation() {
		let brain = Brain::new();
		let threads = 8;
		let repeats = 100;

		std::thread::scope(|scope| {
			for _ in 0..threads {
				scope.spawn(|| {
					for _ in 0..repeats {
						brain.learn("ping pong");
					}
				});
			}
		});

		let stats = brain.stats();
		assert_eq!(stats.words, 2);
		assert_eq!(stats.observations, (threads * repeats * 2) as u64);
	}
}
