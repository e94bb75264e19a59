use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::io::{read_lines, snapshot_sibling};
use crate::model::learn::LearnEngine;
use crate::model::node::Node;

/// Key of the sentinel node that stands for "start of utterance".
///
/// Every learned line begins with a transition out of this node, and every
/// generated walk starts on it.
pub const SENTINEL: &str = "";

/// Aggregate counts over a [`WordStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreStats {
	/// Vocabulary entries, sentinel excluded.
	pub words: usize,
	/// Distinct directed edges.
	pub links: usize,
	/// Total observed transitions (sum of all edge weights).
	pub observations: u64,
}

impl fmt::Display for StoreStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"The word list contains {} words, {} links and {} observed transitions.",
			self.words, self.links, self.observations
		)
	}
}

/// The shared word graph.
///
/// Maps word text to its [`Node`] and owns every node and edge. Keys are
/// exact strings, case-sensitive, no normalization. Nodes are created
/// lazily the first time a word is referenced and are never removed, so
/// the vocabulary grows monotonically with input.
///
/// # Responsibilities
/// - Lazy node lookup and creation (`get_or_create`)
/// - Snapshot persistence with exact integer weights
/// - Corpus bootstrap with multithreaded merging
/// - Aggregate statistics
///
/// # Invariants
/// - The sentinel node is always present
/// - No two nodes share a word
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordStore {
	words: HashMap<String, Node>,
}

impl Default for WordStore {
	fn default() -> Self {
		Self::new()
	}
}

impl WordStore {
	/// Creates a store holding only the sentinel node.
	pub fn new() -> Self {
		let mut words = HashMap::new();
		words.insert(SENTINEL.to_owned(), Node::new(SENTINEL));
		Self { words }
	}

	/// Returns the node for `word`, creating an empty one if needed.
	///
	/// Idempotent: a second call with the same word returns the node the
	/// first call inserted. There is no way to delete or merge nodes.
	pub fn get_or_create(&mut self, word: &str) -> &mut Node {
		self.words
			.entry(word.to_owned())
			.or_insert_with(|| Node::new(word))
	}

	/// Returns the node for `word`, if the word has been seen.
	pub fn node(&self, word: &str) -> Option<&Node> {
		self.words.get(word)
	}

	/// Aggregate counts over the graph. The sentinel is not counted as a
	/// word, but its outgoing edges are counted as links.
	pub fn stats(&self) -> StoreStats {
		let links = self.words.values().map(|node| node.outgoing().len()).sum();
		let observations = self
			.words
			.values()
			.flat_map(|node| node.outgoing())
			.map(|assoc| assoc.weight())
			.sum();

		StoreStats {
			words: self.words.len().saturating_sub(1),
			links,
			observations,
		}
	}

	/// Loads a store from a corpus file, using a binary snapshot when present.
	///
	/// `corpus_path` is a plain text file with one utterance per line. The
	/// first load learns the whole corpus and writes a sibling `.bin`
	/// snapshot; later loads deserialize the snapshot directly.
	pub fn open<P: AsRef<Path>>(corpus_path: P) -> Result<Self, Box<dyn std::error::Error>> {
		let snapshot_path = snapshot_sibling(&corpus_path)?;
		if snapshot_path.exists() {
			Self::load(snapshot_path)
		} else {
			Self::read_corpus_file(corpus_path, snapshot_path)
		}
	}

	/// Reads a corpus, splits its lines into chunks, learns partial stores
	/// in parallel, merges them, and writes the snapshot for future fast
	/// loading.
	///
	/// # Notes
	/// - Chunk count scales with CPU cores.
	/// - Merging partial stores is commutative on edge weights, so the
	///   chunk arrival order does not affect the learned counts.
	fn read_corpus_file<PC, PS>(corpus_path: PC, snapshot_path: PS) -> Result<Self, Box<dyn std::error::Error>>
	where
		PC: AsRef<Path>,
		PS: AsRef<Path>,
	{
		let lines = read_lines(&corpus_path)?;
		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = ((lines.len() + chunks - 1) / chunks).max(1);

		let (tx, rx) = mpsc::channel();
		for chunk in lines.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let learner = LearnEngine::new();
				let mut partial = WordStore::new();
				for line in chunk {
					learner.learn(&mut partial, &line);
				}
				tx.send(partial).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut store = WordStore::new();
		for partial in rx.iter() {
			store.merge(&partial)?;
		}

		store.save(&snapshot_path)?;

		Ok(store)
	}

	/// Serializes the full graph, sentinel included, with exact weights.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Restores a snapshot written by [`WordStore::save`].
	///
	/// A snapshot missing the sentinel node (foreign or truncated data)
	/// gets one re-inserted, so generation degrades to an empty utterance
	/// instead of failing.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
		let bytes = std::fs::read(path)?;
		let mut store: WordStore = postcard::from_bytes(&bytes)?;
		store
			.words
			.entry(SENTINEL.to_owned())
			.or_insert_with(|| Node::new(SENTINEL));
		Ok(store)
	}

	/// Merges another store into this one.
	///
	/// Edge weights for matching (source, target) pairs are summed; nodes
	/// and edges unknown to this store are cloned over. Merging commutes
	/// with sequential learning: the resulting counts equal the counts of
	/// learning both inputs in any order.
	///
	/// # Errors
	/// Propagates a node word mismatch, which indicates a corrupted map.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		for (word, node) in &other.words {
			match self.words.get_mut(word) {
				Some(existing) => existing.merge(node)?,
				None => {
					self.words.insert(word.clone(), node.clone());
				}
			}
		}

		Ok(())
	}
}
