use rand::Rng;

use serde::{Deserialize, Serialize};


/// One weighted directed edge out of a [`Node`].
///
/// The weight counts how many times the target word was observed
/// immediately after the owning node's word. A fresh edge starts at zero
/// and every observation adds exactly one; weights never decrease.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Association {
	/// Word text of the destination node.
	target: String,
	/// Number of times this transition was observed.
	weight: u64,
}

impl Association {
	fn new(target: &str) -> Self {
		Self {
			target: target.to_owned(),
			weight: 0,
		}
	}

	/// Word text of the destination node.
	pub fn target(&self) -> &str {
		&self.target
	}

	/// Observation count of this transition.
	pub fn weight(&self) -> u64 {
		self.weight
	}
}

/// A vocabulary entry: one word plus its outgoing transitions.
///
/// Conceptually a node in a Markov chain where outgoing edges are weighted
/// by their number of observations. Edges are kept in order of first
/// discovery, so a cumulative scan over them is deterministic for a given
/// draw.
///
/// ## Responsibilities
/// - Accumulate transition observations during learning
/// - Pick the next word using weighted random sampling
/// - Merge with another node for the same word (ex. parallel corpus builds)
///
/// ## Invariants
/// - At most one association per distinct target word
/// - Every association of a learned node has a strictly positive weight
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Node {
	/// The word this node stands for. The sentinel node uses the empty string.
	word: String,
	/// Outgoing transitions, in order of first discovery.
	outgoing: Vec<Association>,
}

impl Node {
	/// Creates a node with no outgoing edges.
	pub fn new(word: &str) -> Self {
		Self {
			word: word.to_owned(),
			outgoing: Vec::new(),
		}
	}

	/// The word this node stands for.
	pub fn word(&self) -> &str {
		&self.word
	}

	/// Outgoing transitions in discovery order.
	pub fn outgoing(&self) -> &[Association] {
		&self.outgoing
	}

	/// True if at least one transition leaves this node.
	pub fn has_next(&self) -> bool {
		!self.outgoing.is_empty()
	}

	/// Records one observation of `target` following this node's word.
	///
	/// - If the transition already exists, its weight is incremented.
	/// - Otherwise a new association is appended at weight zero, then
	///   counted once.
	pub fn observe(&mut self, target: &str) {
		let index = match self.outgoing.iter().position(|assoc| assoc.target == target) {
			Some(index) => index,
			None => {
				self.outgoing.push(Association::new(target));
				self.outgoing.len() - 1
			}
		};
		self.outgoing[index].weight += 1;
	}

	/// Picks the next word using weighted random sampling.
	///
	/// The probability of selecting an edge is its weight over the total
	/// weight of all outgoing edges. The scan walks the edges in discovery
	/// order with a cumulative subtraction, so ties in accumulated weight
	/// resolve to the earliest-inserted edge for a given draw.
	///
	/// Returns `None` if the node has no outgoing edges.
	pub fn next_word(&self) -> Option<&str> {
		if self.outgoing.is_empty() {
			return None;
		}

		let total: u64 = self.outgoing.iter().map(|assoc| assoc.weight).sum();
		if total == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		let mut r = rand::rng().random_range(0..total);

		let mut fallback: Option<&str> = None;
		for assoc in &self.outgoing {
			if r < assoc.weight {
				return Some(&assoc.target);
			}
			r -= assoc.weight;
			fallback = Some(&assoc.target);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}

	/// Merges another node into this one.
	///
	/// Both nodes must stand for the same word. Weights of matching targets
	/// are summed; targets unknown to this node are appended in the order
	/// the other node discovered them.
	///
	/// # Errors
	/// Returns an error if the node words do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.word != other.word {
			return Err("Word mismatch".to_owned());
		}

		for assoc in &other.outgoing {
			match self.outgoing.iter().position(|own| own.target == assoc.target) {
				Some(index) => self.outgoing[index].weight += assoc.weight,
				None => self.outgoing.push(assoc.clone()),
			}
		}

		Ok(())
	}
}
