//! Snapshot round-trips preserve topology and exact weights.

use babble_core::model::learn::LearnEngine;
use babble_core::model::store::WordStore;

#[test]
fn snapshot_round_trip_is_lossless() {
	let learner = LearnEngine::new();
	let mut store = WordStore::new();
	for line in [
		"the cat sat on the mat",
		"the cat ran",
		"a dog ran after the cat",
		"on and on and on",
	] {
		learner.learn(&mut store, line);
	}

	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("brain.bin");
	store.save(&path).expect("save");

	let restored = WordStore::load(&path).expect("load");

	// Equality covers every node (sentinel included), every association,
	// their discovery order and exact integer weights, so the generation
	// distribution is unchanged after reload.
	assert_eq!(store, restored);
}

#[test]
fn corpus_open_writes_and_reuses_a_snapshot() {
	let dir = tempfile::tempdir().expect("tempdir");
	let corpus = dir.path().join("chatlog.txt");
	std::fs::write(&corpus, "alpha beta\nbeta gamma\nalpha beta\n").expect("write corpus");

	let first = WordStore::open(&corpus).expect("corpus open");
	assert!(dir.path().join("chatlog.bin").exists());

	let second = WordStore::open(&corpus).expect("snapshot open");
	assert_eq!(first, second);

	let stats = first.stats();
	assert_eq!(stats.words, 3);
	assert_eq!(stats.observations, 6);
}
