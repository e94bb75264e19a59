//! Incremental word-transition language model.
//!
//! This crate provides a frequency-weighted first-order chat model including:
//! - A growing word-transition graph with online learning
//! - Utterance generation by weighted random walk
//! - Snapshot persistence and multithreaded corpus bootstrap
//! - Ordered fan-out of observed utterances to feature subscribers
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core graph model, learning and generation logic.
///
/// This module exposes the store, both engines and the thread-safe facade
/// while keeping internal representations private.
pub mod model;

/// Ordered delivery of observed utterances to feature subscribers.
pub mod events;

/// I/O utilities (corpus loading, path helpers).
pub mod io;
