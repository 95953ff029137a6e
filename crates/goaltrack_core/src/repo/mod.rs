//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the string-keyed store contract goal state is written through.
//! - Encode/decode the goal list and rollover marker under fixed keys.
//!
//! # Invariants
//! - The goal list and the rollover marker live under distinct keys.
//! - Loading never fails the caller; unreadable state degrades to empty.

pub mod goal_codec;
pub mod kv_repo;
