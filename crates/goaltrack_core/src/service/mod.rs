//! Core use-case services.
//!
//! # Responsibility
//! - Own goal state and expose the operations allowed to mutate it.
//! - Drive the recurring rollover check.
//! - Keep presentation layers decoupled from storage details.

pub mod goal_store;
pub mod rollover_scheduler;
