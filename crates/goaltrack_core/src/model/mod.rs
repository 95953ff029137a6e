//! Domain model for goals and calendar-day bookkeeping.
//!
//! # Responsibility
//! - Define the canonical goal record and its wire shape.
//! - Keep date arithmetic for rollover and deadlines in one place.
//!
//! # Invariants
//! - Every goal is identified by a stable `GoalId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod calendar;
pub mod goal;
