//! Domain model for habits and their daily check-ins.
//!
//! # Responsibility
//! - Define canonical data structures shared by store, services and callers.
//! - Own input normalization and validation rules.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - A check-in is one calendar date for one habit; it carries no time of day.

pub mod checkin;
pub mod habit;
