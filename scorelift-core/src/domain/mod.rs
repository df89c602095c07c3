//! Core domain types
//!
//! This module contains the domain structures shared across scorelift crates.
//! These types describe what an import job produced and where a submission
//! currently stands, and are shared between the client (which produces them)
//! and callers (which render them).

pub mod message;
pub mod progress;
pub mod report;
