//! Scorelift Core
//!
//! Core types for the scorelift bulk score import client.
//!
//! This crate contains:
//! - Domain types: Core business entities (ImportReport, ImportPhase, etc.)
//! - DTOs: Data transfer objects matching the gradebook wire protocol

pub mod domain;
pub mod dto;
