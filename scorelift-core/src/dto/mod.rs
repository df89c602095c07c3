//! Data Transfer Objects for the gradebook wire protocol
//!
//! This module contains the request and reply shapes exchanged with the
//! gradebook's import service. DTOs mirror the wire contract exactly;
//! interpreting a reply into an outcome happens in the client.

pub mod export;
pub mod import;
