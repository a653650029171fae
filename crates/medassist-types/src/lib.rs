//! Shared domain types for the MedAssist consultation client.
//!
//! This crate contains the types used across the workspace: transcript
//! turns, agent wire payloads, connectivity state, form schema, configuration
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod form;
pub mod turn;
