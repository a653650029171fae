//! Infrastructure layer for MedAssist.
//!
//! Contains the `reqwest` implementation of the `AgentTransport` port defined
//! in `medassist-core` and the TOML configuration loader.

pub mod agent;
pub mod config;
