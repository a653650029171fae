//! HTTP transport for the MedAssist agent service.
//!
//! This module provides [`HttpAgentClient`], which implements the
//! [`AgentTransport`](medassist_core::transport::AgentTransport) trait with
//! `reqwest`.

pub mod client;

pub use client::HttpAgentClient;
