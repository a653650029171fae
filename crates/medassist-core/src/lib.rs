//! Consultation logic and transport trait definitions for MedAssist.
//!
//! This crate defines the "port" (`AgentTransport`) that the infrastructure
//! layer implements, plus everything that runs on top of it: the transcript
//! store, connectivity monitor, message dispatcher, parameter elicitation
//! engine, and the consultation session tying them together. It depends only
//! on `medassist-types` -- never on `medassist-infra` or any HTTP crate.

pub mod dispatch;
pub mod elicitation;
pub mod monitor;
pub mod session;
pub mod transcript;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
