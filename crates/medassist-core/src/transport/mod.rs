//! Agent service transport abstractions.
//!
//! - `AgentTransport`: RPITIT trait for concrete transports
//! - `BoxAgentTransport`: object-safe wrapper for dynamic dispatch

pub mod box_transport;
pub mod provider;

pub use box_transport::BoxAgentTransport;
pub use provider::AgentTransport;
