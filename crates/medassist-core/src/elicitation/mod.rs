//! Missing-parameter elicitation.
//!
//! When the agent reports required parameters, the engine builds a form
//! pre-filled from extracted data, collects values, and compiles them into a
//! single sentence that is sent back to the agent as a user turn.

pub mod canonical;
pub mod compile;
pub mod engine;
pub mod field;
pub mod values;

pub use canonical::CanonicalParam;
pub use engine::ElicitationEngine;
pub use values::ParameterValues;
