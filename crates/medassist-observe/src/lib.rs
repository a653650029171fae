//! Observability setup for MedAssist: structured logging plus optional
//! OpenTelemetry span export.

pub mod tracing_setup;
