//! HTTP/REST API layer for MedAssist.
//!
//! Axum-based REST API at `/api/v1/` exposing the consultation session to a
//! web front end, with envelope response format and CORS support.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
