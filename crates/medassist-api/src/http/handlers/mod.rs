//! HTTP request handlers for the REST API.

pub mod consultation;
pub mod health;
