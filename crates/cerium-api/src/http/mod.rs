//! HTTP/REST API layer for Cerium.
//!
//! Axum-based REST API under `/api/` with cookie sessions, plain JSON
//! bodies and `{status, message}` error objects.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
