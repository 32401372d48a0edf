//! Shared domain types for Cerium.
//!
//! This crate contains the core domain types used across the Cerium form
//! service: Form, Page, Widget, FormResponse, caller identity, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod form;
pub mod identity;
pub mod response;
