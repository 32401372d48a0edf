//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (cerium-infra) implements. The core crate never depends on any specific
//! storage technology.

pub mod filler;
pub mod form;
pub mod response;
pub mod user;
