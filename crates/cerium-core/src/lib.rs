//! Business logic and port definitions for Cerium.
//!
//! This crate defines the "ports" (repository, session codec, identity
//! provider traits) that the infrastructure layer implements, plus the
//! access-control and response-integrity engine built on them. It depends
//! only on `cerium-types` -- never on `cerium-infra` or any database/IO crate.

pub mod auth;
pub mod guard;
pub mod policy;
pub mod projector;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
