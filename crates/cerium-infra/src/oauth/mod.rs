//! OAuth identity provider adapters.

pub mod client;
