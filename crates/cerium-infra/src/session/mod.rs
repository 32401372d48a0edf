//! Session credential adapters.

pub mod jwt;
