//! Caller authentication: session credential ports and the identity resolver.

pub mod provider;
pub mod resolver;
pub mod session;
