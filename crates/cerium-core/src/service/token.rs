//! TokenGenerator trait for server-assigned secrets and widget uids.
//!
//! Defined in cerium-core so services can mint identifiers without coupling
//! to a randomness source. The `rand`-backed adapter lives in cerium-infra.

/// Length of a form's response token.
pub const RESPONSE_TOKEN_LEN: usize = 50;

/// Length of a server-assigned widget uid.
pub const WIDGET_UID_LEN: usize = 24;

pub trait TokenGenerator: Send + Sync {
    /// A fresh export secret for a new form.
    fn response_token(&self) -> String;

    /// A fresh widget uid.
    fn widget_uid(&self) -> String;
}
