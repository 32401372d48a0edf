//! Caller identity, session claims, and identity-provider profiles.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Identity {
    /// No valid session credential.
    #[default]
    Anonymous,
    /// A logged-in user, identified by roll number.
    User(String),
}

impl Identity {
    pub fn user(roll_number: impl Into<String>) -> Self {
        Identity::User(roll_number.into())
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn roll_number(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::User(rno) => Some(rno.as_str()),
        }
    }

    /// Storage key for this identity. Anonymous callers share the empty key.
    pub fn key(&self) -> &str {
        self.roll_number().unwrap_or("")
    }

    /// True iff this is the logged-in user `roll_number`.
    pub fn is(&self, roll_number: &str) -> bool {
        matches!(self, Identity::User(rno) if rno == roll_number)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Anonymous => write!(f, "anonymous"),
            Identity::User(rno) => write!(f, "{rno}"),
        }
    }
}

/// Claims carried by a signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub roll_number: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// Profile returned by the identity provider and stored in `users`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub roll_number: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub email: String,
}

/// OAuth authorization code posted by the frontend after redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCode {
    pub code: String,
    #[serde(default)]
    pub redirect_uri: String,
}
