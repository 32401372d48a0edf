//! Random token generation backed by `rand`.

use rand::Rng;
use rand::distributions::Alphanumeric;

use cerium_core::service::token::{RESPONSE_TOKEN_LEN, TokenGenerator, WIDGET_UID_LEN};

/// Alphanumeric (`a-z`, `A-Z`, `0-9`) tokens from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    fn sequence(len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn response_token(&self) -> String {
        Self::sequence(RESPONSE_TOKEN_LEN)
    }

    fn widget_uid(&self) -> String {
        Self::sequence(WIDGET_UID_LEN)
    }
}
