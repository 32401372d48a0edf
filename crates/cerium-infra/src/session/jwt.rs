//! HS256 JWT implementation of `SessionCodec`.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use cerium_core::auth::session::SessionCodec;
use cerium_types::error::SessionError;
use cerium_types::identity::SessionClaims;

/// Signs and verifies `{roll_number, exp}` claims with a shared HMAC key.
#[derive(Clone)]
pub struct JwtSessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionCodec {
    pub fn new(key: &SecretString) -> Self {
        let secret = key.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl SessionCodec for JwtSessionCodec {
    fn sign(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                ErrorKind::InvalidSignature => SessionError::BadSignature,
                _ => SessionError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn codec(key: &str) -> JwtSessionCodec {
        JwtSessionCodec::new(&SecretString::from(key.to_string()))
    }

    fn claims(roll: &str, exp: chrono::DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            roll_number: roll.to_string(),
            exp: exp.timestamp(),
        }
    }

    #[test]
    fn test_sign_then_verify() {
        let c = codec("k");
        let token = c.sign(&claims("A", Utc::now() + Duration::hours(1))).unwrap();
        assert_eq!(c.verify(&token).unwrap().roll_number, "A");
    }

    #[test]
    fn test_expired_token() {
        let c = codec("k");
        let token = c.sign(&claims("A", Utc::now() - Duration::minutes(5))).unwrap();
        assert_eq!(c.verify(&token).unwrap_err(), SessionError::Expired);
    }

    #[test]
    fn test_token_from_other_key_is_bad_signature() {
        let token = codec("other")
            .sign(&claims("A", Utc::now() + Duration::hours(1)))
            .unwrap();
        assert_eq!(codec("k").verify(&token).unwrap_err(), SessionError::BadSignature);
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            codec("k").verify("not-a-jwt"),
            Err(SessionError::Malformed(_))
        ));
    }
}
