//! Client-side JWT inspection. Signatures are never verified here; the
//! server is the only party that trusts a token.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry, seconds since the epoch.
    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default)]
    pub iat: Option<i64>,

    #[serde(default)]
    pub iss: Option<String>,

    #[serde(default)]
    pub authorities: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,

    #[error("token payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not a JSON object: {0}")]
    Payload(#[from] serde_json::Error),
}

pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut parts = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_sig), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };
    if payload.is_empty() {
        return Err(TokenError::Malformed);
    }

    let payload = payload.trim_end_matches('=');
    let bytes = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(b) => b,
        Err(err) => STANDARD_NO_PAD.decode(payload).map_err(|_| err)?,
    };
    let claims: Claims = serde_json::from_slice(&bytes)?;
    Ok(claims)
}

impl Claims {
    /// Subject claim, ignoring blank values.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.exp
            .and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
    }

    /// A token without `exp` never expires.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        match self.exp {
            Some(exp) => now.unix_timestamp() >= exp,
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/session/jwt_tests.rs"]
mod tests;
