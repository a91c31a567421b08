//! Session Store: bearer token plus cached profile snapshot.

use std::sync::Arc;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use crate::model::User;
use crate::store::{Storage, TOKEN_KEY, USER_KEY, USERS_KEY};

pub mod jwt;

/// A validated, unexpired session derived from the stored token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub expires_at: Option<OffsetDateTime>,
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        self.storage
            .set_item(TOKEN_KEY, token)
            .context("store session token")
    }

    pub fn load_token(&self) -> Result<Option<String>> {
        self.storage.get_item(TOKEN_KEY).context("load session token")
    }

    pub fn add_user_to_cache(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user).context("serialize session user")?;
        self.storage
            .set_item(USER_KEY, &json)
            .context("store session user")
    }

    pub fn user_from_cache(&self) -> Result<Option<User>> {
        let Some(raw) = self.storage.get_item(USER_KEY).context("load session user")? else {
            return Ok(None);
        };
        let user: User = serde_json::from_str(&raw).context("parse cached session user")?;
        Ok(Some(user))
    }

    /// Clears every durable key; afterwards the client is fully logged out.
    pub fn logout(&self) -> Result<()> {
        for key in [TOKEN_KEY, USER_KEY, USERS_KEY] {
            self.storage
                .remove_item(key)
                .with_context(|| format!("remove {}", key))?;
        }
        tracing::info!("session cleared");
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.current_at(OffsetDateTime::now_utc())
    }

    /// Returns the session if the stored token is present, decodable, has a
    /// subject and has not expired at `now`. Any failed check logs out.
    pub fn current_at(&self, now: OffsetDateTime) -> Option<Session> {
        match self.validate_at(now) {
            Ok(session) => Some(session),
            Err(reason) => {
                tracing::debug!("session check failed: {:#}", reason);
                if let Err(err) = self.logout() {
                    tracing::warn!("clear session after failed check: {:#}", err);
                }
                None
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    pub fn is_logged_in_at(&self, now: OffsetDateTime) -> bool {
        self.current_at(now).is_some()
    }

    fn validate_at(&self, now: OffsetDateTime) -> Result<Session> {
        let token = self
            .load_token()?
            .filter(|t| !t.trim().is_empty())
            .context("no token stored")?;
        let claims = jwt::decode_claims(&token).context("decode token")?;
        let username = claims
            .subject()
            .context("token has no subject")?
            .to_string();
        if claims.is_expired_at(now) {
            anyhow::bail!("token expired");
        }
        Ok(Session {
            expires_at: claims.expires_at(),
            token,
            username,
        })
    }
}

#[cfg(test)]
#[path = "tests/session/session_tests.rs"]
mod tests;
