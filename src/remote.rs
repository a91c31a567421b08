//! HTTP gateways for the user API.

use anyhow::{Context, Result};

use crate::session::SessionStore;

mod auth;
mod error;
mod http_client;
mod upload;
mod users;

pub use self::auth::{AuthGateway, JWT_TOKEN_HEADER, LoginResponse};
pub use self::error::ApiError;
pub use self::upload::{ProgressReader, UploadOutcome, UploadProgress};
pub use self::users::{UserGateway, user_form_fields};

/// Shared request plumbing: base URL, reqwest client and the session used to
/// attach bearer tokens.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self> {
        // Requests are never timed out; a hung call stalls only its own flow.
        let client = reqwest::blocking::Client::builder()
            .user_agent("user-portal")
            .timeout(None::<std::time::Duration>)
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}
