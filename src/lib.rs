//! Client for the user-management API: session handling, REST gateways, a
//! route guard and the controllers that drive the login, registration and
//! user-management views.

pub mod config;
pub mod guard;
pub mod logging;
pub mod model;
pub mod notify;
pub mod remote;
pub mod screen;
pub mod session;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::remote::{ApiClient, AuthGateway, UserGateway};
use crate::session::SessionStore;
use crate::store::{FileStorage, Storage};

/// Gateways sharing one session, as wired up at application start.
#[derive(Clone)]
pub struct Client {
    pub auth: AuthGateway,
    pub users: UserGateway,
}

impl Client {
    pub fn new(api_url: &str, storage: Arc<dyn Storage>) -> Result<Self> {
        let session = SessionStore::new(storage);
        let api = ApiClient::new(api_url, session)?;
        Ok(Self {
            auth: AuthGateway::new(api.clone()),
            users: UserGateway::new(api),
        })
    }

    /// File-backed client rooted at `data_dir`.
    pub fn open(api_url: &str, data_dir: &Path) -> Result<Self> {
        let storage = FileStorage::open(data_dir)?;
        Self::new(api_url, Arc::new(storage))
    }

    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }
}
