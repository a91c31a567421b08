use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use super::{ApiClient, ApiError};
use crate::model::{Credentials, NewUser, User};
use crate::session::SessionStore;

/// Response header carrying the bearer token issued on login.
pub const JWT_TOKEN_HEADER: &str = "Jwt-Token";

/// Full login response; the caller pulls the token out of the headers.
#[derive(Debug)]
pub struct LoginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub user: User,
}

impl LoginResponse {
    pub fn token(&self) -> Option<&str> {
        self.headers
            .get(JWT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Clone)]
pub struct AuthGateway {
    api: ApiClient,
}

impl AuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let path = "/user/login";
        let req = self.api.client.post(self.api.url(path)).json(credentials);
        let resp = self.api.send(self.api.authorize(req, path), "login")?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let user: User = self.api.json(resp, "parse login response")?;
        Ok(LoginResponse {
            status,
            headers,
            user,
        })
    }

    pub fn register(&self, user: &NewUser) -> Result<User, ApiError> {
        let path = "/user/register";
        let req = self.api.client.post(self.api.url(path)).json(user);
        let resp = self.api.send(self.api.authorize(req, path), "register")?;
        self.api.json(resp, "parse registered user")
    }

    pub fn save_token(&self, token: &str) -> Result<(), ApiError> {
        Ok(self.session().save_token(token)?)
    }

    pub fn add_user_to_cache(&self, user: &User) -> Result<(), ApiError> {
        Ok(self.session().add_user_to_cache(user)?)
    }

    pub fn user_from_cache(&self) -> Result<Option<User>, ApiError> {
        Ok(self.session().user_from_cache()?)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session().is_logged_in()
    }

    /// Local only; the server keeps no session to invalidate.
    pub fn logout(&self) -> Result<(), ApiError> {
        Ok(self.session().logout()?)
    }
}
