use reqwest::Url;
use reqwest::blocking::{RequestBuilder, Response};

use super::{ApiClient, ApiError};
use crate::model::HttpResponseBody;

// Endpoints reachable without a session.
const PUBLIC_PATHS: &[&str] = &["/user/login", "/user/register", "/user/resetpassword"];

pub(super) fn is_public(path: &str) -> bool {
    PUBLIC_PATHS
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{}/", p)))
}

impl ApiClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}{path}/{segment}` with `segment` percent-encoded.
    pub(super) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| anyhow::anyhow!("invalid api url {}: {}", self.url(path), e))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("api url {} cannot carry a path", self.base_url))?
            .push(segment);
        Ok(url)
    }

    /// Attaches the bearer token to non-public requests when one is stored.
    pub(super) fn authorize(&self, req: RequestBuilder, path: &str) -> RequestBuilder {
        if is_public(path) {
            return req;
        }
        match self.session.load_token() {
            Ok(Some(token)) if !token.is_empty() => {
                req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            }
            Ok(_) => req,
            Err(err) => {
                tracing::warn!("read token for {}: {:#}", path, err);
                req
            }
        }
    }

    pub(super) fn send(&self, req: RequestBuilder, label: &str) -> Result<Response, ApiError> {
        tracing::debug!(label, "sending request");
        let resp = req.send().map_err(|source| ApiError::Transport {
            label: label.to_string(),
            source,
        })?;
        self.ensure_ok(resp, label)
    }

    pub(super) fn ensure_ok(&self, resp: Response, label: &str) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().unwrap_or_default();
        let body = serde_json::from_str::<HttpResponseBody>(&text).ok();
        tracing::warn!(label, %status, "request rejected");
        Err(ApiError::Status {
            label: label.to_string(),
            status,
            body,
        })
    }

    pub(super) fn json<T: serde::de::DeserializeOwned>(
        &self,
        resp: Response,
        label: &str,
    ) -> Result<T, ApiError> {
        resp.json().map_err(|source| ApiError::Decode {
            label: label.to_string(),
            source,
        })
    }
}
