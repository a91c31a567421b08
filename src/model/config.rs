use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8081";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,

    /// Base URL of the user API; endpoints live under `{api_url}/user/...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api_url: None,
        }
    }
}
