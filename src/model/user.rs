use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use super::role::{Authority, Role, deserialize_optional_role};

/// Server timestamps arrive either as epoch milliseconds or as formatted text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    pub fn to_display(&self) -> String {
        match self {
            Timestamp::Millis(ms) => {
                let nanos = i128::from(*ms) * 1_000_000;
                time::OffsetDateTime::from_unix_timestamp_nanos(nanos)
                    .ok()
                    .and_then(|t| {
                        t.format(&time::format_description::well_known::Rfc3339)
                            .ok()
                    })
                    .unwrap_or_else(|| ms.to_string())
            }
            Timestamp::Text(s) => s.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, rename = "userId")]
    pub user_id: String,

    #[serde(default, rename = "firstName")]
    pub first_name: String,

    #[serde(default, rename = "lastName")]
    pub last_name: String,

    #[serde(default, rename = "userName", alias = "username")]
    pub user_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, rename = "loginDateDisplay", skip_serializing_if = "Option::is_none")]
    pub login_date_display: Option<Timestamp>,

    #[serde(
        default,
        rename = "lastLoginDateDisplay",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login_date_display: Option<Timestamp>,

    #[serde(default, rename = "joinDate", skip_serializing_if = "Option::is_none")]
    pub join_date: Option<Timestamp>,

    #[serde(default, rename = "profileImageUrl")]
    pub profile_image_url: String,

    #[serde(default, deserialize_with = "deserialize_optional_role")]
    pub role: Option<Role>,

    #[serde(default, deserialize_with = "deserialize_authorities")]
    pub authorities: Vec<String>,

    #[serde(default, rename = "isActive", alias = "active")]
    pub active: bool,

    #[serde(default, rename = "isNotLocked", alias = "notLocked")]
    pub not_locked: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Server-sent authorities win; the role's fixed set is used when none were sent.
    pub fn can(&self, authority: Authority) -> bool {
        if !self.authorities.is_empty() {
            return self
                .authorities
                .iter()
                .any(|a| Authority::parse(a) == Some(authority));
        }
        self.role.is_some_and(|r| r.has(authority))
    }
}

// Spring serializes granted authorities either as plain strings or as
// `{"authority": "..."}` objects.
fn deserialize_authorities<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Plain(String),
        Granted { authority: String },
    }

    let raw: Option<Vec<Entry>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|e| match e {
            Entry::Plain(s) => s,
            Entry::Granted { authority } => authority,
        })
        .collect())
}

/// Generic status body returned by delete, reset-password and error responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponseBody {
    #[serde(default, rename = "httpStatusCode")]
    pub http_status_code: Option<u16>,

    #[serde(default, rename = "httpStatus")]
    pub http_status: Option<String>,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default, rename = "timeStamp", skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<Timestamp>,
}

impl HttpResponseBody {
    /// The server message, if it carries a non-blank one.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NewUser {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
}

/// Editable fields submitted by the add and update forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub active: bool,
    pub not_locked: bool,
}

impl From<&User> for UserForm {
    fn from(u: &User) -> Self {
        Self {
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            user_name: u.user_name.clone(),
            email: u.email.clone(),
            role: u.role,
            active: u.active,
            not_locked: u.not_locked,
        }
    }
}

/// An image picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ProfileImage {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read profile image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "profile-image".to_string());
        let content_type = guess_content_type(&file_name).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
