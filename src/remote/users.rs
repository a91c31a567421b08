use reqwest::blocking::multipart::{Form, Part};

use super::upload::{ProgressReader, UploadOutcome, UploadProgress};
use super::{ApiClient, ApiError};
use crate::model::{HttpResponseBody, ProfileImage, User, UserForm};
use crate::store::USERS_KEY;

#[derive(Clone)]
pub struct UserGateway {
    api: ApiClient,
}

/// Text fields of the add/update multipart form, in submission order.
/// Booleans travel as `true`/`false` text.
pub fn user_form_fields(actor: &str, form: &UserForm) -> Vec<(&'static str, String)> {
    vec![
        ("currentUsername", actor.to_string()),
        ("firstName", form.first_name.clone()),
        ("lastName", form.last_name.clone()),
        ("username", form.user_name.clone()),
        ("email", form.email.clone()),
        (
            "role",
            form.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
        ),
        ("isActive", form.active.to_string()),
        ("isNonLocked", form.not_locked.to_string()),
    ]
}

fn image_part(image: &ProfileImage) -> Result<Part, ApiError> {
    Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|source| ApiError::Transport {
            label: "profile image content type".to_string(),
            source,
        })
}

impl UserGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn list(&self) -> Result<Vec<User>, ApiError> {
        let path = "/user/list";
        let req = self.api.client.get(self.api.url(path));
        let resp = self.api.send(self.api.authorize(req, path), "list users")?;
        self.api.json(resp, "parse users")
    }

    pub fn add(
        &self,
        actor: &str,
        form: &UserForm,
        image: Option<&ProfileImage>,
    ) -> Result<User, ApiError> {
        self.submit("/user/add", "add user", actor, form, image)
    }

    pub fn update(
        &self,
        actor: &str,
        form: &UserForm,
        image: Option<&ProfileImage>,
    ) -> Result<User, ApiError> {
        self.submit("/user/update", "update user", actor, form, image)
    }

    pub fn create_user_form(
        &self,
        actor: &str,
        form: &UserForm,
        image: Option<&ProfileImage>,
    ) -> Result<Form, ApiError> {
        let mut out = Form::new();
        for (name, value) in user_form_fields(actor, form) {
            out = out.text(name, value);
        }
        if let Some(image) = image {
            out = out.part("profileImage", image_part(image)?);
        }
        Ok(out)
    }

    fn submit(
        &self,
        path: &str,
        label: &str,
        actor: &str,
        form: &UserForm,
        image: Option<&ProfileImage>,
    ) -> Result<User, ApiError> {
        let multipart = self.create_user_form(actor, form, image)?;
        let req = self.api.client.post(self.api.url(path)).multipart(multipart);
        let resp = self.api.send(self.api.authorize(req, path), label)?;
        self.api.json(resp, &format!("parse {} response", label))
    }

    pub fn reset_password(&self, email: &str) -> Result<HttpResponseBody, ApiError> {
        let path = "/user/resetpassword";
        let url = self.api.url_with_segment(path, email)?;
        let req = self.api.client.get(url);
        let resp = self.api.send(self.api.authorize(req, path), "reset password")?;
        self.api.json(resp, "parse reset password response")
    }

    pub fn delete(&self, username: &str) -> Result<HttpResponseBody, ApiError> {
        let path = "/user/delete";
        let url = self.api.url_with_segment(path, username)?;
        let req = self.api.client.delete(url);
        let resp = self.api.send(self.api.authorize(req, path), "delete user")?;
        self.api.json(resp, "parse delete response")
    }

    /// Uploads a new profile image, reporting progress through `on_progress`
    /// as the body is streamed.
    pub fn update_profile_image(
        &self,
        username: &str,
        image: &ProfileImage,
        on_progress: Box<dyn FnMut(UploadProgress) + Send>,
    ) -> Result<UploadOutcome, ApiError> {
        let path = "/user/updateProfileImage";
        let reader = ProgressReader::new(
            std::io::Cursor::new(image.bytes.clone()),
            image.len(),
            on_progress,
        );
        let part = Part::reader_with_length(reader, image.len())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|source| ApiError::Transport {
                label: "profile image content type".to_string(),
                source,
            })?;
        let multipart = Form::new()
            .text("username", username.to_string())
            .part("profileImage", part);

        let req = self.api.client.post(self.api.url(path)).multipart(multipart);
        let resp = self
            .api
            .send(self.api.authorize(req, path), "update profile image")?;
        let status = resp.status();
        let user = if status == reqwest::StatusCode::OK {
            Some(self.api.json(resp, "parse profile image response")?)
        } else {
            None
        };
        Ok(UploadOutcome { status, user })
    }

    pub fn add_users_to_cache(&self, users: &[User]) -> Result<(), ApiError> {
        let json = serde_json::to_string(users)
            .map_err(|e| anyhow::anyhow!("serialize user list: {}", e))?;
        self.api
            .session()
            .storage()
            .set_item(USERS_KEY, &json)?;
        Ok(())
    }

    /// Last fetched list; `None` when nothing has been cached yet.
    pub fn users_from_cache(&self) -> Result<Option<Vec<User>>, ApiError> {
        let Some(raw) = self.api.session().storage().get_item(USERS_KEY)? else {
            return Ok(None);
        };
        let users: Vec<User> =
            serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("parse cached users: {}", e))?;
        Ok(Some(users))
    }
}

#[cfg(test)]
#[path = "../tests/remote/users_tests.rs"]
mod tests;
