use std::sync::Arc;

use time::OffsetDateTime;

use super::dispatch::Dispatcher;
use super::search::filter_users;
use crate::guard::Route;
use crate::model::{HttpResponseBody, ProfileImage, Role, User, UserForm};
use crate::notify::{NotificationType, Notifier, send_notification};
use crate::remote::{ApiError, AuthGateway, UploadOutcome, UploadProgress, UserGateway};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListState {
    NotLoaded,
    Loading,
    Loaded,
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Progress,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileUploadStatus {
    pub status: UploadPhase,
    pub percentage: u8,
}

impl Default for FileUploadStatus {
    fn default() -> Self {
        Self {
            status: UploadPhase::Idle,
            percentage: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Submit {
    Add,
    Edit,
    CurrentUser,
}

enum Completion {
    Users {
        result: Result<Vec<User>, ApiError>,
        notify: bool,
    },
    Saved {
        submit: Submit,
        result: Result<User, ApiError>,
    },
    Deleted(Result<HttpResponseBody, ApiError>),
    PasswordReset(Result<HttpResponseBody, ApiError>),
    UploadProgress(UploadProgress),
    Uploaded(Result<UploadOutcome, ApiError>),
}

/// Controller behind the user-management view.
pub struct UserScreen {
    auth: AuthGateway,
    users_api: UserGateway,
    notifier: Arc<dyn Notifier>,
    dispatcher: Dispatcher<Completion>,

    title: String,
    list_state: ListState,
    refreshing: bool,
    users: Vec<User>,
    user: Option<User>,
    selected_user: Option<User>,
    edit_user: UserForm,
    current_username: String,
    profile_image: Option<ProfileImage>,
    file_status: FileUploadStatus,
    navigation: Option<Route>,
    torn_down: bool,
}

impl UserScreen {
    pub fn new(auth: AuthGateway, users_api: UserGateway, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            auth,
            users_api,
            notifier,
            dispatcher: Dispatcher::new(),
            title: "Users".to_string(),
            list_state: ListState::NotLoaded,
            refreshing: false,
            users: Vec::new(),
            user: None,
            selected_user: None,
            edit_user: UserForm::default(),
            current_username: String::new(),
            profile_image: None,
            file_status: FileUploadStatus::default(),
            navigation: None,
            torn_down: false,
        }
    }

    /// Reads the session user and starts the first list load.
    pub fn init(&mut self) {
        self.user = self.cached_session_user();
        self.load_users(true);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn change_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn list_state(&self) -> &ListState {
        &self.list_state
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.selected_user.as_ref()
    }

    pub fn edit_target(&self) -> &UserForm {
        &self.edit_user
    }

    pub fn file_status(&self) -> FileUploadStatus {
        self.file_status
    }

    pub fn pending_image(&self) -> Option<&ProfileImage> {
        self.profile_image.as_ref()
    }

    /// Set when the view must be left, e.g. after the server rejected the token.
    pub fn navigation(&self) -> Option<Route> {
        self.navigation
    }

    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending()
    }

    pub fn select_user(&mut self, user: &User) {
        self.selected_user = Some(user.clone());
    }

    /// Opens `user` for editing; later updates act on behalf of that username.
    pub fn edit_user(&mut self, user: &User) {
        self.edit_user = UserForm::from(user);
        self.current_username = user.user_name.clone();
    }

    pub fn set_edit_form(&mut self, form: UserForm) {
        self.edit_user = form;
    }

    pub fn set_profile_image(&mut self, image: ProfileImage) {
        self.profile_image = Some(image);
    }

    pub fn load_users(&mut self, show_notification: bool) {
        if self.refuse_after_teardown("load users") {
            return;
        }
        self.refreshing = true;
        self.list_state = ListState::Loading;
        let api = self.users_api.clone();
        self.dispatcher.spawn("list users", move |_| Completion::Users {
            result: api.list(),
            notify: show_notification,
        });
    }

    pub fn add_user(&mut self, form: UserForm) {
        if self.refuse_after_teardown("add user") {
            return;
        }
        self.refreshing = true;
        let api = self.users_api.clone();
        let image = self.profile_image.clone();
        self.dispatcher.spawn("add user", move |_| Completion::Saved {
            submit: Submit::Add,
            result: api.add("", &form, image.as_ref()),
        });
    }

    /// Submits the form opened by `edit_user`.
    pub fn update_user(&mut self) {
        let actor = self.current_username.clone();
        let form = self.edit_user.clone();
        self.submit_update(Submit::Edit, actor, form);
    }

    /// Updates `form` acting as the logged-in user.
    pub fn update_current_user(&mut self, form: UserForm) {
        self.current_username = self
            .cached_session_user()
            .map(|u| u.user_name)
            .unwrap_or_default();
        let actor = self.current_username.clone();
        self.submit_update(Submit::CurrentUser, actor, form);
    }

    fn submit_update(&mut self, submit: Submit, actor: String, form: UserForm) {
        if self.refuse_after_teardown("update user") {
            return;
        }
        self.refreshing = true;
        let api = self.users_api.clone();
        let image = self.profile_image.clone();
        self.dispatcher.spawn("update user", move |_| Completion::Saved {
            submit,
            result: api.update(&actor, &form, image.as_ref()),
        });
    }

    pub fn delete_user(&mut self, username: &str) {
        if self.refuse_after_teardown("delete user") {
            return;
        }
        self.refreshing = true;
        let api = self.users_api.clone();
        let username = username.to_string();
        self.dispatcher.spawn("delete user", move |_| {
            Completion::Deleted(api.delete(&username))
        });
    }

    pub fn reset_password(&mut self, email: &str) {
        if self.refuse_after_teardown("reset password") {
            return;
        }
        self.refreshing = true;
        let api = self.users_api.clone();
        let email = email.to_string();
        self.dispatcher.spawn("reset password", move |_| {
            Completion::PasswordReset(api.reset_password(&email))
        });
    }

    /// Uploads the pending image for the session user.
    pub fn update_profile_image(&mut self) {
        if self.refuse_after_teardown("update profile image") {
            return;
        }
        let Some(image) = self.profile_image.clone() else {
            self.notify(NotificationType::Warning, Some("No profile image selected."));
            return;
        };
        let Some(username) = self.user.as_ref().map(|u| u.user_name.clone()) else {
            self.notify(NotificationType::Error, Some("No logged in user."));
            return;
        };
        self.file_status = FileUploadStatus {
            status: UploadPhase::Progress,
            percentage: 0,
        };
        let api = self.users_api.clone();
        self.dispatcher.spawn("update profile image", move |reporter| {
            let progress = reporter.clone();
            let result = api.update_profile_image(
                &username,
                &image,
                Box::new(move |p| progress.report(Completion::UploadProgress(p))),
            );
            Completion::Uploaded(result)
        });
    }

    /// Filters the cached list into the visible list.
    pub fn search_users(&mut self, term: &str) {
        let cached = match self.users_api.users_from_cache() {
            Ok(list) => list.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("read cached users: {:#}", err);
                Vec::new()
            }
        };
        self.users = filter_users(&cached, term);
    }

    pub fn role(&self) -> Option<Role> {
        self.cached_session_user().and_then(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Some(Role::Admin) | Some(Role::SuperAdmin))
    }

    pub fn is_manager(&self) -> bool {
        self.is_admin() || self.role() == Some(Role::Manager)
    }

    pub fn is_admin_or_manager(&self) -> bool {
        self.is_admin() || self.is_manager()
    }

    /// Clears the local session; no server call is made.
    pub fn logout(&mut self) -> Route {
        if let Err(err) = self.auth.logout() {
            tracing::warn!("logout: {:#}", err);
        }
        self.user = None;
        self.notify(
            NotificationType::Success,
            Some("You've been successfully logged out"),
        );
        Route::Login
    }

    /// Drops every pending completion. Late responses are never applied.
    pub fn teardown(&mut self) {
        self.dispatcher.cancel_all();
        self.torn_down = true;
        self.refreshing = false;
    }

    /// Applies whatever completions have already arrived.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(c) = self.dispatcher.try_next() {
            self.apply(c);
            applied += 1;
        }
        applied
    }

    /// Blocks until every request (including follow-up refreshes) finished.
    pub fn wait_idle(&mut self) {
        while let Some(c) = self.dispatcher.next_blocking(None) {
            self.apply(c);
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Users { result, notify } => self.on_users(result, notify),
            Completion::Saved { submit, result } => self.on_saved(submit, result),
            Completion::Deleted(result) => match result {
                Ok(resp) => {
                    self.notify(NotificationType::Success, resp.message());
                    self.load_users(false);
                }
                Err(err) => self.on_failure("delete user", &err),
            },
            Completion::PasswordReset(result) => {
                self.refreshing = false;
                match result {
                    Ok(resp) => self.notify(NotificationType::Success, resp.message()),
                    Err(err) => self.on_failure("reset password", &err),
                }
            }
            Completion::UploadProgress(p) => {
                if let Some(pct) = p.percentage() {
                    self.file_status.percentage = pct;
                }
                self.file_status.status = UploadPhase::Progress;
            }
            Completion::Uploaded(result) => self.on_uploaded(result),
        }
    }

    fn on_users(&mut self, result: Result<Vec<User>, ApiError>, notify: bool) {
        self.refreshing = false;
        match result {
            Ok(users) => {
                if let Err(err) = self.users_api.add_users_to_cache(&users) {
                    tracing::warn!("cache user list: {:#}", err);
                }
                let count = users.len();
                self.users = users;
                self.list_state = ListState::Loaded;
                if notify {
                    let msg = format!("{} user(s) loaded successfully.", count);
                    self.notify(NotificationType::Success, Some(&msg));
                }
            }
            Err(err) => {
                self.list_state = ListState::Error(
                    err.server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| err.to_string()),
                );
                self.on_failure("list users", &err);
            }
        }
    }

    fn on_saved(&mut self, submit: Submit, result: Result<User, ApiError>) {
        self.clear_pending_image();
        match result {
            Ok(user) => {
                let verb = match submit {
                    Submit::Add => "added",
                    Submit::Edit | Submit::CurrentUser => "updated",
                };
                if submit == Submit::CurrentUser
                    && self.user.as_ref().map(|u| u.user_name.as_str()) == Some(&user.user_name)
                {
                    self.refresh_session_user(&user);
                }
                self.load_users(false);
                let msg = format!("{} {} successfully", user.full_name(), verb);
                self.notify(NotificationType::Success, Some(&msg));
            }
            Err(err) => self.on_failure("save user", &err),
        }
    }

    fn on_uploaded(&mut self, result: Result<UploadOutcome, ApiError>) {
        self.file_status.status = UploadPhase::Done;
        match result {
            Ok(UploadOutcome {
                status,
                user: Some(updated),
            }) if status == reqwest::StatusCode::OK => {
                let busted = cache_busted(&updated.profile_image_url, OffsetDateTime::now_utc());
                let mut session_user = self.user.clone().unwrap_or_else(|| updated.clone());
                session_user.profile_image_url = busted;
                self.refresh_session_user(&session_user);
                self.clear_pending_image();
                let msg = format!("{}'s profile image updated successfully", updated.first_name);
                self.notify(NotificationType::Success, Some(&msg));
                self.load_users(false);
            }
            Ok(outcome) => {
                tracing::warn!(status = %outcome.status, "profile image upload not accepted");
                self.notify(
                    NotificationType::Error,
                    Some("Unable to upload image. Please try again"),
                );
            }
            Err(err) => self.on_failure("update profile image", &err),
        }
    }

    fn on_failure(&mut self, action: &str, err: &ApiError) {
        tracing::warn!("{}: {:#}", action, err);
        self.refreshing = false;
        // 403 is a permission denial; only 401 means the token itself is dead.
        if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            tracing::info!("session rejected by server, logging out");
            if let Err(err) = self.auth.logout() {
                tracing::warn!("logout: {:#}", err);
            }
            self.user = None;
            self.navigation = Some(Route::Login);
        }
        self.notify(NotificationType::Error, err.server_message());
    }

    fn refresh_session_user(&mut self, user: &User) {
        if let Err(err) = self.auth.add_user_to_cache(user) {
            tracing::warn!("cache session user: {:#}", err);
        }
        self.user = Some(user.clone());
    }

    fn clear_pending_image(&mut self) {
        self.profile_image = None;
    }

    fn cached_session_user(&self) -> Option<User> {
        match self.auth.user_from_cache() {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!("read session user: {:#}", err);
                None
            }
        }
    }

    fn notify(&self, kind: NotificationType, message: Option<&str>) {
        send_notification(self.notifier.as_ref(), kind, message);
    }

    fn refuse_after_teardown(&self, action: &str) -> bool {
        if self.torn_down {
            tracing::debug!(action, "ignored after teardown");
        }
        self.torn_down
    }
}

/// Sets the `time` query parameter so viewers refetch the image. Any earlier
/// `time` parameter is dropped.
pub fn cache_busted(url: &str, now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let (base, query) = url.split_once('?').unwrap_or((url, ""));
    let mut params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty() && *p != "time" && !p.starts_with("time="))
        .collect();
    let stamp = format!("time={}", millis);
    params.push(&stamp);
    format!("{}?{}", base, params.join("&"))
}

#[cfg(test)]
#[path = "../tests/screen/user_screen_tests.rs"]
mod tests;
