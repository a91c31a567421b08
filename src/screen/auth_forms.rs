use std::sync::Arc;

use super::dispatch::Dispatcher;
use crate::guard::Route;
use crate::model::{Credentials, NewUser, User};
use crate::notify::{NotificationType, Notifier, send_notification};
use crate::remote::{ApiError, AuthGateway, JWT_TOKEN_HEADER, LoginResponse};

enum LoginCompletion {
    LoggedIn(Result<LoginResponse, ApiError>),
}

/// Controller behind the login form.
pub struct LoginScreen {
    auth: AuthGateway,
    notifier: Arc<dyn Notifier>,
    dispatcher: Dispatcher<LoginCompletion>,
    show_loading: bool,
    navigation: Option<Route>,
}

impl LoginScreen {
    pub fn new(auth: AuthGateway, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            auth,
            notifier,
            dispatcher: Dispatcher::new(),
            show_loading: false,
            navigation: None,
        }
    }

    /// A visitor with a live session skips the form.
    pub fn init(&mut self) -> Option<Route> {
        if self.auth.is_logged_in() {
            self.navigation = Some(Route::UserManagement);
        }
        self.navigation
    }

    pub fn is_loading(&self) -> bool {
        self.show_loading
    }

    /// Where the flow wants to go next, once it has decided.
    pub fn navigation(&self) -> Option<Route> {
        self.navigation
    }

    pub fn login(&mut self, credentials: Credentials) {
        self.show_loading = true;
        let auth = self.auth.clone();
        self.dispatcher.spawn("login", move |_| {
            LoginCompletion::LoggedIn(auth.login(&credentials))
        });
    }

    pub fn wait_idle(&mut self) {
        while let Some(c) = self.dispatcher.next_blocking(None) {
            self.apply(c);
        }
    }

    pub fn teardown(&mut self) {
        self.dispatcher.cancel_all();
        self.show_loading = false;
    }

    fn apply(&mut self, completion: LoginCompletion) {
        let LoginCompletion::LoggedIn(result) = completion;
        self.show_loading = false;
        match result.and_then(|resp| self.persist(resp)) {
            Ok(user) => {
                tracing::info!(user = %user.user_name, "logged in");
                self.navigation = Some(Route::UserManagement);
            }
            Err(err) => {
                tracing::warn!("login: {:#}", err);
                send_notification(
                    self.notifier.as_ref(),
                    NotificationType::Error,
                    err.server_message(),
                );
            }
        }
    }

    fn persist(&self, resp: LoginResponse) -> Result<User, ApiError> {
        let token = resp.token().ok_or(ApiError::MissingToken {
            label: "login".to_string(),
            header: JWT_TOKEN_HEADER,
        })?;
        self.auth.save_token(token)?;
        self.auth.add_user_to_cache(&resp.user)?;
        Ok(resp.user)
    }
}

enum RegisterCompletion {
    Registered(Result<User, ApiError>),
}

/// Controller behind the registration form.
pub struct RegisterScreen {
    auth: AuthGateway,
    notifier: Arc<dyn Notifier>,
    dispatcher: Dispatcher<RegisterCompletion>,
    show_loading: bool,
    registered: Option<User>,
}

impl RegisterScreen {
    pub fn new(auth: AuthGateway, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            auth,
            notifier,
            dispatcher: Dispatcher::new(),
            show_loading: false,
            registered: None,
        }
    }

    pub fn init(&mut self) -> Option<Route> {
        self.auth
            .is_logged_in()
            .then_some(Route::UserManagement)
    }

    pub fn is_loading(&self) -> bool {
        self.show_loading
    }

    pub fn registered(&self) -> Option<&User> {
        self.registered.as_ref()
    }

    pub fn register(&mut self, user: NewUser) {
        self.show_loading = true;
        let auth = self.auth.clone();
        self.dispatcher.spawn("register", move |_| {
            RegisterCompletion::Registered(auth.register(&user))
        });
    }

    pub fn wait_idle(&mut self) {
        while let Some(c) = self.dispatcher.next_blocking(None) {
            self.apply(c);
        }
    }

    pub fn teardown(&mut self) {
        self.dispatcher.cancel_all();
        self.show_loading = false;
    }

    fn apply(&mut self, completion: RegisterCompletion) {
        let RegisterCompletion::Registered(result) = completion;
        self.show_loading = false;
        match result {
            Ok(user) => {
                let msg = format!(
                    "A new account was created for {}. Please check your email for password to log in.",
                    user.first_name
                );
                send_notification(self.notifier.as_ref(), NotificationType::Success, Some(&msg));
                self.registered = Some(user);
            }
            Err(err) => {
                tracing::warn!("register: {:#}", err);
                send_notification(
                    self.notifier.as_ref(),
                    NotificationType::Error,
                    err.server_message(),
                );
            }
        }
    }
}
