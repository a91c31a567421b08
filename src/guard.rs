//! Navigation targets and the authentication guard.

use crate::session::SessionStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    UserManagement,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::UserManagement => "/user/management",
        }
    }

    /// Maps a path to a route; the empty path redirects to login.
    pub fn parse(path: &str) -> Option<Route> {
        match path.trim().trim_matches('/') {
            "" | "login" => Some(Route::Login),
            "register" => Some(Route::Register),
            "user/management" => Some(Route::UserManagement),
            _ => None,
        }
    }

    pub fn is_protected(self) -> bool {
        matches!(self, Route::UserManagement)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Allow(Route),
    Redirect(Route),
}

impl Navigation {
    pub fn target(self) -> Route {
        match self {
            Navigation::Allow(r) | Navigation::Redirect(r) => r,
        }
    }
}

/// Lets protected routes through only while the session is valid.
pub struct RouteGuard<'a> {
    session: &'a SessionStore,
}

impl<'a> RouteGuard<'a> {
    pub fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    pub fn can_activate(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn navigate(&self, route: Route) -> Navigation {
        if !route.is_protected() || self.can_activate() {
            Navigation::Allow(route)
        } else {
            tracing::info!(route = route.path(), "not logged in, redirecting to login");
            Navigation::Redirect(Route::Login)
        }
    }
}

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod tests;
