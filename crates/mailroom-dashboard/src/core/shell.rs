//! Navigation shell: route table, menu, and session gating.
//!
//! # Design
//! - Routes are a closed enum; unknown paths resolve to login.
//! - Dashboard routes require an active session and otherwise resolve to login.

use thiserror::Error;

use crate::core::forms::{FieldErrors, LoginForm, SignupForm};
use crate::core::session::{LoginError, Session, SessionError};

/// Screens reachable through the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Login screen (`/` and `/login`).
    Login,
    /// Signup screen.
    Signup,
    /// Password recovery placeholder.
    ForgotPassword,
    /// Recipient management screen.
    Recipients,
    /// Template management screen.
    Templates,
}

impl Route {
    /// Resolve a path; anything unknown maps to [`Route::Login`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "/signup" => Self::Signup,
            "/forgot-password" => Self::ForgotPassword,
            "/dashboard/email" => Self::Recipients,
            "/dashboard/template" => Self::Templates,
            _ => Self::Login,
        }
    }

    /// Canonical path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::ForgotPassword => "/forgot-password",
            Self::Recipients => "/dashboard/email",
            Self::Templates => "/dashboard/template",
        }
    }

    /// Whether the route needs an active session.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        matches!(self, Self::Recipients | Self::Templates)
    }
}

/// Sidebar entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    /// Display label.
    pub label: &'static str,
    /// Target route.
    pub route: Route,
}

/// Sidebar entries in display order.
pub const MENU: [MenuItem; 2] = [
    MenuItem {
        label: "Email",
        route: Route::Recipients,
    },
    MenuItem {
        label: "Template",
        route: Route::Templates,
    },
];

/// Navigation refusal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    /// A dashboard route was requested without a session.
    #[error("login required")]
    NotLoggedIn {
        /// Requested route path.
        path: &'static str,
    },
}

/// Route table bound to the session.
#[derive(Debug)]
pub struct Shell {
    session: Session,
    current: Route,
}

impl Shell {
    /// Start at the recipient screen when a session is active, else at login.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let current = if session.is_active() {
            Route::Recipients
        } else {
            Route::Login
        };
        Self { session, current }
    }

    /// Current route.
    #[must_use]
    pub const fn current(&self) -> Route {
        self.current
    }

    /// Bound session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Navigate by path, falling back to login where the route is gated.
    pub fn navigate(&mut self, path: &str) -> Route {
        let route = Route::parse(path);
        self.current = self.open(route).unwrap_or(Route::Login);
        self.current
    }

    /// Check that `route` may be shown.
    ///
    /// # Errors
    /// Returns [`ShellError::NotLoggedIn`] for dashboard routes without a session.
    pub fn open(&self, route: Route) -> Result<Route, ShellError> {
        if route.requires_session() && !self.session.is_active() {
            tracing::debug!(path = route.path(), "dashboard route gated");
            return Err(ShellError::NotLoggedIn { path: route.path() });
        }
        Ok(route)
    }

    /// Submit the login form and move to the recipient screen.
    ///
    /// # Errors
    /// Propagates [`LoginError`] from the session.
    pub fn login(&mut self, form: &LoginForm) -> Result<Route, LoginError> {
        self.session.login(form)?;
        self.current = Route::Recipients;
        Ok(self.current)
    }

    /// Validate the signup form and move to login; no account is created remotely.
    ///
    /// # Errors
    /// Returns the field errors when the form is invalid.
    pub fn signup(&mut self, form: &SignupForm) -> Result<Route, FieldErrors> {
        form.validate()?;
        self.current = Route::Login;
        Ok(self.current)
    }

    /// End the session and route to login.
    ///
    /// # Errors
    /// Returns [`SessionError`] when durable storage cannot be cleared.
    pub fn logout(&mut self) -> Result<Route, SessionError> {
        self.current = Route::Login;
        self.session.logout()?;
        Ok(self.current)
    }

    /// Sidebar entries.
    #[must_use]
    pub const fn menu(&self) -> &'static [MenuItem] {
        &MENU
    }
}
