//! Explicit login session over durable client storage.
//!
//! # Design
//! - The session is an owned value threaded through the shell, never an ambient global.
//! - Lifecycle is `login -> active -> logout`; logout wipes every durable key.
//! - No credential is verified against the collaborator; only the form is validated.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::core::forms::{FieldErrors, LoginForm};

/// Durable key recording login state.
pub const LOGGED_IN_KEY: &str = "isLoggedIn";

const LOGGED_IN_VALUE: &str = "true";

/// Errors raised by durable client storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backing store could not be read or written.
    #[error("client storage failed")]
    Storage {
        /// Storage operation identifier.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

/// Key/value storage that survives restarts.
pub trait ClientStorage: Send + Sync {
    /// Read a key.
    ///
    /// # Errors
    /// Returns [`SessionError`] when the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a key.
    ///
    /// # Errors
    /// Returns [`SessionError`] when the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove every key.
    ///
    /// # Errors
    /// Returns [`SessionError`] when the store cannot be cleared.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local storage, used by tests and ephemeral surfaces.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.entries().clear();
        Ok(())
    }
}

/// Session lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No operator is logged in.
    #[default]
    LoggedOut,
    /// An operator logged in.
    Active,
}

/// Login rejection.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The form failed validation.
    #[error("login form is invalid")]
    Invalid(#[source] FieldErrors),
    /// The session could not be persisted.
    #[error("session could not be persisted")]
    Storage(#[source] SessionError),
}

/// Login session bound to a durable store.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn ClientStorage>,
    state: SessionState,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Session")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Rebuild the session from durable storage.
    ///
    /// # Errors
    /// Returns [`SessionError`] when the store cannot be read.
    pub fn restore(storage: Arc<dyn ClientStorage>) -> Result<Self, SessionError> {
        let state = match storage.get(LOGGED_IN_KEY)?.as_deref() {
            Some(LOGGED_IN_VALUE) => SessionState::Active,
            _ => SessionState::LoggedOut,
        };
        Ok(Self { storage, state })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Whether an operator is logged in.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active)
    }

    /// Validate the login form and start the session.
    ///
    /// # Errors
    /// Returns [`LoginError::Invalid`] for form errors and
    /// [`LoginError::Storage`] when the flag cannot be persisted.
    pub fn login(&mut self, form: &LoginForm) -> Result<(), LoginError> {
        form.validate().map_err(LoginError::Invalid)?;
        self.storage
            .set(LOGGED_IN_KEY, LOGGED_IN_VALUE)
            .map_err(LoginError::Storage)?;
        self.state = SessionState::Active;
        tracing::info!("session started");
        Ok(())
    }

    /// End the session and wipe durable storage.
    ///
    /// # Errors
    /// Returns [`SessionError`] when the store cannot be cleared.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::LoggedOut;
        self.storage.clear()?;
        tracing::info!("session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_login() -> LoginForm {
        LoginForm {
            email: "ops@example.com".into(),
            password: "secret".into(),
        }
    }

    #[test]
    fn login_persists_across_restore() {
        let storage: Arc<dyn ClientStorage> = Arc::new(MemoryStorage::new());
        let mut session = Session::restore(Arc::clone(&storage)).expect("restore");
        assert!(!session.is_active());
        session.login(&valid_login()).expect("login");
        let restored = Session::restore(storage).expect("restore");
        assert!(restored.is_active());
    }

    #[test]
    fn invalid_login_leaves_session_inactive() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = Session::restore(storage.clone()).expect("restore");
        let form = LoginForm {
            email: "nobody".into(),
            password: String::new(),
        };
        assert!(matches!(session.login(&form), Err(LoginError::Invalid(_))));
        assert!(!session.is_active());
        assert_eq!(storage.get(LOGGED_IN_KEY).expect("read"), None);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn login_logs_do_not_carry_the_address() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let mut session = Session::restore(Arc::new(MemoryStorage::new())).expect("restore");
        tracing::subscriber::with_default(subscriber, || session.login(&valid_login()))
            .expect("login");
        let text = String::from_utf8(logs.0.lock().expect("log buffer").clone()).expect("utf8");
        assert!(text.contains("session started"));
        assert!(!text.contains("ops@example.com"));
    }

    #[test]
    fn logout_clears_all_keys() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("theme", "dark").expect("seed");
        let mut session = Session::restore(storage.clone()).expect("restore");
        session.login(&valid_login()).expect("login");
        session.logout().expect("logout");
        assert!(!session.is_active());
        assert_eq!(storage.get("theme").expect("read"), None);
        assert_eq!(storage.get(LOGGED_IN_KEY).expect("read"), None);
    }
}
