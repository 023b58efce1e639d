//! Mock session identity and open-notice tracking.
//!
//! # Responsibility
//! - Hold the single active identity, or none when logged out.
//! - Track the last-opened notice so an open transition counts a view at
//!   most once.
//!
//! # Invariants
//! - Login replaces the active identity; logout clears it and the
//!   open-notice marker.
//! - This is not a security boundary: any accepted identity is trusted by
//!   the rest of the system.

use crate::config::Credentials;
use crate::model::id::NoticeId;
use crate::model::notice::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Authentication failure for the mock credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid username or password"),
        }
    }
}

impl Error for AuthError {}

/// Process-wide session state.
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<UserId>,
    open_notice: Option<NoticeId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a session from the persisted identity slot.
    pub fn with_identity(identity: Option<UserId>) -> Self {
        Self {
            identity,
            open_notice: None,
        }
    }

    /// Validates the credential pair and activates the identity.
    ///
    /// Returns the activated identity. The sole accepted pair comes from
    /// configuration; this mirrors the mocked single-credential login and
    /// must not be hardened further.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        accepted: &Credentials,
    ) -> Result<UserId, AuthError> {
        let username = username.trim();
        let password = password.trim();
        if username != accepted.username || password != accepted.password {
            return Err(AuthError::InvalidCredentials);
        }
        let identity = username.to_string();
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Clears the identity and the open-notice marker.
    pub fn logout(&mut self) {
        self.identity = None;
        self.open_notice = None;
    }

    pub fn current_identity(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Marks `id` as the open notice.
    ///
    /// Returns `true` when this is a fresh open transition (a different
    /// notice than the one currently open), which is the caller's cue to
    /// count a view. Re-opening the already-open notice returns `false`.
    /// The marker lives in memory only: after a restart the first open of
    /// any notice is a fresh transition again.
    pub fn begin_open(&mut self, id: &str) -> bool {
        let transition = self.open_notice.as_deref() != Some(id);
        self.open_notice = Some(id.to_string());
        transition
    }

    /// Clears the open-notice marker (modal closed).
    pub fn close_notice(&mut self) {
        self.open_notice = None;
    }

    pub fn open_notice(&self) -> Option<&NoticeId> {
        self.open_notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, Session};
    use crate::config::Credentials;

    fn accepted() -> Credentials {
        Credentials {
            username: "user".to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn login_trims_input_and_checks_both_fields() {
        let mut session = Session::new();
        assert_eq!(
            session.login("user", "wrong", &accepted()),
            Err(AuthError::InvalidCredentials)
        );
        assert!(session.login(" user ", " password ", &accepted()).is_ok());
        assert_eq!(session.current_identity().map(String::as_str), Some("user"));
    }

    #[test]
    fn logout_clears_identity_and_open_notice() {
        let mut session = Session::with_identity(Some("user".to_string()));
        session.begin_open("notice_1_a");
        session.logout();
        assert!(session.current_identity().is_none());
        assert!(session.open_notice().is_none());
    }

    #[test]
    fn begin_open_reports_transitions_only() {
        let mut session = Session::new();
        assert!(session.begin_open("a"));
        assert!(!session.begin_open("a"));
        assert!(session.begin_open("b"));
        assert!(session.begin_open("a"));

        session.close_notice();
        assert!(session.begin_open("a"));
    }
}
