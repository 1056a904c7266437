//! Session state and the events emitted when it changes.

use std::fmt;

use collab_protocol::User;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where the session stands.
///
/// ```text
///  Unknown ──check ok──→ Authenticated ←──login── Anonymous
///     │                       │                      ↑ ↑
///     │                       └──logout / expiry─────┘ │
///     └──────────no credential / check failed──────────┘
/// ```
///
/// `Unknown` is the state before the first check and is never re-entered.
/// The identity lives inside `Authenticated`, so it can't exist without
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Not yet checked.
    #[default]
    Unknown,

    /// No usable credential.
    Anonymous,

    /// Signed in as this user.
    Authenticated(User),
}

impl SessionState {
    /// The signed-in user, if any.
    pub fn identity(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// `false` only before the first session check has finished.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Anonymous => f.write_str("anonymous"),
            Self::Authenticated(user) => write!(f, "signed in as {} ({})", user.email, user.global_status),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// A session transition worth telling the UI about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user became signed in, by login or by a successful session check.
    SignedIn(User),

    /// The user logged out.
    SignedOut,

    /// The service stopped accepting the credential. The UI should send
    /// the user to `redirect_to`.
    Expired { redirect_to: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_protocol::GlobalStatus;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "ada@example.com".into(),
            global_status: GlobalStatus::Active,
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_default_is_unknown() {
        let state = SessionState::default();
        assert!(!state.is_resolved());
        assert!(state.identity().is_none());
    }

    #[test]
    fn test_identity_only_when_authenticated() {
        assert!(SessionState::Anonymous.identity().is_none());
        assert!(SessionState::Anonymous.is_resolved());

        let state = SessionState::Authenticated(user());
        assert_eq!(state.identity().map(|u| u.email.as_str()), Some("ada@example.com"));
        assert!(state.is_authenticated());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Anonymous.to_string(), "anonymous");
        assert_eq!(
            SessionState::Authenticated(user()).to_string(),
            "signed in as ada@example.com (ACTIVE)"
        );
    }
}
