//! Authenticated session, provided by the external login flow.
//!
//! The session is read once at startup and passed to whatever needs it. This
//! program never writes it.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Role of the signed-in administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
    Viewer,
}

impl Role {
    /// Whether this role may register internet users
    pub fn can_register_users(&self) -> bool {
        matches!(self, Self::Admin | Self::Operator)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
            Self::Viewer => "viewer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    fn session_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "iums", "iums-tui").map(|dirs| dirs.data_dir().join("session.json"))
    }

    /// Load the session: `IUMS_SESSION_TOKEN` first, then the session file
    pub fn load() -> Result<Self> {
        if let Ok(token) = std::env::var("IUMS_SESSION_TOKEN") {
            if !token.trim().is_empty() {
                return Ok(Self {
                    token,
                    username: std::env::var("USER").unwrap_or_else(|_| "admin".to_string()),
                    role: Role::Admin,
                    expires_at: None,
                });
            }
        }

        let path = Self::session_path().context("Could not determine the session location")?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("No session found at {}; sign in first", path.display()))?;
        let session: Session = serde_json::from_str(&content)
            .with_context(|| format!("Session file {} is malformed", path.display()))?;
        Ok(session)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }

    /// Refuse sessions that are expired or not allowed to register users
    pub fn authorize_registration(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired(now) {
            bail!("Session for {} has expired; sign in again", self.username);
        }
        if !self.role.can_register_users() {
            bail!(
                "{} ({}) is not allowed to register internet users",
                self.username,
                self.role.label()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn session(role: Role, expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            token: "t0ken".into(),
            username: "karimi".into(),
            role,
            expires_at,
        }
    }

    #[test]
    fn test_roles_allowed_to_register() {
        assert!(Role::Admin.can_register_users());
        assert!(Role::Operator.can_register_users());
        assert!(!Role::Viewer.can_register_users());
    }

    #[test]
    fn test_authorize_admin_without_expiry() {
        assert_ok!(session(Role::Admin, None).authorize_registration(Utc::now()));
    }

    #[test]
    fn test_viewer_refused() {
        let err = session(Role::Viewer, None)
            .authorize_registration(Utc::now())
            .unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn test_expired_refused() {
        let now = Utc::now();
        let s = session(Role::Admin, Some(now - Duration::minutes(1)));
        assert!(s.is_expired(now));
        assert_err!(s.authorize_registration(now));
    }

    #[test]
    fn test_future_expiry_accepted() {
        let now = Utc::now();
        let s = session(Role::Operator, Some(now + Duration::hours(8)));
        assert!(!s.is_expired(now));
        assert_ok!(s.authorize_registration(now));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"token": "abc", "username": "karimi", "role": "operator", "expires_at": "2030-01-01T00:00:00Z"}"#;
        let s: Session = serde_json::from_str(json).unwrap();
        assert_eq!(s.role, Role::Operator);
        assert!(s.expires_at.is_some());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let path = std::env::temp_dir().join("iums-tui-no-such-session.json");
        let err = Session::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("sign in first"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("iums-tui-session-{}.json", std::process::id()));
        fs::write(&path, r#"{"token": "abc", "username": "karimi", "role": "admin"}"#).unwrap();
        let s = Session::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(s.username, "karimi");
        assert_eq!(s.role, Role::Admin);
    }
}
