//! Shared-password session gate.
//!
//! # Responsibility
//! - Hold the process-wide "authenticated" flag that gates tree loading.
//! - Persist the flag across runs in one small file.
//!
//! # Invariants
//! - `open` only reads persisted state; it never authenticates by itself.
//! - A failed login never changes state.
//! - `logout` leaves no persisted flag behind.
//! - The gate is a convenience lock, not a security boundary.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const AUTHENTICATED_MARKER: &str = "authenticated";

/// Errors from session gate operations.
#[derive(Debug)]
pub enum SessionError {
    /// Candidate password does not match the shared password.
    InvalidPassword,
    /// Shared password is blank, so nobody can log in.
    PasswordNotConfigured,
    /// Reading or writing the persisted flag failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPassword => write!(f, "incorrect password"),
            Self::PasswordNotConfigured => write!(f, "shared password is not configured"),
            Self::Io { path, source } => {
                write!(f, "session file `{}` is not usable: {source}", path.display())
            }
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Gate collaborator deciding whether the tree may load at all.
#[derive(Debug)]
pub struct SessionGate {
    flag_path: PathBuf,
    shared_password: String,
    authenticated: bool,
}

impl SessionGate {
    /// Opens the gate state persisted at `flag_path`.
    ///
    /// A missing file means "not authenticated".
    pub fn open(
        flag_path: impl Into<PathBuf>,
        shared_password: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let flag_path = flag_path.into();
        let authenticated = match std::fs::read_to_string(&flag_path) {
            Ok(content) => content.trim() == AUTHENTICATED_MARKER,
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(source) => {
                return Err(SessionError::Io {
                    path: flag_path,
                    source,
                })
            }
        };

        Ok(Self {
            flag_path,
            shared_password: shared_password.into(),
            authenticated,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn flag_path(&self) -> &Path {
        &self.flag_path
    }

    /// Checks `candidate` against the shared password and persists success.
    pub fn login(&mut self, candidate: &str) -> Result<(), SessionError> {
        let expected = self.shared_password.trim();
        if expected.is_empty() {
            return Err(SessionError::PasswordNotConfigured);
        }
        if candidate.trim() != expected {
            warn!("event=session_login module=session status=rejected");
            return Err(SessionError::InvalidPassword);
        }

        std::fs::write(&self.flag_path, AUTHENTICATED_MARKER).map_err(|source| {
            SessionError::Io {
                path: self.flag_path.clone(),
                source,
            }
        })?;
        self.authenticated = true;
        info!("event=session_login module=session status=ok");
        Ok(())
    }

    /// Clears the flag in memory and on disk.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.authenticated = false;
        match std::fs::remove_file(&self.flag_path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.flag_path.clone(),
                    source,
                })
            }
        }
        info!("event=session_logout module=session status=ok");
        Ok(())
    }
}
