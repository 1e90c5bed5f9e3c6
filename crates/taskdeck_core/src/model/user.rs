//! User domain model.
//!
//! # Responsibility
//! - Define the user record keyed by chat handle.
//!
//! # Invariants
//! - `username` is globally unique; chat handles are unique by
//!   construction, so it doubles as the primary key.
//! - Users are created explicitly or implicitly on first assignment and
//!   never deleted by core logic.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// User of the chat-bot, keyed by their unique handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Globally unique chat handle, primary key.
    pub username: String,
    /// Informational display name of the user's home server.
    pub server_name: Option<String>,
}

impl User {
    /// Creates a user with a username only, the shape implicit creation
    /// uses.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            server_name: None,
        }
    }

    /// Checks the record against persistence contracts.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.username.trim().is_empty() {
            return Err(UserValidationError::BlankUsername);
        }
        Ok(())
    }
}

/// Validation error for user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    BlankUsername,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUsername => write!(f, "username must not be blank"),
        }
    }
}

impl Error for UserValidationError {}
