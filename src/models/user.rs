// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User identity and session models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who the current caller is. An absent `id` means unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Remote user ID (`_id`)
    pub id: Option<String>,
    /// Admin flag, unknown until a profile lookup succeeds
    pub is_admin: Option<bool>,
}

impl Identity {
    /// The unauthenticated identity.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Current authentication state: token plus the identity it resolved to.
///
/// Only constructed through [`Session::unauthenticated`] and
/// [`Session::authenticated`], so an identity with an ID always comes with a
/// token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    identity: Identity,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// A session whose token was validated by a profile lookup.
    pub fn authenticated(token: String, profile: ProfileUser) -> Self {
        Self {
            token: Some(token),
            identity: Identity {
                id: Some(profile.id),
                is_admin: Some(profile.is_admin),
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.id.is_some()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.id.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("identity", &self.identity)
            .finish()
    }
}

/// Email/password pair for register and login.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ─── Wire Types ──────────────────────────────────────────────

/// `POST /users/login` success body. Carries no identity fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
}

/// `GET /users/profile` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
}

/// User record returned by the profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub email: Option<String>,
}

/// Generic `{message}` body returned by register and delete.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
