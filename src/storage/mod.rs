// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent key-value storage for the session token.
//!
//! The session manager is the only writer. Everything else reads the token
//! fresh on each call rather than caching it.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::Result;

/// Storage key names as constants.
pub mod keys {
    /// Opaque bearer token of the current session
    pub const TOKEN: &str = "token";
}

/// Durable storage of exactly one secret value, the session token.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, `None` if absent.
    fn get(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Succeeds if nothing is stored.
    fn clear(&self) -> Result<()>;
}
