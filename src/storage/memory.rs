// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory token store (tests and ephemeral sessions).

use super::TokenStore;
use crate::error::{ClientError, Result};
use std::sync::RwLock;

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        self.token
            .read()
            .map(|t| t.clone())
            .map_err(|e| ClientError::Storage(format!("token lock poisoned: {}", e)))
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| ClientError::Storage(format!("token lock poisoned: {}", e)))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| ClientError::Storage(format!("token lock poisoned: {}", e)))?;
        *guard = None;
        Ok(())
    }
}
