// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tracked: a client for a personal workout log
//!
//! This crate keeps a signed-in session and a local copy of the user's
//! workouts in sync with a remote workout service, and derives the filtered,
//! paginated view that the command line front end shows.

pub mod cli;
pub mod config;
pub mod edit;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;
pub mod time_utils;
pub mod view;

use config::Config;
use services::{ApiClient, SessionManager, WorkoutStore};
use std::sync::Arc;
use storage::{FileTokenStore, TokenStore};

/// Shared application context, passed explicitly to everything that needs
/// the session or the workout store.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub workouts: WorkoutStore,
}

impl AppContext {
    /// Wire up the client with the given token store.
    pub fn new(config: Config, tokens: Arc<dyn TokenStore>) -> error::Result<Self> {
        let api = ApiClient::new(&config.api_url, config.http_timeout)?;
        let session = Arc::new(SessionManager::new(api, tokens));
        let workouts = WorkoutStore::new(Arc::clone(&session));

        Ok(Self {
            config,
            session,
            workouts,
        })
    }

    /// Wire up the client with the token persisted under `config.state_dir`.
    pub fn with_file_store(config: Config) -> error::Result<Self> {
        let tokens = Arc::new(FileTokenStore::new(&config.state_dir));
        Self::new(config, tokens)
    }
}
