// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: restore, login, logout and forced invalidation.
//!
//! The session manager is the single writer of the token store. Every
//! authenticated remote call in the crate goes through [`SessionManager::authorized`],
//! which reads the token fresh for that call and turns any 401 into a logout
//! plus a redirect-to-login signal.

use crate::error::{ClientError, Result};
use crate::middleware::auth::Route;
use crate::models::{Credentials, Session};
use crate::services::ApiClient;
use crate::storage::TokenStore;
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Capacity of the redirect signal channel.
const REDIRECT_CHANNEL_CAPACITY: usize = 16;

/// Owns the current [`Session`] and the token lifecycle.
pub struct SessionManager {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    session: RwLock<Session>,
    redirects: broadcast::Sender<Route>,
}

impl SessionManager {
    /// Create a manager starting out unauthenticated. Call
    /// [`restore`](Self::restore) before making routing decisions.
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        let (redirects, _) = broadcast::channel(REDIRECT_CHANNEL_CAPACITY);
        Self {
            api,
            tokens,
            session: RwLock::new(Session::unauthenticated()),
            redirects,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_authenticated()
    }

    /// Receive a [`Route::Login`] each time a session is forcibly invalidated.
    pub fn subscribe(&self) -> broadcast::Receiver<Route> {
        self.redirects.subscribe()
    }

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Rebuild the session from the persisted token.
    ///
    /// No token means no network call. A token the service will not accept
    /// (or any failure while checking it) is discarded.
    pub async fn restore(&self) -> Session {
        let token = match self.tokens.get() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No stored token, starting unauthenticated");
                return self.set_session(Session::unauthenticated());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                return self.set_session(Session::unauthenticated());
            }
        };

        match self.api.profile(&token).await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "Session restored");
                self.set_session(Session::authenticated(token, profile))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored token rejected, clearing session");
                if let Err(e) = self.tokens.clear() {
                    tracing::warn!(error = %e, "Failed to clear stored token");
                }
                self.set_session(Session::unauthenticated())
            }
        }
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, credentials: &Credentials) -> Result<String> {
        validate_credentials(credentials)?;

        let message = self
            .api
            .register(credentials)
            .await
            .map_err(rejection_to_auth)?;

        tracing::info!(email = %credentials.email, "Account registered");
        Ok(message)
    }

    /// Sign in: obtain a token, persist it, then resolve the identity.
    ///
    /// The login response has no identity fields, so the session is only
    /// complete after the follow-up profile lookup. If that lookup fails the
    /// token store is rolled back and the session is left as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        validate_credentials(credentials)?;

        let token = self
            .api
            .login(credentials)
            .await
            .map_err(rejection_to_auth)?;

        let previous = self.tokens.get()?;
        self.tokens.set(&token)?;

        match self.api.profile(&token).await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "Logged in");
                Ok(self.set_session(Session::authenticated(token, profile)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile lookup after login failed");
                let rollback = match previous {
                    Some(prev) => self.tokens.set(&prev),
                    None => self.tokens.clear(),
                };
                if let Err(re) = rollback {
                    tracing::warn!(error = %re, "Failed to roll back stored token");
                }
                Err(match e {
                    ClientError::Network(_) => e,
                    other => ClientError::Auth(format!("Failed to fetch user: {}", other)),
                })
            }
        }
    }

    /// Forget the session locally. Always succeeds, no network effect.
    pub fn logout(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Failed to clear stored token on logout");
        }
        self.set_session(Session::unauthenticated());
        tracing::info!("Logged out");
    }

    // ─── Authenticated Calls ─────────────────────────────────────

    /// Run an authenticated remote call.
    ///
    /// The token is re-read from the store for every call. A missing token or
    /// a 401 response invalidates the session and emits a redirect to login.
    pub async fn authorized<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = match self.tokens.get()? {
            Some(token) => token,
            None => {
                self.invalidate(None, operation);
                return Err(ClientError::Unauthorized("Not logged in".to_string()));
            }
        };

        match call(token.clone()).await {
            Err(err) if err.is_session_error() => {
                self.invalidate(Some(&token), operation);
                Err(err)
            }
            other => other,
        }
    }

    /// Clear the session after an authentication failure.
    ///
    /// `used_token` is the token the failing call carried. A 401 for a token
    /// that has since been replaced by a newer login is ignored. The redirect
    /// fires only on an actual transition, so overlapping failures signal once.
    fn invalidate(&self, used_token: Option<&str>, operation: &'static str) {
        let mut session = self.lock_session();

        let stored = self.tokens.get().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read stored token during invalidation");
            None
        });

        if let (Some(stored), Some(used)) = (stored.as_deref(), used_token) {
            if stored != used {
                tracing::debug!(operation, "Ignoring 401 for a superseded token");
                return;
            }
        }

        let was_signed_in = stored.is_some() || session.is_authenticated();

        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Failed to clear stored token");
        }
        *session = Session::unauthenticated();
        drop(session);

        if was_signed_in {
            tracing::warn!(operation, "Session invalidated, redirecting to login");
            // No subscribers is fine
            let _ = self.redirects.send(Route::Login);
        }
    }

    fn set_session(&self, next: Session) -> Session {
        let mut session = self.lock_session();
        *session = next.clone();
        next
    }

    fn lock_session(&self) -> RwLockWriteGuard<'_, Session> {
        match self.session.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<()> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ClientError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

/// On the unauthenticated endpoints a 401/404 means the credentials were
/// rejected, not that a session expired.
fn rejection_to_auth(err: ClientError) -> ClientError {
    match err {
        ClientError::Unauthorized(msg) | ClientError::NotFound(msg) => ClientError::Auth(msg),
        ClientError::Remote { status, message } if (400..500).contains(&status) => {
            ClientError::Auth(message)
        }
        other => other,
    }
}
