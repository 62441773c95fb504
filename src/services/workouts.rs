// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout collection store.
//!
//! Holds the local snapshot of the signed-in user's workouts and keeps it in
//! line with the service using an invalidate-and-reload protocol:
//! 1. Submit the mutation
//! 2. On success, fetch the full collection again
//! 3. Replace the snapshot wholesale with whatever that fetch returned
//!
//! The snapshot is never patched locally. When loads overlap, the one that
//! completes last wins.

use crate::error::{ClientError, Result};
use crate::models::workout::WorkoutUpdate;
use crate::models::Workout;
use crate::services::SessionManager;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Authoritative-by-reload copy of the user's workouts.
pub struct WorkoutStore {
    session: Arc<SessionManager>,
    snapshot: RwLock<Arc<Vec<Workout>>>,
    loads_in_flight: AtomicUsize,
}

impl WorkoutStore {
    /// Create a store with an empty snapshot.
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            snapshot: RwLock::new(Arc::new(Vec::new())),
            loads_in_flight: AtomicUsize::new(0),
        }
    }

    /// Current snapshot, in the order the service returned it.
    pub fn snapshot(&self) -> Arc<Vec<Workout>> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Look up a workout in the current snapshot.
    pub fn get(&self, workout_id: &str) -> Option<Workout> {
        self.snapshot().iter().find(|w| w.id == workout_id).cloned()
    }

    /// Whether a collection fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loads_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Drop the local snapshot, e.g. after the session ends.
    pub fn clear(&self) {
        self.replace_snapshot(Vec::new());
    }

    // ─── Operations ──────────────────────────────────────────────

    /// Fetch the full collection and replace the snapshot.
    pub async fn load_all(&self) -> Result<Arc<Vec<Workout>>> {
        let _loading = LoadGuard::new(&self.loads_in_flight);
        let api = self.session.api();

        let result = self
            .session
            .authorized("load_workouts", |token| async move {
                api.get_my_workouts(&token).await
            })
            .await;

        match result {
            Ok(workouts) => {
                tracing::debug!(count = workouts.len(), "Workout snapshot replaced");
                Ok(self.replace_snapshot(workouts))
            }
            Err(e) => {
                if e.is_session_error() {
                    self.clear();
                }
                tracing::warn!(error = %e, "Failed to load workouts");
                Err(e)
            }
        }
    }

    /// Add a workout. It is created pending.
    pub async fn add(&self, name: &str, duration_minutes: u32) -> Result<Arc<Vec<Workout>>> {
        let name = validate_fields(name, duration_minutes)?;
        let api = self.session.api();

        let response = self
            .mutate("add_workout", |token| async move {
                api.add_workout(&token, &name, duration_minutes).await
            })
            .await?;

        tracing::info!(
            workout_id = ?response.workout.and_then(|w| w.id),
            "Workout added"
        );
        self.reload_after("add_workout").await
    }

    /// Delete a workout by ID.
    pub async fn remove(&self, workout_id: &str) -> Result<Arc<Vec<Workout>>> {
        let api = self.session.api();

        self.mutate("delete_workout", |token| async move {
            api.delete_workout(&token, workout_id).await
        })
        .await?;

        tracing::info!(workout_id, "Workout deleted");
        self.reload_after("delete_workout").await
    }

    /// Mark a workout completed.
    ///
    /// Not re-checked against the snapshot: callers disable the action for
    /// workouts that are already completed, and if it is sent anyway the
    /// service's answer stands.
    pub async fn complete(&self, workout_id: &str) -> Result<Arc<Vec<Workout>>> {
        let api = self.session.api();

        self.mutate("complete_workout", |token| async move {
            api.complete_workout(&token, workout_id).await
        })
        .await?;

        tracing::info!(workout_id, "Workout marked completed");
        self.reload_after("complete_workout").await
    }

    /// Change a workout's name and duration. Status is untouched.
    pub async fn update(
        &self,
        workout_id: &str,
        name: &str,
        duration_minutes: u32,
    ) -> Result<Arc<Vec<Workout>>> {
        self.submit_update(workout_id, name, duration_minutes).await?;
        self.reload_after("update_workout").await
    }

    /// First half of [`update`](Self::update): send the change but do not
    /// reload. `Ok` means the service applied it, whatever a later
    /// [`load_all`](Self::load_all) returns.
    pub async fn submit_update(
        &self,
        workout_id: &str,
        name: &str,
        duration_minutes: u32,
    ) -> Result<()> {
        let update = WorkoutUpdate {
            name: validate_fields(name, duration_minutes)?,
            duration: duration_minutes,
        };
        let api = self.session.api();

        self.mutate("update_workout", |token| async move {
            api.update_workout(&token, workout_id, &update).await
        })
        .await?;

        tracing::info!(workout_id, "Workout updated");
        Ok(())
    }

    // ─── Helpers ─────────────────────────────────────────────────

    /// Submit a mutation. Failure leaves the snapshot as it was, except that
    /// a dead session also drops the snapshot.
    async fn mutate<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        self.session
            .authorized(operation, call)
            .await
            .inspect_err(|e| {
                if e.is_session_error() {
                    self.clear();
                }
                tracing::warn!(operation, error = %e, "Workout mutation failed");
            })
    }

    /// Second half of every mutation: invalidate the snapshot and reload.
    async fn reload_after(&self, operation: &'static str) -> Result<Arc<Vec<Workout>>> {
        self.load_all().await.inspect_err(|e| {
            tracing::warn!(
                operation,
                error = %e,
                "Mutation applied but reload failed; snapshot is stale"
            );
        })
    }

    fn replace_snapshot(&self, workouts: Vec<Workout>) -> Arc<Vec<Workout>> {
        let next = Arc::new(workouts);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = Arc::clone(&next),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&next),
        }
        next
    }
}

/// Check add/update input; returns the trimmed name.
fn validate_fields(name: &str, duration_minutes: u32) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation("Workout name is required".to_string()));
    }
    if duration_minutes == 0 {
        return Err(ClientError::Validation(
            "Duration must be a positive number of minutes".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Counts an outstanding load; decrements on drop so a cancelled future
/// does not leave the store looking busy.
struct LoadGuard<'a>(&'a AtomicUsize);

impl<'a> LoadGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
