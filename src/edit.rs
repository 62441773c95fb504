// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-workout edit session.
//!
//! ```text
//! Closed ──open(w)──▶ Open(draft) ──set_name/set_duration──▶ Open(draft')
//!   ▲                    │  │
//!   └──────cancel────────┘  └──save──▶ applied: Closed / rejected: Open(draft) unchanged
//! ```
//!
//! The draft is a copy; the snapshot's workout is never touched until the
//! store reloads after a successful save.

use crate::error::{ClientError, Result};
use crate::models::Workout;
use crate::services::WorkoutStore;

/// Staged, uncommitted edits to one workout.
///
/// Duration is kept as entered so a half-typed value can sit in the draft;
/// it is only parsed on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: String,
    pub name: String,
    pub duration: String,
}

impl EditDraft {
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            id: workout.id.clone(),
            name: workout.name.clone(),
            duration: workout.duration_minutes.to_string(),
        }
    }

    /// Parse the entered duration as positive whole minutes.
    pub fn duration_minutes(&self) -> Result<u32> {
        match self.duration.trim().parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(minutes),
            _ => Err(ClientError::Validation(format!(
                "Duration must be a positive number of minutes, got {:?}",
                self.duration
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Closed,
    Open(EditDraft),
}

/// At most one draft in flight at a time.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditState::Open(_))
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match &self.state {
            EditState::Open(draft) => Some(draft),
            EditState::Closed => None,
        }
    }

    /// Start editing `workout`. An already open draft is replaced.
    pub fn open(&mut self, workout: &Workout) {
        if let EditState::Open(prev) = &self.state {
            tracing::debug!(
                previous = %prev.id,
                workout_id = %workout.id,
                "Replacing open edit draft"
            );
        }
        self.state = EditState::Open(EditDraft::from_workout(workout));
    }

    /// Returns false if no draft is open.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        match &mut self.state {
            EditState::Open(draft) => {
                draft.name = name.into();
                true
            }
            EditState::Closed => false,
        }
    }

    /// Returns false if no draft is open.
    pub fn set_duration(&mut self, duration: impl Into<String>) -> bool {
        match &mut self.state {
            EditState::Open(draft) => {
                draft.duration = duration.into();
                true
            }
            EditState::Closed => false,
        }
    }

    /// Discard the draft without contacting the service.
    pub fn cancel(&mut self) {
        self.state = EditState::Closed;
    }

    /// Commit the draft through the store.
    ///
    /// The draft closes as soon as the service accepts the update. A failure
    /// to reload afterwards is still returned, with the draft already closed,
    /// so check [`is_open`](Self::is_open) to tell the two apart. On any
    /// earlier failure the draft stays open and intact for a retry.
    pub async fn save(&mut self, store: &WorkoutStore) -> Result<()> {
        let draft = match &self.state {
            EditState::Open(draft) => draft,
            EditState::Closed => {
                return Err(ClientError::Validation(
                    "No workout is being edited".to_string(),
                ))
            }
        };

        let minutes = draft.duration_minutes()?;
        store.submit_update(&draft.id, &draft.name, minutes).await?;

        self.state = EditState::Closed;
        store.load_all().await?;
        Ok(())
    }
}
