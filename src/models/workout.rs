// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout model and request/response bodies for the workouts API.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Completion status of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    #[default]
    #[serde(alias = "Pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "Completed", alias = "COMPLETED")]
    Completed,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Pending => "pending",
            WorkoutStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A workout record as held in the local snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Server-assigned ID, immutable once created
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Duration in minutes
    #[serde(rename = "duration", deserialize_with = "deserialize_duration")]
    pub duration_minutes: u32,
    pub status: WorkoutStatus,
    /// When the server recorded the workout
    #[serde(rename = "dateAdded", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Workout {
    pub fn is_completed(&self) -> bool {
        self.status == WorkoutStatus::Completed
    }

    /// Which actions the caller layer should offer for this workout.
    pub fn actions(&self) -> WorkoutActions {
        WorkoutActions {
            complete: !self.is_completed(),
            edit: true,
            delete: true,
        }
    }
}

/// Enabled/disabled state of the per-workout actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutActions {
    pub complete: bool,
    pub edit: bool,
    pub delete: bool,
}

/// The service stores whatever the form submitted, so durations show up as
/// JSON numbers or numeric strings, sometimes fractional. Fractions are
/// rounded to the nearest minute.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Integer(u64),
        Float(f64),
        Text(String),
    }

    match RawDuration::deserialize(deserializer)? {
        RawDuration::Integer(n) => u32::try_from(n).map_err(de::Error::custom),
        RawDuration::Float(f) => round_minutes(f)
            .ok_or_else(|| de::Error::custom(format!("invalid duration: {}", f))),
        RawDuration::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u32>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(round_minutes))
                .ok_or_else(|| de::Error::custom(format!("invalid duration: {:?}", s)))
        }
    }
}

fn round_minutes(value: f64) -> Option<u32> {
    let rounded = value.round();
    if rounded.is_finite() && (0.0..=u32::MAX as f64).contains(&rounded) {
        Some(rounded as u32)
    } else {
        None
    }
}

/// Parse each record on its own so one bad record does not hide the rest.
fn deserialize_workout_list<'de, D>(deserializer: D) -> Result<Vec<Workout>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Workout>(value) {
            Ok(workout) => Some(workout),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable workout record");
                None
            }
        })
        .collect())
}

// ─── Request Bodies ──────────────────────────────────────────

/// `POST /workouts/addWorkout` body.
#[derive(Debug, Clone, Serialize)]
pub struct NewWorkout {
    pub name: String,
    pub duration: u32,
    pub status: WorkoutStatus,
}

/// `PATCH /workouts/updateWorkout/{id}` body. Status is not editable here.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutUpdate {
    pub name: String,
    pub duration: u32,
}

// ─── Response Bodies ─────────────────────────────────────────

/// `GET /workouts/getMyWorkouts` body.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutsResponse {
    #[serde(deserialize_with = "deserialize_workout_list")]
    pub workouts: Vec<Workout>,
}

/// Body of add/complete/update/delete responses.
///
/// Only used for logging; the store reloads the collection instead of
/// trusting the returned record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub workout: Option<WorkoutRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutRef {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}
