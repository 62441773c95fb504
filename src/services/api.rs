// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout service API client.
//!
//! Handles:
//! - Register, login and profile lookup
//! - Workout list/add/delete/complete/update
//! - Mapping HTTP failures onto [`ClientError`]
//!
//! This client never touches session state. Authenticated calls take the
//! bearer token as an argument; the session manager decides what a 401 means.

use crate::error::{ClientError, Result};
use crate::models::user::{LoginResponse, MessageResponse, ProfileResponse, ProfileUser};
use crate::models::workout::{
    MutationResponse, NewWorkout, Workout, WorkoutStatus, WorkoutUpdate, WorkoutsResponse,
};
use crate::models::Credentials;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Workout service API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Register a new account. Returns the server's confirmation message.
    pub async fn register(&self, credentials: &Credentials) -> Result<String> {
        let url = format!("{}/users/register", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(network_error)?;

        let body: MessageResponse = check_response_json(response, "Registration failed").await?;
        Ok(body
            .message
            .unwrap_or_else(|| "Registered successfully!".to_string()))
    }

    /// Exchange credentials for an access token.
    pub async fn login(&self, credentials: &Credentials) -> Result<String> {
        let url = format!("{}/users/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(network_error)?;

        let body: LoginResponse = check_response_json(response, "Login failed").await?;
        if body.access.trim().is_empty() {
            return Err(ClientError::MalformedResponse(
                "login response carried an empty token".to_string(),
            ));
        }
        Ok(body.access)
    }

    /// Look up the user the token belongs to.
    pub async fn profile(&self, access_token: &str) -> Result<ProfileUser> {
        let url = format!("{}/users/profile", self.base_url);
        let body: ProfileResponse = self
            .get_json(&url, access_token, "Failed to fetch user")
            .await?;
        Ok(body.user)
    }

    // ─── Workouts ────────────────────────────────────────────────

    /// Fetch the caller's full workout collection.
    pub async fn get_my_workouts(&self, access_token: &str) -> Result<Vec<Workout>> {
        let url = format!("{}/workouts/getMyWorkouts", self.base_url);
        let body: WorkoutsResponse = self
            .get_json(&url, access_token, "Failed to fetch workouts")
            .await?;
        Ok(body.workouts)
    }

    /// Create a workout. New workouts always start out pending.
    pub async fn add_workout(
        &self,
        access_token: &str,
        name: &str,
        duration_minutes: u32,
    ) -> Result<MutationResponse> {
        let url = format!("{}/workouts/addWorkout", self.base_url);
        let body = NewWorkout {
            name: name.to_string(),
            duration: duration_minutes,
            status: WorkoutStatus::Pending,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        check_response_json(response, "Failed to add workout").await
    }

    /// Delete a workout by ID.
    pub async fn delete_workout(
        &self,
        access_token: &str,
        workout_id: &str,
    ) -> Result<MutationResponse> {
        let url = format!(
            "{}/workouts/deleteWorkout/{}",
            self.base_url,
            urlencoding::encode(workout_id)
        );

        let response = self
            .http
            .delete(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        check_response_json(response, "Failed to delete workout").await
    }

    /// Mark a workout completed.
    pub async fn complete_workout(
        &self,
        access_token: &str,
        workout_id: &str,
    ) -> Result<MutationResponse> {
        let url = format!(
            "{}/workouts/completeWorkoutStatus/{}",
            self.base_url,
            urlencoding::encode(workout_id)
        );

        let response = self
            .http
            .patch(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        check_response_json(response, "Failed to complete workout").await
    }

    /// Update a workout's name and duration.
    pub async fn update_workout(
        &self,
        access_token: &str,
        workout_id: &str,
        update: &WorkoutUpdate,
    ) -> Result<MutationResponse> {
        let url = format!(
            "{}/workouts/updateWorkout/{}",
            self.base_url,
            urlencoding::encode(workout_id)
        );

        let response = self
            .http
            .patch(&url)
            .bearer_auth(access_token)
            .json(update)
            .send()
            .await
            .map_err(network_error)?;

        check_response_json(response, "Failed to update workout").await
    }

    /// Generic authenticated GET with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        fallback: &str,
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        check_response_json(response, fallback).await
    }
}

/// Error body shape used by the service: `{"message": ...}` or `{"error": ...}`.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn network_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Network(format!("Request timed out: {}", err))
    } else {
        ClientError::Network(err.to_string())
    }
}

/// Check response status and parse the JSON body.
///
/// The body is read as text first so an unparsable success body becomes
/// [`ClientError::MalformedResponse`] rather than a transport error.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T> {
    let status = response.status();
    let text = response.text().await.map_err(network_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message.or(b.error));

        if status.as_u16() == 401 {
            tracing::warn!(status = status.as_u16(), "Workout service rejected credentials");
        } else {
            tracing::debug!(status = status.as_u16(), message = ?message, "Workout service error");
        }

        return Err(ClientError::from_status(status.as_u16(), message, fallback));
    }

    serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}
