// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote access and client state.

pub mod api;
pub mod session;
pub mod workouts;

pub use api::ApiClient;
pub use session::SessionManager;
pub use workouts::WorkoutStore;
