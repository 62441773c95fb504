// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod user;
pub mod workout;

pub use user::{Credentials, Identity, ProfileUser, Session};
pub use workout::{Workout, WorkoutActions, WorkoutStatus};
