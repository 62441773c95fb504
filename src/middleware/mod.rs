// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation guards.

pub mod auth;

pub use auth::{guard, home_route, Route, RouteDecision};
