// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route guard deciding which views a session may enter.

use crate::models::Session;
use std::fmt;

/// Views the client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Workouts,
}

impl Route {
    /// Whether the view needs an authenticated session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Workouts)
    }

    /// Login and register are pointless once signed in.
    pub fn is_guest_only(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Workouts => "/workouts",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether `session` may enter `route`.
///
/// Pure; callers must have resolved [`SessionManager::restore`] first.
///
/// [`SessionManager::restore`]: crate::services::SessionManager::restore
pub fn guard(route: Route, session: &Session) -> RouteDecision {
    if route.requires_auth() && !session.is_authenticated() {
        return RouteDecision::Redirect(Route::Login);
    }

    if route.is_guest_only() && session.is_authenticated() {
        return RouteDecision::Redirect(Route::Workouts);
    }

    RouteDecision::Allow
}

/// Landing view for the brand link: the dashboard when signed in,
/// registration otherwise.
pub fn home_route(session: &Session) -> Route {
    if session.is_authenticated() {
        Route::Workouts
    } else {
        Route::Register
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileUser;

    fn signed_in() -> Session {
        Session::authenticated(
            "token".to_string(),
            ProfileUser {
                id: "u1".to_string(),
                is_admin: false,
                email: None,
            },
        )
    }

    #[test]
    fn test_protected_route_redirects_guest_to_login() {
        let decision = guard(Route::Workouts, &Session::unauthenticated());
        assert_eq!(decision, RouteDecision::Redirect(Route::Login));
    }

    #[test]
    fn test_guest_routes_redirect_signed_in_user() {
        let session = signed_in();
        assert_eq!(
            guard(Route::Login, &session),
            RouteDecision::Redirect(Route::Workouts)
        );
        assert_eq!(
            guard(Route::Register, &session),
            RouteDecision::Redirect(Route::Workouts)
        );
    }

    #[test]
    fn test_allowed_routes() {
        assert_eq!(guard(Route::Workouts, &signed_in()), RouteDecision::Allow);
        assert_eq!(
            guard(Route::Login, &Session::unauthenticated()),
            RouteDecision::Allow
        );
        assert_eq!(
            guard(Route::Register, &Session::unauthenticated()),
            RouteDecision::Allow
        );
    }

    #[test]
    fn test_home_route() {
        assert_eq!(home_route(&signed_in()), Route::Workouts);
        assert_eq!(home_route(&Session::unauthenticated()), Route::Register);
    }
}
