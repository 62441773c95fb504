// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command handlers.
//!
//! Each handler returns the text to show on success. This is the layer that
//! decides which actions are available for a workout, e.g. completing an
//! already completed workout is refused here and never reaches the store.

use super::Commands;
use crate::edit::EditSession;
use crate::error::{ClientError, Result};
use crate::models::{Credentials, Workout};
use crate::time_utils::format_date_added;
use crate::view::{Page, StatusFilter, WorkoutView};
use crate::AppContext;
use chrono::Local;
use std::fmt::Write;

/// Dispatch a parsed command.
pub async fn execute(ctx: &AppContext, command: Commands) -> Result<String> {
    match command {
        Commands::Register { email, password } => {
            register(ctx, &Credentials::new(email, password)).await
        }
        Commands::Login { email, password } => login(ctx, &Credentials::new(email, password)).await,
        Commands::Logout => Ok(logout(ctx)),
        Commands::Whoami => Ok(whoami(ctx)),
        Commands::List {
            search,
            status,
            page,
        } => list(ctx, &search, status, page).await,
        Commands::Add { name, duration } => add(ctx, &name, duration).await,
        Commands::Edit { id, name, duration } => edit(ctx, &id, name, duration).await,
        Commands::Delete { id } => delete(ctx, &id).await,
        Commands::Complete { id } => complete(ctx, &id).await,
    }
}

pub async fn register(ctx: &AppContext, credentials: &Credentials) -> Result<String> {
    let message = ctx.session.register(credentials).await?;
    Ok(format!("{} You can now log in.", message))
}

pub async fn login(ctx: &AppContext, credentials: &Credentials) -> Result<String> {
    ctx.session.login(credentials).await?;
    Ok("Logged in successfully!".to_string())
}

pub fn logout(ctx: &AppContext) -> String {
    ctx.session.logout();
    ctx.workouts.clear();
    "Logged out.".to_string()
}

pub fn whoami(ctx: &AppContext) -> String {
    let session = ctx.session.current();
    match session.user_id() {
        Some(id) => {
            let role = if session.identity().is_admin == Some(true) {
                " (admin)"
            } else {
                ""
            };
            format!("Logged in as {}{}", id, role)
        }
        None => "Not logged in.".to_string(),
    }
}

pub async fn list(
    ctx: &AppContext,
    search: &str,
    status: StatusFilter,
    page: usize,
) -> Result<String> {
    let snapshot = ctx.workouts.load_all().await?;

    let mut view = WorkoutView::new(snapshot);
    view.set_status_filter(status);
    view.set_search_text(search);
    view.set_page(page);

    Ok(render_page(&view.page()))
}

pub async fn add(ctx: &AppContext, name: &str, duration_minutes: u32) -> Result<String> {
    ctx.workouts.add(name, duration_minutes).await?;
    Ok("Workout added!".to_string())
}

pub async fn delete(ctx: &AppContext, workout_id: &str) -> Result<String> {
    ctx.workouts.remove(workout_id).await?;
    Ok("Workout deleted!".to_string())
}

/// Mark a workout completed, unless it already is.
pub async fn complete(ctx: &AppContext, workout_id: &str) -> Result<String> {
    let workout = find_workout(ctx, workout_id).await?;

    if !workout.actions().complete {
        return Ok(format!("'{}' is already completed.", workout.name));
    }

    ctx.workouts.complete(workout_id).await?;
    Ok("Workout marked as completed!".to_string())
}

/// Open an edit session on the workout, apply the given fields and save.
pub async fn edit(
    ctx: &AppContext,
    workout_id: &str,
    name: Option<String>,
    duration: Option<String>,
) -> Result<String> {
    if name.is_none() && duration.is_none() {
        return Err(ClientError::Validation(
            "Nothing to change: pass --name and/or --duration".to_string(),
        ));
    }

    let workout = find_workout(ctx, workout_id).await?;

    let mut session = EditSession::new();
    session.open(&workout);
    if let Some(name) = name {
        session.set_name(name);
    }
    if let Some(duration) = duration {
        session.set_duration(duration);
    }

    match session.save(&ctx.workouts).await {
        Ok(()) => Ok("Workout updated!".to_string()),
        // Applied, only the refresh failed
        Err(e) if !session.is_open() => Ok(format!(
            "Workout updated, but the list could not be refreshed: {}",
            e.user_message()
        )),
        Err(e) => Err(e),
    }
}

/// Refresh the snapshot and pick out one workout.
async fn find_workout(ctx: &AppContext, workout_id: &str) -> Result<Workout> {
    let snapshot = ctx.workouts.load_all().await?;
    snapshot
        .iter()
        .find(|w| w.id == workout_id)
        .cloned()
        .ok_or_else(|| ClientError::NotFound(format!("Workout {} not found", workout_id)))
}

/// Plain-text rendering of one page of workouts.
pub fn render_page(page: &Page<'_>) -> String {
    if page.is_empty() {
        return "No workouts found.".to_string();
    }

    let mut out = String::new();
    for workout in &page.items {
        let _ = writeln!(
            out,
            "[{:<9}] {} - {} mins - added {}  (id: {})",
            workout.status,
            workout.name,
            workout.duration_minutes,
            format_date_added(workout.created_at, &Local),
            workout.id
        );
    }

    if page.total_pages > 1 {
        let _ = write!(
            out,
            "Page {} of {} ({} workouts)",
            page.page_number, page.total_pages, page.total_items
        );
    } else {
        let _ = write!(out, "{} workouts", page.total_items);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutStatus;

    fn workout(id: &str, status: WorkoutStatus) -> Workout {
        Workout {
            id: id.to_string(),
            name: format!("Workout {}", id),
            duration_minutes: 20,
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_render_empty_page() {
        let page = Page {
            items: vec![],
            page_number: 4,
            total_pages: 3,
            total_items: 13,
        };
        assert_eq!(render_page(&page), "No workouts found.");
    }

    #[test]
    fn test_render_page_lists_items() {
        let a = workout("a", WorkoutStatus::Pending);
        let b = workout("b", WorkoutStatus::Completed);
        let page = Page {
            items: vec![&a, &b],
            page_number: 1,
            total_pages: 1,
            total_items: 2,
        };

        let out = render_page(&page);
        assert!(out.contains("[pending  ] Workout a - 20 mins - added -  (id: a)"));
        assert!(out.contains("[completed] Workout b"));
        assert!(out.ends_with("2 workouts"));
    }

    #[test]
    fn test_render_page_footer_with_multiple_pages() {
        let a = workout("a", WorkoutStatus::Pending);
        let page = Page {
            items: vec![&a],
            page_number: 3,
            total_pages: 3,
            total_items: 13,
        };
        assert!(render_page(&page).ends_with("Page 3 of 3 (13 workouts)"));
    }
}
