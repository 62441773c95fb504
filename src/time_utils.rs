// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

/// Format a workout's creation date like "Mon, Jan 5, 2026" in `tz`,
/// or "-" when the service did not record one.
pub fn format_date_added<Tz>(date: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match date {
        Some(date) => date.with_timezone(tz).format("%a, %b %-d, %Y").to_string(),
        None => "-".to_string(),
    }
}
