// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived view of the workout snapshot: status filter, search, pagination.
//!
//! Everything here is synchronous and never touches the network. The snapshot
//! itself is never modified; the view only holds indices into it.

use crate::models::{Workout, WorkoutStatus};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Workouts shown per page.
pub const PAGE_SIZE: usize = 6;

/// Status tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, status: WorkoutStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == WorkoutStatus::Pending,
            StatusFilter::Completed => status == WorkoutStatus::Completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        })
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "unknown status filter '{}' (expected all, pending or completed)",
                other
            )),
        }
    }
}

// ─── Pure Functions ──────────────────────────────────────────

/// Keep workouts matching `status`, then those whose name contains `search`
/// case-insensitively. Relative order is preserved.
pub fn filter_workouts<'a>(
    workouts: &'a [Workout],
    status: StatusFilter,
    search: &str,
) -> Vec<&'a Workout> {
    let needle = search.to_lowercase();
    workouts
        .iter()
        .filter(|w| is_visible(w, status, &needle))
        .collect()
}

/// `needle` must already be lowercased.
fn is_visible(workout: &Workout, status: StatusFilter, needle: &str) -> bool {
    status.matches(workout.status)
        && (needle.is_empty() || workout.name.to_lowercase().contains(needle))
}

/// Number of pages needed for `count` items.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Items on 1-indexed page `page_number`. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

// ─── Selection State ─────────────────────────────────────────

/// Ephemeral search/filter/page state. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSelection {
    search_text: String,
    status_filter: StatusFilter,
    page_number: usize,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status_filter: StatusFilter::All,
            page_number: 1,
        }
    }
}

impl ViewSelection {
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub items: Vec<&'a Workout>,
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Page<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Selection plus the filtered result it implies.
///
/// The filtered list is recomputed when the snapshot, search text or status
/// filter changes, and each of those resets the page to 1. Moving between
/// pages only re-slices.
#[derive(Debug, Clone)]
pub struct WorkoutView {
    snapshot: Arc<Vec<Workout>>,
    selection: ViewSelection,
    filtered: Vec<usize>,
}

impl Default for WorkoutView {
    fn default() -> Self {
        Self::new(Arc::new(Vec::new()))
    }
}

impl WorkoutView {
    pub fn new(snapshot: Arc<Vec<Workout>>) -> Self {
        let mut view = Self {
            snapshot,
            selection: ViewSelection::default(),
            filtered: Vec::new(),
        };
        view.refilter();
        view
    }

    pub fn selection(&self) -> &ViewSelection {
        &self.selection
    }

    /// Swap in a freshly loaded snapshot.
    pub fn set_snapshot(&mut self, snapshot: Arc<Vec<Workout>>) {
        self.snapshot = snapshot;
        self.refilter();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.selection.search_text = text.into();
        self.refilter();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.selection.status_filter = filter;
        self.refilter();
    }

    /// Jump to a page. Page 0 is treated as page 1.
    pub fn set_page(&mut self, page_number: usize) {
        self.selection.page_number = page_number.max(1);
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), PAGE_SIZE)
    }

    /// The currently selected page.
    pub fn page(&self) -> Page<'_> {
        let indices = page_slice(&self.filtered, self.selection.page_number, PAGE_SIZE);
        Page {
            items: indices.iter().map(|&i| &self.snapshot[i]).collect(),
            page_number: self.selection.page_number,
            total_pages: self.total_pages(),
            total_items: self.filtered.len(),
        }
    }

    fn refilter(&mut self) {
        let needle = self.selection.search_text.to_lowercase();
        let status = self.selection.status_filter;

        self.filtered = self
            .snapshot
            .iter()
            .enumerate()
            .filter(|(_, w)| is_visible(w, status, &needle))
            .map(|(i, _)| i)
            .collect();
        self.selection.page_number = 1;
    }
}
