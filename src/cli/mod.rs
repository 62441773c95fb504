// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command line front end.

pub mod commands;

use crate::config::Config;
use crate::middleware::{guard, Route, RouteDecision};
use crate::view::StatusFilter;
use crate::AppContext;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::broadcast::error::TryRecvError;

/// Track your workouts against a Tracked service.
#[derive(Debug, Parser)]
#[command(name = "tracked", version = env!("CARGO_PKG_VERSION"), long_about = None)]
pub struct Cli {
    /// Base URL of the workout service (overrides TRACKED_API_URL)
    #[arg(global = true, long = "api-url")]
    pub api_url: Option<String>,

    /// Directory holding the session token (overrides TRACKED_STATE_DIR)
    #[arg(global = true, long = "state-dir")]
    pub state_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(global = true, short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List workouts
    List {
        /// Only show workouts whose name contains this text
        #[arg(long, default_value = "")]
        search: String,

        /// all, pending or completed
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// Page to show (6 workouts per page)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Add a workout
    Add {
        #[arg(long)]
        name: String,

        /// Duration in minutes
        #[arg(long)]
        duration: u32,
    },

    /// Change a workout's name or duration
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Duration in minutes
        #[arg(long)]
        duration: Option<String>,
    },

    /// Delete a workout
    Delete { id: String },

    /// Mark a workout completed
    Complete { id: String },
}

impl Commands {
    /// View the command belongs to, for the route guard. `None` for commands
    /// that work in any session state.
    fn route(&self) -> Option<Route> {
        match self {
            Commands::Register { .. } => Some(Route::Register),
            Commands::Login { .. } => Some(Route::Login),
            Commands::Logout | Commands::Whoami => None,
            _ => Some(Route::Workouts),
        }
    }
}

/// Restore the session, apply the route guard and run the command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env_with_overrides(cli.api_url, cli.state_dir)?;
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let ctx = AppContext::with_file_store(config)?;
    let mut redirects = ctx.session.subscribe();

    let session = ctx.session.restore().await;

    if let Some(route) = cli.command.route() {
        match guard(route, &session) {
            RouteDecision::Allow => {}
            RouteDecision::Redirect(Route::Login) => {
                anyhow::bail!(
                    "Please log in first: tracked login --email <EMAIL> --password <PASSWORD>"
                );
            }
            RouteDecision::Redirect(_) => {
                println!(
                    "Already logged in as {}. Run `tracked logout` to switch accounts.",
                    session.user_id().unwrap_or("unknown")
                );
                return Ok(());
            }
        }
    }

    let result = commands::execute(&ctx, cli.command).await;

    match redirects.try_recv() {
        Ok(Route::Login) | Err(TryRecvError::Lagged(_)) => {
            eprintln!("Your session has expired. Please log in again.");
        }
        _ => {}
    }

    let output = result.map_err(|e| {
        tracing::debug!(error = %e, "Command failed");
        anyhow::anyhow!(e.user_message())
    })?;
    println!("{}", output);
    Ok(())
}
