// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The signed-in identity and the per-command application state.
//!
//! A [`Session`] can only be obtained through [`sign_in`], [`current`] or
//! [`require`], so any operation taking `&Session` cannot start for a
//! signed-out user.

use crate::commands::{dashboards, profiles};
use crate::db::{self, CURRENT_DASHBOARD_KEY, SESSION_OWNER_KEY};
use crate::error::AppError;
use crate::models::Dashboard;
use rusqlite::{Connection, OptionalExtension, params};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner_id: i64,
    email: String,
}

impl Session {
    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Everything a dashboard-scoped command needs, resolved once.
#[derive(Debug, Clone)]
pub struct AppState {
    pub session: Session,
    pub dashboard: Dashboard,
}

/// Signs in as `email`, creating the profile and default dashboard on first use.
pub fn sign_in(conn: &Connection, email: &str) -> Result<Session, AppError> {
    let email = email.trim();
    let username = match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => local,
        _ => {
            return Err(AppError::Validation(format!(
                "Invalid email address '{}'",
                email
            )));
        }
    };

    let profile = profiles::find_or_create(conn, email, username)?;
    db::set_setting(conn, SESSION_OWNER_KEY, &profile.id.to_string())?;
    let session = Session {
        owner_id: profile.id,
        email: profile.email,
    };
    dashboards::ensure_default(conn, &session)?;
    tracing::info!("signed in as {}", session.email);
    Ok(session)
}

pub fn sign_out(conn: &Connection) -> Result<(), AppError> {
    db::clear_setting(conn, SESSION_OWNER_KEY)?;
    db::clear_setting(conn, CURRENT_DASHBOARD_KEY)?;
    tracing::info!("signed out");
    Ok(())
}

/// The stored session, if it still points at an existing profile.
pub fn current(conn: &Connection) -> Result<Option<Session>, AppError> {
    let Some(raw) = db::get_setting(conn, SESSION_OWNER_KEY)? else {
        return Ok(None);
    };
    let Ok(owner_id) = raw.parse::<i64>() else {
        tracing::debug!("ignoring malformed session owner '{}'", raw);
        return Ok(None);
    };
    let email: Option<String> = conn
        .query_row(
            "SELECT email FROM profiles WHERE id=?1",
            params![owner_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(email.map(|email| Session { owner_id, email }))
}

/// Like [`current`] but fails with [`AppError::AuthRequired`] naming `action`.
pub fn require(conn: &Connection, action: &'static str) -> Result<Session, AppError> {
    current(conn)?.ok_or(AppError::AuthRequired(action))
}

/// Resolves the session and the selected dashboard for one command.
pub fn app_state(conn: &Connection, action: &'static str) -> Result<AppState, AppError> {
    let session = require(conn, action)?;
    let dashboard = dashboards::current(conn, &session)?;
    Ok(AppState { session, dashboard })
}
