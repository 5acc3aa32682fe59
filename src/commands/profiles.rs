// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::AppError;
use crate::models::Profile;
use crate::session::{self, Session};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let session = session::require(conn, "view your profile")?;
            let p = get(conn, &session)?;
            println!(
                "{}",
                pretty_table(&["Email", "Username"], vec![vec![p.email, p.username]])
            );
        }
        Some(("rename", sub)) => {
            let session = session::require(conn, "update your profile")?;
            let username = sub.get_one::<String>("username").unwrap();
            rename(conn, &session, username)?;
            println!("Username updated to '{}'", username.trim());
        }
        _ => {}
    }
    Ok(())
}

pub(crate) fn find_or_create(
    conn: &Connection,
    email: &str,
    username: &str,
) -> Result<Profile, AppError> {
    let existing = conn
        .query_row(
            "SELECT id, email, username FROM profiles WHERE email=?1",
            params![email],
            row_to_profile,
        )
        .optional()?;
    if let Some(p) = existing {
        return Ok(p);
    }
    conn.execute(
        "INSERT INTO profiles(email, username) VALUES (?1, ?2)",
        params![email, username],
    )
    .map_err(AppError::on_unique("Profile"))?;
    tracing::info!("created profile for {}", email);
    Ok(Profile {
        id: conn.last_insert_rowid(),
        email: email.to_string(),
        username: username.to_string(),
    })
}

pub fn get(conn: &Connection, session: &Session) -> Result<Profile, AppError> {
    conn.query_row(
        "SELECT id, email, username FROM profiles WHERE id=?1",
        params![session.owner_id()],
        row_to_profile,
    )
    .optional()?
    .ok_or(AppError::NotFound("Profile"))
}

pub fn rename(conn: &Connection, session: &Session, username: &str) -> Result<(), AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    conn.execute(
        "UPDATE profiles SET username=?1 WHERE id=?2",
        params![username, session.owner_id()],
    )?;
    tracing::info!("profile {} renamed to {}", session.owner_id(), username);
    Ok(())
}

fn row_to_profile(r: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: r.get(0)?,
        email: r.get(1)?,
        username: r.get(2)?,
    })
}
