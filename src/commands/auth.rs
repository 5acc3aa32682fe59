// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::dashboards;
use crate::session;
use anyhow::Result;
use rusqlite::Connection;

pub fn login(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap();
    let s = session::sign_in(conn, email)?;
    let d = dashboards::current(conn, &s)?;
    println!("Logged in as {} (dashboard '{}')", s.email(), d.name);
    Ok(())
}

pub fn logout(conn: &Connection) -> Result<()> {
    session::sign_out(conn)?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(conn: &Connection) -> Result<()> {
    match session::current(conn)? {
        Some(s) => {
            let d = dashboards::current(conn, &s)?;
            println!("{} (dashboard '{}')", s.email(), d.name);
        }
        None => println!("Not logged in; run `daybook login --email <EMAIL>`"),
    }
    Ok(())
}
