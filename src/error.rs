// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types shared by the codec, the stores and the command handlers.

use thiserror::Error;

/// Extended SQLite result code for a failed UNIQUE constraint.
const SQLITE_CONSTRAINT_UNIQUE: std::os::raw::c_int = 2067;

/// Failures raised while reading or writing CSV text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    /// Fewer than two non-blank lines: nothing past the header.
    #[error("CSV file is empty or invalid")]
    EmptyInput,

    /// A data row had fewer than three fields or no category.
    #[error("Invalid CSV format at line {line}")]
    MalformedRow { line: usize },

    #[error("Invalid amount at line {line}")]
    InvalidAmount { line: usize },

    #[error("Invalid date format at line {line}. Expected YYYY-MM-DD")]
    InvalidDate { line: usize },

    #[error("Please upload a CSV file")]
    NotCsv,

    /// The file name says neither "income" nor "expense".
    #[error("CSV filename must contain \"income\" or \"expense\"")]
    AmbiguousType,

    #[error("No {0} to export")]
    NothingToExport(String),
}

/// The errors a user action can end with.
///
/// Every variant is reported once to the user; nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or a value is badly formatted.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule was violated. Holds the entity name.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// No active session. Holds the action that was attempted.
    #[error("You must be logged in to {0}")]
    AuthRequired(&'static str),

    /// The CSV was structurally invalid or its type could not be determined.
    #[error("{0}")]
    ImportFormat(CsvError),

    #[error("{0}")]
    NothingToExport(String),

    /// The row does not exist or belongs to another owner.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Backend(rusqlite::Error),
}

impl From<CsvError> for AppError {
    fn from(value: CsvError) -> Self {
        match value {
            CsvError::InvalidAmount { .. } | CsvError::InvalidDate { .. } => {
                AppError::Validation(value.to_string())
            }
            CsvError::NothingToExport(_) => AppError::NothingToExport(value.to_string()),
            other => AppError::ImportFormat(other),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        AppError::Backend(value)
    }
}

impl AppError {
    /// Builds a `map_err` adapter that turns UNIQUE violations into
    /// [`AppError::Duplicate`] for `entity` and everything else into
    /// [`AppError::Backend`].
    pub fn on_unique(entity: &'static str) -> impl FnOnce(rusqlite::Error) -> AppError {
        move |err| {
            if is_unique_violation(&err) {
                tracing::debug!("{} name collided: {}", entity, err);
                AppError::Duplicate(entity)
            } else {
                AppError::from(err)
            }
        }
    }
}

pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(sql_error, _)
            if sql_error.extended_code == SQLITE_CONSTRAINT_UNIQUE
    )
}
