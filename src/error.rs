//! Error handling for fieldgen.
//! Defines the error taxonomy and the result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Every failure that can end a generation run.
///
/// An offline database is deliberately absent: it is a degraded mode,
/// not an error.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid command-line values or an unusable answers file.
    #[error("Configuration error: {0}.")]
    Configuration(String),

    /// The database rejected a statement.
    #[error("Couldn't execute query '{sql}': {detail}.")]
    Query { sql: String, detail: String },

    /// The database settings were readable but no connection could be made.
    #[error("Database error: {0}.")]
    Database(String),

    /// The user declined to continue past a validation warning.
    #[error("Generation cancelled by user.")]
    UserCancelled,

    /// A generated directory could not be created.
    #[error(
        "Could not create directory '{path}'. It may already exist or you may not have permission to write there."
    )]
    OutputDirectory { path: String },

    /// A template document could not be loaded.
    #[error("Template error: {0}.")]
    Template(String),

    /// The terminal interaction failed or input ended early.
    #[error("Prompt error: {0}.")]
    Prompt(String),

    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

/// Prints the error as a single line to stderr and exits with status 1.
pub fn default_error_handler(err: Error) {
    eprintln!("{}", console::style(err).red());
    std::process::exit(1);
}
