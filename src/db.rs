//! Optional, blocking database gateway.
//!
//! The gateway owns a single PostgreSQL connection driven by a private
//! current-thread runtime, so callers see plain synchronous calls. When the
//! Drupal settings cannot be found the gateway is built offline and every
//! caller is expected to check [`Database::is_offline`] before querying.

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, ConnectOptions, Postgres, Row};
use std::path::Path;
use tokio::runtime::Runtime;

use crate::error::{Error, Result};
use crate::settings::{read_settings, DbSettings};

/// One result row: column name to value, in select order.
pub type DbRow = IndexMap<String, Value>;

enum State {
    Offline,
    Connected {
        runtime: Runtime,
        connection: PgConnection,
    },
}

/// Handle to the Drupal/Chado database, or a marker that there is none.
pub struct Database {
    state: State,
}

impl Database {
    /// A gateway that never connects.
    pub fn offline() -> Self {
        Database { state: State::Offline }
    }

    /// Opens the database described by the settings of `drupal_root`.
    ///
    /// A missing root, missing settings or an unsupported driver yield an
    /// offline gateway. A failed connection with usable settings is an
    /// error.
    pub fn open(drupal_root: Option<&Path>) -> Result<Self> {
        let Some(root) = drupal_root else {
            debug!("No Drupal root found, database validation disabled");
            return Ok(Self::offline());
        };
        match read_settings(root) {
            Some(settings) => Self::connect(&settings),
            None => Ok(Self::offline()),
        }
    }

    /// Connects with explicit settings.
    pub fn connect(settings: &DbSettings) -> Result<Self> {
        if settings.driver != "pgsql" {
            warn!(
                "Unsupported database driver '{}', database validation disabled",
                settings.driver
            );
            return Ok(Self::offline());
        }
        if !settings.prefix.is_empty() {
            debug!("Drupal table prefix '{}' does not apply to Chado tables", settings.prefix);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::IoError)?;

        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.username)
            .password(&settings.password)
            .database(&settings.name);

        debug!(
            "Connecting to database '{}' on {}:{}",
            settings.name, settings.host, settings.port
        );
        let connection = runtime
            .block_on(options.connect())
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Database { state: State::Connected { runtime, connection } })
    }

    /// True if there is no database connection.
    pub fn is_offline(&self) -> bool {
        matches!(self.state, State::Offline)
    }

    /// Prepares a parameterised statement.
    pub fn query<'a>(&'a mut self, sql: &'a str, parameters: &'a [&'a str]) -> Query<'a> {
        Query { db: self, sql, parameters }
    }
}

/// A statement bound to its parameters, ready to run.
pub struct Query<'a> {
    db: &'a mut Database,
    sql: &'a str,
    parameters: &'a [&'a str],
}

impl Query<'_> {
    /// Executes the statement and returns every row.
    pub fn get(self) -> Result<Vec<DbRow>> {
        let Query { db, sql, parameters } = self;
        let State::Connected { runtime, connection } = &mut db.state else {
            return Err(query_error(sql, "database is offline"));
        };

        let mut statement = sqlx::query::<Postgres>(sql);
        for parameter in parameters {
            statement = statement.bind(*parameter);
        }

        debug!("Executing: {}", compact(sql));
        let rows = runtime
            .block_on(statement.fetch_all(connection))
            .map_err(|e| query_error(sql, e))?;

        Ok(rows.iter().map(decode_row).collect())
    }

    /// Executes a `COUNT(*) AS count` statement and returns the count.
    pub fn count(self) -> Result<i64> {
        let sql = self.sql;
        let rows = self.get()?;
        match rows.first().and_then(|row| row.get("count")) {
            Some(Value::Number(n)) => {
                n.as_i64().ok_or_else(|| query_error(sql, "count is not an integer"))
            }
            Some(Value::String(s)) => {
                s.trim().parse().map_err(|_| query_error(sql, "count is not an integer"))
            }
            _ => Err(query_error(sql, "no 'count' column in result")),
        }
    }
}

fn compact(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn query_error(sql: &str, detail: impl ToString) -> Error {
    Error::Query { sql: compact(sql), detail: detail.to_string() }
}

/// Converts a row into JSON values, trying the column types Chado uses.
fn decode_row(row: &PgRow) -> DbRow {
    row.columns()
        .iter()
        .map(|column| {
            let index = column.ordinal();
            let value = if let Ok(v) = row.try_get::<Option<String>, _>(index) {
                v.map(Value::String)
            } else if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
                v.map(Value::from)
            } else if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
                v.map(Value::from)
            } else if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
                v.map(Value::Bool)
            } else {
                None
            };
            (column.name().to_string(), value.unwrap_or(Value::Null))
        })
        .collect()
}
