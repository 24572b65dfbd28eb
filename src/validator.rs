//! Reconciles the entered vocabulary values with the Chado database.
//!
//! The check runs as a small state machine:
//! `Start -> DbCheck -> CvCheck -> CvtermCheck -> XrefCheck -> Reconciled`.
//! Declining to continue past a missing entry aborts the run with
//! [`Error::UserCancelled`].

use log::debug;
use serde_json::Value;

use crate::constants::CHADO_SCHEMA;
use crate::db::{Database, DbRow};
use crate::error::{Error, Result};
use crate::field::FieldSpec;
use crate::prompt::{Prompter, Style};

/// Chado tables holding the entities that are checked by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Db,
    Cv,
    Cvterm,
}

impl Table {
    pub fn table_name(&self) -> &'static str {
        match self {
            Table::Db => "db",
            Table::Cv => "cv",
            Table::Cvterm => "cvterm",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Table::Db => "Database",
            Table::Cv => "Controlled vocabulary",
            Table::Cvterm => "Controlled vocabulary term",
        }
    }
}

/// A term as linked in the database: `db:accession` inside `cv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRow {
    pub db_name: String,
    pub cv_name: String,
    pub accession: String,
}

impl TermRow {
    fn from_row(row: &DbRow) -> Self {
        let text = |key: &str| match row.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        TermRow {
            db_name: text("db_name"),
            cv_name: text("cv_name"),
            accession: text("accession"),
        }
    }
}

/// Lookups the validator needs from the database.
pub trait TermSource {
    /// True when there is no database to ask.
    fn is_offline(&self) -> bool;

    /// Number of rows in `table` whose `name` equals `name`.
    fn count_named(&mut self, table: Table, name: &str) -> Result<i64>;

    /// Every db/cv/accession combination linked to the term `cv_term`.
    fn cross_references(&mut self, cv_term: &str) -> Result<Vec<TermRow>>;
}

impl TermSource for Database {
    fn is_offline(&self) -> bool {
        Database::is_offline(self)
    }

    fn count_named(&mut self, table: Table, name: &str) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM {}.{} WHERE name = $1",
            CHADO_SCHEMA,
            table.table_name()
        );
        self.query(&sql, &[name]).count()
    }

    fn cross_references(&mut self, cv_term: &str) -> Result<Vec<TermRow>> {
        let sql = format!(
            "SELECT db.name AS db_name, cv.name AS cv_name, dbxref.accession AS accession
             FROM {schema}.cvterm
             INNER JOIN {schema}.cv ON cv.cv_id = cvterm.cv_id
             INNER JOIN {schema}.dbxref ON dbxref.dbxref_id = cvterm.dbxref_id
             INNER JOIN {schema}.db ON db.db_id = dbxref.db_id
             WHERE cvterm.name = $1",
            schema = CHADO_SCHEMA
        );
        let rows = self.query(&sql, &[cv_term]).get()?;
        Ok(rows.iter().map(TermRow::from_row).collect())
    }
}

/// Steps of the validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    DbCheck,
    CvCheck,
    CvtermCheck,
    XrefCheck,
    Reconciled,
}

/// What the validation concluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Validation was skipped because the database is offline.
    pub offline: bool,
    /// Entities that do not exist yet and will be created by the field.
    pub missing: Vec<Table>,
    /// The field values were replaced with the database's values.
    pub updated: bool,
}

/// Checks `spec` against the database and reconciles it with the user.
///
/// May overwrite `db_name`, `cv_name` and `field_accession`.
pub fn validate(
    source: &mut dyn TermSource,
    prompt: &mut dyn Prompter,
    spec: &mut FieldSpec,
) -> Result<Reconciliation> {
    let mut outcome = Reconciliation::default();
    let mut stage = Stage::Start;

    while stage != Stage::Reconciled {
        debug!("Term validation: {:?}", stage);
        stage = match stage {
            Stage::Start => {
                if source.is_offline() {
                    prompt.say(
                        Style::Info,
                        "No database connection found. Skipping vocabulary validation.",
                    );
                    outcome.offline = true;
                    Stage::Reconciled
                } else {
                    Stage::DbCheck
                }
            }
            Stage::DbCheck => {
                check_exists(source, prompt, Table::Db, &spec.db_name, &mut outcome)?;
                Stage::CvCheck
            }
            Stage::CvCheck => {
                check_exists(source, prompt, Table::Cv, &spec.cv_name, &mut outcome)?;
                Stage::CvtermCheck
            }
            Stage::CvtermCheck => {
                check_exists(source, prompt, Table::Cvterm, &spec.cv_term, &mut outcome)?;
                if outcome.missing.is_empty() {
                    Stage::XrefCheck
                } else {
                    Stage::Reconciled
                }
            }
            Stage::XrefCheck => {
                outcome.updated = reconcile_cross_reference(source, prompt, spec)?;
                Stage::Reconciled
            }
            Stage::Reconciled => Stage::Reconciled,
        };
    }

    prompt.say(
        Style::Success,
        &format!(
            "Using term {}:{} from vocabulary {}.",
            spec.db_name, spec.field_accession, spec.cv_name
        ),
    );
    Ok(outcome)
}

fn check_exists(
    source: &mut dyn TermSource,
    prompt: &mut dyn Prompter,
    table: Table,
    name: &str,
    outcome: &mut Reconciliation,
) -> Result<()> {
    if source.count_named(table, name)? > 0 {
        debug!("{} '{}' found in {}", table.describe(), name, table.table_name());
        return Ok(());
    }

    let question = format!(
        "{} '{}' does not exist in {}.{} and will be created. Continue?",
        table.describe(),
        name,
        CHADO_SCHEMA,
        table.table_name()
    );
    if !prompt.ask_bool(&question, Style::Warn)? {
        return Err(Error::UserCancelled);
    }
    outcome.missing.push(table);
    Ok(())
}

/// Returns true when the spec was changed to match the database.
fn reconcile_cross_reference(
    source: &mut dyn TermSource,
    prompt: &mut dyn Prompter,
    spec: &mut FieldSpec,
) -> Result<bool> {
    let rows = source.cross_references(&spec.cv_term)?;

    match rows.as_slice() {
        [] => {
            prompt.say(
                Style::Warn,
                &format!(
                    "'{}', '{}' and '{}' exist but are not linked through {}.dbxref. \
                     Continuing with the values you entered.",
                    spec.db_name, spec.cv_name, spec.cv_term, CHADO_SCHEMA
                ),
            );
            Ok(false)
        }
        [row] => {
            if row.accession.trim() == spec.field_accession.trim() {
                return Ok(false);
            }
            let question = format!(
                "The accession of '{}' in the database is '{}' but you entered '{}'. Use '{}' instead?",
                spec.cv_term, row.accession, spec.field_accession, row.accession
            );
            if prompt.ask_bool(&question, Style::Warn)? {
                spec.field_accession = row.accession.clone();
                Ok(true)
            } else {
                Ok(false)
            }
        }
        rows => {
            let mut options: Vec<String> = rows
                .iter()
                .map(|row| format!("{}:{} (vocabulary {})", row.db_name, row.accession, row.cv_name))
                .collect();
            options.push(format!(
                "Keep my settings ({}:{} from vocabulary {})",
                spec.db_name, spec.field_accession, spec.cv_name
            ));

            let question = format!(
                "'{}' is linked to several accessions. Which one should the field use?",
                spec.cv_term
            );
            let choice = prompt.ask_multiple_choice(&question, &options, Style::Warn)?;

            match rows.get(choice) {
                Some(row) => {
                    spec.field_accession = row.accession.clone();
                    spec.db_name = row.db_name.clone();
                    spec.cv_name = row.cv_name.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}
