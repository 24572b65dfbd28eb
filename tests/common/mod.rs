#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;

use fieldgen::error::{Error, Result};
use fieldgen::prompt::LinePrompter;
use fieldgen::validator::{Table, TermRow, TermSource};

pub type ScriptedPrompter = LinePrompter<Cursor<Vec<u8>>, Vec<u8>>;

/// A prompter that answers from `input`, one line per answer.
pub fn scripted(input: &str) -> ScriptedPrompter {
    LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// Everything the prompter printed.
pub fn transcript(prompt: ScriptedPrompter) -> String {
    String::from_utf8(prompt.into_output()).unwrap()
}

/// In-memory stand-in for the Chado database.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub offline: bool,
    pub counts: HashMap<&'static str, i64>,
    pub rows: Vec<TermRow>,
    pub fail_queries: bool,
    pub queries: Vec<String>,
}

impl FakeSource {
    pub fn offline() -> Self {
        FakeSource { offline: true, ..Default::default() }
    }

    /// Every entity exists and the term links to `rows`.
    pub fn with_rows(rows: Vec<TermRow>) -> Self {
        let mut counts = HashMap::new();
        counts.insert("db", 1);
        counts.insert("cv", 1);
        counts.insert("cvterm", 1);
        FakeSource { counts, rows, ..Default::default() }
    }
}

impl TermSource for FakeSource {
    fn is_offline(&self) -> bool {
        self.offline
    }

    fn count_named(&mut self, table: Table, name: &str) -> Result<i64> {
        self.queries.push(format!("count {} {}", table.table_name(), name));
        if self.fail_queries {
            return Err(Error::Query {
                sql: "SELECT COUNT(*) AS count".to_string(),
                detail: "relation does not exist".to_string(),
            });
        }
        Ok(self.counts.get(table.table_name()).copied().unwrap_or(0))
    }

    fn cross_references(&mut self, cv_term: &str) -> Result<Vec<TermRow>> {
        self.queries.push(format!("xref {cv_term}"));
        Ok(self.rows.clone())
    }
}

pub fn term_row(db_name: &str, cv_name: &str, accession: &str) -> TermRow {
    TermRow {
        db_name: db_name.to_string(),
        cv_name: cv_name.to_string(),
        accession: accession.to_string(),
    }
}
