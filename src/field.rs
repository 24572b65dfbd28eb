//! The field definition collected from the user.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::prompt::{Prompter, Style};

/// Every attribute of a [`FieldSpec`], in substitution order.
///
/// The snake-case name of each attribute is also its template placeholder,
/// `$$name$$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAttr {
    FieldLabel,
    FieldName,
    FieldDescription,
    ModuleName,
    DbName,
    CvName,
    CvTerm,
    FieldAccession,
}

impl FieldAttr {
    pub const ALL: [FieldAttr; 8] = [
        FieldAttr::FieldLabel,
        FieldAttr::FieldName,
        FieldAttr::FieldDescription,
        FieldAttr::ModuleName,
        FieldAttr::DbName,
        FieldAttr::CvName,
        FieldAttr::CvTerm,
        FieldAttr::FieldAccession,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldAttr::FieldLabel => "field_label",
            FieldAttr::FieldName => "field_name",
            FieldAttr::FieldDescription => "field_description",
            FieldAttr::ModuleName => "module_name",
            FieldAttr::DbName => "db_name",
            FieldAttr::CvName => "cv_name",
            FieldAttr::CvTerm => "cv_term",
            FieldAttr::FieldAccession => "field_accession",
        }
    }

    /// The `$$name$$` token standing for this attribute in templates.
    pub fn placeholder(&self) -> String {
        format!("$${}$$", self.name())
    }
}

/// Questions asked to build a field, in the order they are asked.
///
/// The machine name is not asked for; it is derived afterwards.
pub const QUESTIONS: [(&str, FieldAttr); 7] = [
    ("Field Label (E.g. Germplasm Summary): ", FieldAttr::FieldLabel),
    ("Field Description: ", FieldAttr::FieldDescription),
    ("Module Name (E.g. tripal_germplasm_module): ", FieldAttr::ModuleName),
    ("Database Name (E.g. local): ", FieldAttr::DbName),
    ("Controlled Vocabulary Name (E.g. local): ", FieldAttr::CvName),
    ("Controlled Vocabulary Term (E.g. germplasm_summary): ", FieldAttr::CvTerm),
    ("Accession (E.g. 30021 or germplasm): ", FieldAttr::FieldAccession),
];

/// Values describing the field to generate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field_label: String,
    pub field_name: String,
    pub field_description: String,
    pub module_name: String,
    pub db_name: String,
    pub cv_name: String,
    pub cv_term: String,
    pub field_accession: String,
}

impl FieldSpec {
    pub fn get(&self, attr: FieldAttr) -> &str {
        match attr {
            FieldAttr::FieldLabel => &self.field_label,
            FieldAttr::FieldName => &self.field_name,
            FieldAttr::FieldDescription => &self.field_description,
            FieldAttr::ModuleName => &self.module_name,
            FieldAttr::DbName => &self.db_name,
            FieldAttr::CvName => &self.cv_name,
            FieldAttr::CvTerm => &self.cv_term,
            FieldAttr::FieldAccession => &self.field_accession,
        }
    }

    pub fn set(&mut self, attr: FieldAttr, value: String) {
        let slot = match attr {
            FieldAttr::FieldLabel => &mut self.field_label,
            FieldAttr::FieldName => &mut self.field_name,
            FieldAttr::FieldDescription => &mut self.field_description,
            FieldAttr::ModuleName => &mut self.module_name,
            FieldAttr::DbName => &mut self.db_name,
            FieldAttr::CvName => &mut self.cv_name,
            FieldAttr::CvTerm => &mut self.cv_term,
            FieldAttr::FieldAccession => &mut self.field_accession,
        };
        *slot = value;
    }

    /// `lowercase(db_name) + "__" + cv_term`.
    pub fn machine_name(&self) -> String {
        format!("{}__{}", self.db_name.to_lowercase(), self.cv_term)
    }

    /// Stores the derived machine name in `field_name`.
    pub fn derive_machine_name(&mut self) {
        self.field_name = self.machine_name();
    }
}

/// Answers supplied up front, keyed by attribute name.
pub type Answers = IndexMap<String, String>;

/// Reads preloaded answers from a JSON or YAML file.
///
/// JSON is tried first, then YAML. Unknown keys and `field_name` are
/// ignored with a debug message: the machine name is always derived.
pub fn load_answers<P: AsRef<Path>>(path: P) -> Result<Answers> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!("cannot read answers file '{}': {}", path.display(), e))
    })?;
    parse_answers(&content)
}

/// Parses preloaded answers from JSON or YAML text.
pub fn parse_answers(content: &str) -> Result<Answers> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::Configuration(format!("invalid answers file: {e}")))?,
    };

    let mut answers = Answers::new();
    for (key, value) in raw {
        let known = QUESTIONS.iter().any(|(_, attr)| attr.name() == key);
        if !known {
            debug!("Ignoring preloaded answer '{}'", key);
            continue;
        }
        let value = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(Error::Configuration(format!(
                    "answer '{key}' must be a string, got {other}"
                )))
            }
        };
        answers.insert(key, value);
    }
    Ok(answers)
}

/// Fills a [`FieldSpec`] by asking every question in [`QUESTIONS`] order.
///
/// A non-blank preloaded answer replaces its question. The machine name is
/// left empty for the caller to derive.
pub fn ask_questions(prompt: &mut dyn Prompter, answers: &Answers) -> Result<FieldSpec> {
    let mut spec = FieldSpec::default();
    for (question, attr) in QUESTIONS {
        let preloaded = answers
            .get(attr.name())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty());
        let value = match preloaded {
            Some(value) => {
                debug!("Using preloaded answer for {}", attr.name());
                value.to_string()
            }
            None => prompt.ask(question, Style::Plain)?,
        };
        spec.set(attr, value);
    }
    Ok(spec)
}
