//! Template loading and rendering for generated fields.
//!
//! Templates are plain text with `$$attribute$$` placeholders. Rendering is
//! a literal, global replacement per [`FieldAttr`], applied in declaration
//! order. Values are not escaped: a value containing another attribute's
//! token is replaced again when that attribute's turn comes.

use log::debug;
use std::path::Path;

use crate::error::{Error, Result};
use crate::field::{FieldAttr, FieldSpec};
use crate::options::FieldType;

/// The four documents needed to generate one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub field_type: FieldType,
    pub fields: String,
    pub class: String,
    pub formatter: String,
    pub widget: String,
}

impl TemplateSet {
    /// File name of one document for `field_type`, e.g. `tripal_widget`.
    pub fn file_name(field_type: FieldType, name: &str) -> String {
        format!("{}_{}", field_type.as_str(), name)
    }

    /// Reads `<dir>/<type>_fields`, `<type>_class`, `<type>_formatter` and
    /// `<type>_widget`.
    pub fn load<P: AsRef<Path>>(dir: P, field_type: FieldType) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| -> Result<String> {
            let path = dir.join(Self::file_name(field_type, name));
            debug!("Loading template {}", path.display());
            std::fs::read_to_string(&path).map_err(|e| {
                Error::Template(format!("cannot read '{}': {}", path.display(), e))
            })
        };

        Ok(TemplateSet {
            field_type,
            fields: read("fields")?,
            class: read("class")?,
            formatter: read("formatter")?,
            widget: read("widget")?,
        })
    }

    /// The stubs shipped inside the binary.
    pub fn builtin(field_type: FieldType) -> Self {
        let (fields, class, formatter, widget) = match field_type {
            FieldType::Chado => (
                include_str!("../stubs/chado_fields"),
                include_str!("../stubs/chado_class"),
                include_str!("../stubs/chado_formatter"),
                include_str!("../stubs/chado_widget"),
            ),
            FieldType::Tripal => (
                include_str!("../stubs/tripal_fields"),
                include_str!("../stubs/tripal_class"),
                include_str!("../stubs/tripal_formatter"),
                include_str!("../stubs/tripal_widget"),
            ),
        };

        TemplateSet {
            field_type,
            fields: fields.to_string(),
            class: class.to_string(),
            formatter: formatter.to_string(),
            widget: widget.to_string(),
        }
    }

    /// Loads from `dir` when given, otherwise returns the built-in stubs.
    pub fn resolve(dir: Option<&Path>, field_type: FieldType) -> Result<Self> {
        match dir {
            Some(dir) => Self::load(dir, field_type),
            None => Ok(Self::builtin(field_type)),
        }
    }

    /// Substitutes every `$$attribute$$` token with the field's values.
    ///
    /// Unknown `$$...$$` sequences are left untouched.
    pub fn render(&self, spec: &FieldSpec) -> TemplateSet {
        TemplateSet {
            field_type: self.field_type,
            fields: substitute(&self.fields, spec),
            class: substitute(&self.class, spec),
            formatter: substitute(&self.formatter, spec),
            widget: substitute(&self.widget, spec),
        }
    }
}

/// Replaces the placeholders of every attribute in `body`.
pub fn substitute(body: &str, spec: &FieldSpec) -> String {
    FieldAttr::ALL.iter().fold(body.to_string(), |acc, attr| {
        acc.replace(&attr.placeholder(), spec.get(*attr))
    })
}
