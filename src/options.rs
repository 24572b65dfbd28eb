//! Normalised view of the command-line options.
//!
//! clap does the parsing; this module flattens the matches into an immutable
//! map keyed by long option name, with short aliases resolving to the same
//! entry, and then into the typed [`Options`] the generator consumes.

use clap::{ArgMatches, Command};
use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Value of one resolved option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Value(String),
    Flag(bool),
}

/// Immutable map from long option name to its value.
///
/// Options that were not given resolve to `Flag(false)`.
#[derive(Debug, Clone, Default)]
pub struct OptionsSet {
    values: IndexMap<String, OptionValue>,
    aliases: IndexMap<char, String>,
}

impl OptionsSet {
    /// Builds the set from every long option declared on `command`.
    pub fn from_matches(command: &Command, matches: &ArgMatches) -> Self {
        let mut set = OptionsSet::default();

        for arg in command.get_arguments() {
            let Some(long) = arg.get_long() else {
                continue;
            };
            let id = arg.get_id().as_str();

            let value = if arg.get_action().takes_values() {
                matches
                    .try_get_raw(id)
                    .ok()
                    .flatten()
                    .and_then(|mut raw| raw.next())
                    .map(|raw| OptionValue::Value(raw.to_string_lossy().into_owned()))
                    .unwrap_or(OptionValue::Flag(false))
            } else {
                let flag = matches.try_get_one::<bool>(id).ok().flatten().copied();
                OptionValue::Flag(flag.unwrap_or(false))
            };

            if let Some(short) = arg.get_short() {
                set.aliases.insert(short, long.to_string());
            }
            set.values.insert(long.to_string(), value);
        }

        set
    }

    /// Builds a set from literal pairs, mostly useful in tests.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: Into<String>,
    {
        OptionsSet {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            aliases: IndexMap::new(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&OptionValue> {
        if let Some(value) = self.values.get(name) {
            return Some(value);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(short), None) => {
                self.aliases.get(&short).and_then(|long| self.values.get(long))
            }
            _ => None,
        }
    }

    /// Returns the string value of an option, if one was given.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        match self.lookup(name) {
            Some(OptionValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns whether an option was given at all.
    pub fn bool_option(&self, name: &str) -> bool {
        match self.lookup(name) {
            Some(OptionValue::Value(_)) => true,
            Some(OptionValue::Flag(flag)) => *flag,
            None => false,
        }
    }
}

/// The two flavours of generated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Chado,
    Tripal,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Chado => "chado",
            FieldType::Tripal => "tripal",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chado" => Ok(FieldType::Chado),
            "tripal" => Ok(FieldType::Tripal),
            other => Err(Error::Configuration(format!(
                "invalid field type '{other}', expected 'chado' or 'tripal'"
            ))),
        }
    }
}

/// Typed options used by the generator.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub field_type: FieldType,
    pub output: Option<PathBuf>,
    pub drupal_root: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub answers: Option<PathBuf>,
    pub verbose: bool,
}

impl TryFrom<&OptionsSet> for Options {
    type Error = Error;

    fn try_from(set: &OptionsSet) -> Result<Self> {
        let field_type = match set.string_option("type") {
            Some(value) => value.parse()?,
            None => FieldType::default(),
        };

        Ok(Options {
            field_type,
            output: set.string_option("output").map(PathBuf::from),
            drupal_root: set.string_option("drupal-root").map(PathBuf::from),
            templates: set.string_option("templates").map(PathBuf::from),
            answers: set.string_option("answers").map(PathBuf::from),
            verbose: set.bool_option("verbose"),
        })
    }
}
