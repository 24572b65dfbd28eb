//! fieldgen scaffolds Tripal fields.
//! It asks for the field definition, checks the controlled vocabulary values
//! against the Chado database when one is reachable, and writes the field's
//! PHP files from templates.

/// Command-line interface module for the fieldgen application
pub mod cli;

/// Common constants
pub mod constants;

/// Optional, blocking database gateway
pub mod db;

/// Error types and handling for the fieldgen application
pub mod error;

/// The collected field definition and its questions
pub mod field;

/// Orchestration of a generation run
pub mod generator;

/// Drupal root discovery
pub mod locator;

/// Normalised command-line options
pub mod options;

/// User input and interaction handling
pub mod prompt;

/// Drupal database settings
pub mod settings;

/// Template loading and placeholder substitution
pub mod template;

/// Vocabulary validation against Chado
pub mod validator;

/// Output tree creation
pub mod writer;
