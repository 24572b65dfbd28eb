//! Command-line interface implementation for fieldgen.
//! Provides argument parsing and help text formatting using clap.

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::options::OptionsSet;

/// Command-line arguments structure for fieldgen.
#[derive(Parser, Debug)]
#[command(
    name = "fieldgen",
    author,
    version,
    about = "fieldgen: interactive Tripal field scaffolding tool",
    long_about = None
)]
pub struct Args {
    /// Field flavour to generate: `chado` (default) or `tripal`
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub field_type: Option<String>,

    /// Directory in which the `<field>_output` directory is created.
    /// Defaults to the current working directory.
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Drupal root holding `sites/default/settings.php`.
    /// When absent the root is searched upwards from the current directory.
    #[arg(short, long, value_name = "DRUPAL_ROOT", env = "DRUPAL_ROOT")]
    pub drupal_root: Option<PathBuf>,

    /// Directory with custom `<type>_*` template stubs
    #[arg(long, value_name = "TEMPLATES_DIR")]
    pub templates: Option<PathBuf>,

    /// JSON or YAML file with answers that skip the matching questions
    #[arg(short, long, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses the process arguments into an [`OptionsSet`] keyed by long option name.
///
/// # Exits
/// * With clap's default error handling for malformed arguments
pub fn get_options() -> OptionsSet {
    let command = Args::command();
    let matches = command.clone().get_matches();
    OptionsSet::from_matches(&command, &matches)
}
