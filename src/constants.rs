//! Common constants used throughout fieldgen.

/// Subdirectory whose presence identifies a Drupal root.
pub const DRUPAL_ROOT_MARKER: &str = "sites/all/modules";

/// Location of the Drupal settings file relative to the Drupal root.
pub const SETTINGS_FILE: &str = "sites/default/settings.php";

/// How many directories the root search climbs before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 7;

/// Schema holding the Chado tables.
pub const CHADO_SCHEMA: &str = "chado";

/// Port used when the settings leave it empty.
pub const DEFAULT_PG_PORT: u16 = 5432;

/// Suffix of the container directory created for every field.
pub const OUTPUT_DIR_SUFFIX: &str = "_output";

/// Extension appended to the fields file when one already exists.
pub const STUB_EXTENSION: &str = "stub";
