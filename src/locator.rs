//! Locates the Drupal installation the generated field belongs to.

use log::debug;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_MAX_DEPTH, DRUPAL_ROOT_MARKER};

/// Walks upwards from `start` looking for a directory containing
/// `sites/all/modules`.
///
/// At most `max_depth` directories are tested, `start` included. The
/// filesystem root itself is never tested. Returns `None` when nothing
/// matched; this is a sentinel, not an error.
pub fn find_root<P: AsRef<Path>>(start: P, max_depth: usize) -> Option<PathBuf> {
    for (step, dir) in start.as_ref().ancestors().enumerate() {
        if step >= max_depth || dir.parent().is_none() {
            break;
        }
        if dir.join(DRUPAL_ROOT_MARKER).is_dir() {
            debug!("Found Drupal root at {}", dir.display());
            return Some(dir.to_path_buf());
        }
    }

    debug!(
        "No Drupal root within {} levels of {}",
        max_depth,
        start.as_ref().display()
    );
    None
}

/// Returns `known` unchanged when given, otherwise searches from the
/// current working directory with the default depth.
pub fn locate_root(known: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = known {
        return Some(path.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_root(cwd, DEFAULT_MAX_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_marker_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(DRUPAL_ROOT_MARKER)).unwrap();
        let nested = tmp.path().join("sites/all/modules/custom/my_module");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&nested, 7), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn gives_up_past_max_depth() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(DRUPAL_ROOT_MARKER)).unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        // c, b, a are tested; the root is the fourth step.
        assert_eq!(find_root(&nested, 3), None);
        assert_eq!(find_root(&nested, 4), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn known_path_skips_search() {
        let known = Path::new("/definitely/not/a/drupal/root");
        assert_eq!(locate_root(Some(known)), Some(known.to_path_buf()));
    }
}
