//! Reads database credentials out of a Drupal `settings.php`.
//!
//! The file is PHP, so it is not executed. Comments are stripped, the last
//! assignment defining `$databases['default']['default']` is located with a
//! regex and the scalar `'key' => 'value'` entries of its body are
//! collected. Anything not found there is treated as missing settings,
//! which puts the gateway offline.

use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PG_PORT, SETTINGS_FILE};

/// Connection details for the Drupal database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub name: String,
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
    pub driver: String,
    pub prefix: String,
}

/// Path of the settings file under a Drupal root.
pub fn settings_path<P: AsRef<Path>>(drupal_root: P) -> PathBuf {
    drupal_root.as_ref().join(SETTINGS_FILE)
}

/// Loads the settings of the Drupal installation at `drupal_root`.
///
/// Returns `None` when the file is missing, unreadable or holds no default
/// database definition.
pub fn read_settings<P: AsRef<Path>>(drupal_root: P) -> Option<DbSettings> {
    let path = settings_path(drupal_root);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    let settings = parse_settings(&content);
    if settings.is_none() {
        debug!("No default database defined in {}", path.display());
    }
    settings
}

/// Keys leading from `$databases` to the connection that is used.
const CONNECTION_PATH: [&str; 2] = ["default", "default"];

/// Extracts the default database definition from settings source text.
///
/// Comments are ignored. Both `$databases['default']['default'] = ...` and
/// the nested `$databases = array('default' => array('default' => ...))`
/// written by the installer are understood, in `array()` or `[]` syntax.
/// As in PHP, the last assignment wins.
pub fn parse_settings(content: &str) -> Option<DbSettings> {
    let source = strip_comments(content);
    let block = default_connection(&source)?;
    let mut values = scalar_entries(block)?;

    let name = values.remove("database")?;
    let port = values
        .get("port")
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PG_PORT);

    Some(DbSettings {
        name,
        host: values.remove("host").unwrap_or_else(|| "localhost".to_string()),
        username: values.remove("username").unwrap_or_default(),
        password: values.remove("password").unwrap_or_default(),
        port,
        driver: values.remove("driver").unwrap_or_else(|| "pgsql".to_string()),
        prefix: values.remove("prefix").unwrap_or_default(),
    })
}

/// Body of the last assignment that defines the default connection.
///
/// A later `$databases = array();` clears an earlier definition.
fn default_connection(source: &str) -> Option<&str> {
    let assignment = Regex::new(
        r#"\$databases\s*((?:\[\s*(?:'[^']*'|"[^"]*")\s*\]\s*)*)=\s*(?:array\s*\(|\[)"#,
    )
    .ok()?;
    let key = Regex::new(r#"['"]([^'"]*)['"]"#).ok()?;

    let mut found = None;
    for captures in assignment.captures_iter(source) {
        let (Some(whole), Some(keys)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let path: Vec<&str> = key
            .captures_iter(keys.as_str())
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();
        if path.len() > CONNECTION_PATH.len() || path[..] != CONNECTION_PATH[..path.len()] {
            continue;
        }

        let mut block = enclosed(source, whole.end());
        for name in &CONNECTION_PATH[path.len()..] {
            block = block.and_then(|b| child(b, name));
        }
        debug!(
            "$databases assignment at byte {} defines the default connection: {}",
            whole.start(),
            block.is_some()
        );
        found = Some(block);
    }
    found.flatten()
}

/// Body of the array stored under `name` at the top level of `block`.
fn child<'a>(block: &'a str, name: &str) -> Option<&'a str> {
    let opener = Regex::new(&format!(
        r#"['"]{}['"]\s*=>\s*(?:array\s*\(|\[)"#,
        regex::escape(name)
    ))
    .ok()?;
    opener
        .find_iter(block)
        .filter(|m| depth_at(block, m.start()) == 0)
        .last()
        .and_then(|m| enclosed(block, m.end()))
}

/// `'key' => scalar` entries at the top level of an array body.
///
/// Nested arrays, such as a per-table prefix map, are skipped. Repeated keys
/// keep the last value.
fn scalar_entries(block: &str) -> Option<HashMap<String, String>> {
    let entry = Regex::new(
        r#"['"](\w+)['"]\s*=>\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)"|(\d+))"#,
    )
    .ok()?;
    let top: String = depths(block, 0)
        .filter(|&(_, _, before, after)| before == 0 && after == 0)
        .map(|(_, c, _, _)| c)
        .collect();

    let mut values = HashMap::new();
    for captures in entry.captures_iter(&top) {
        let value = if let Some(m) = captures.get(2) {
            unescape(m.as_str(), '\'')
        } else if let Some(m) = captures.get(3) {
            unescape(m.as_str(), '"')
        } else {
            captures.get(4).map(|m| m.as_str().to_string()).unwrap_or_default()
        };
        values.insert(captures[1].to_string(), value);
    }
    Some(values)
}

fn unescape(literal: &str, quote: char) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == quote || next == '\\' => out.push(next),
            Some(next) => {
                out.push(c);
                out.push(next);
            }
            None => out.push(c),
        }
    }
    out
}

/// Walks `text` yielding `(index, char, depth before, depth after)`.
///
/// Brackets inside string literals do not count.
fn depths(text: &str, initial: usize) -> impl Iterator<Item = (usize, char, usize, usize)> + '_ {
    let mut depth = initial;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    text.char_indices().map(move |(i, c)| {
        let before = depth;
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
        (i, c, before, depth)
    })
}

/// Text between the bracket that ends just before `start` and its match.
fn enclosed(text: &str, start: usize) -> Option<&str> {
    let rest = text.get(start..)?;
    depths(rest, 1)
        .find(|&(_, _, before, after)| before == 1 && after == 0)
        .map(|(end, _, _, _)| &rest[..end])
}

fn depth_at(text: &str, index: usize) -> usize {
    depths(text, 0)
        .take_while(|&(i, _, _, _)| i < index)
        .last()
        .map_or(0, |(_, _, _, after)| after)
}

/// Drops `/* */`, `//` and `#` comments, leaving string literals intact.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                let mut escaped = false;
                for s in chars.by_ref() {
                    out.push(s);
                    if escaped {
                        escaped = false;
                    } else if s == '\\' {
                        escaped = true;
                    } else if s == c {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for s in chars.by_ref() {
                    if prev == '*' && s == '/' {
                        break;
                    }
                    prev = s;
                }
                out.push(' ');
            }
            '/' if chars.peek() == Some(&'/') => {
                if chars.any(|s| s == '\n') {
                    out.push('\n');
                }
            }
            '#' => {
                if chars.any(|s| s == '\n') {
                    out.push('\n');
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRUPAL7: &str = r#"<?php
$databases['default']['default'] = array(
  'database' => 'drupal',
  'username' => 'tripal',
  'password' => "s3cret",
  'host' => 'db.example.org',
  'port' => '5433',
  'driver' => 'pgsql',
  'prefix' => '',
);
$update_free_access = FALSE;
"#;

    #[test]
    fn parses_drupal7_array_block() {
        let settings = parse_settings(DRUPAL7).unwrap();
        assert_eq!(
            settings,
            DbSettings {
                name: "drupal".to_string(),
                host: "db.example.org".to_string(),
                username: "tripal".to_string(),
                password: "s3cret".to_string(),
                port: 5433,
                driver: "pgsql".to_string(),
                prefix: String::new(),
            }
        );
    }

    #[test]
    fn parses_short_array_syntax_with_numeric_port() {
        let content = "$databases['default']['default'] = [\n  'database' => 'd8',\n  'port' => 5432,\n];";
        let settings = parse_settings(content).unwrap();
        assert_eq!(settings.name, "d8");
        assert_eq!(settings.port, 5432);
        assert_eq!(settings.host, "localhost");
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        let content = "$databases['default']['default'] = array('database' => 'x', 'port' => '');";
        assert_eq!(parse_settings(content).unwrap().port, DEFAULT_PG_PORT);
    }

    const STOCK_D7: &str = r#"<?php
/**
 * Database settings:
 *
 * @code
 * $databases['default']['default'] = array(
 *   'driver' => 'mysql',
 *   'database' => 'databasename',
 *   'username' => 'username',
 *   'password' => 'password',
 *   'host' => 'localhost',
 *   'prefix' => '',
 * );
 * @endcode
 */
$databases = array();

// $databases['default']['default'] = array('database' => 'old', 'driver' => 'mysql');
# $databases['default']['default'] = array('database' => 'older');
$databases['default']['default'] = array(
  'driver' => 'pgsql',
  'database' => 'tripal',
  'username' => 'tripal_admin',
  'password' => 'p#ss//word',
  'host' => 'localhost',
  'prefix' => '',
);

$update_free_access = FALSE;
"#;

    const INSTALLER_D7: &str = r#"<?php
/**
 * $databases['default']['default'] = array('driver' => 'mysql', 'database' => 'example');
 */
$databases = array (
  'default' => 
  array (
    'default' => 
    array (
      'database' => 'chado_site',
      'username' => 'drupal',
      'password' => 'it's',
      'host' => 'pg.internal',
      'port' => '5434',
      'driver' => 'pgsql',
      'prefix' => 
      array (
        'default' => 'd7_',
      ),
    ),
  ),
);
"#;

    #[test]
    fn commented_example_is_ignored() {
        let settings = parse_settings(STOCK_D7).unwrap();
        assert_eq!(settings.name, "tripal");
        assert_eq!(settings.driver, "pgsql");
        assert_eq!(settings.username, "tripal_admin");
        assert_eq!(settings.password, "p#ss//word");
    }

    #[test]
    fn parses_installer_nested_layout() {
        let settings = parse_settings(INSTALLER_D7).unwrap();
        assert_eq!(
            settings,
            DbSettings {
                name: "chado_site".to_string(),
                host: "pg.internal".to_string(),
                username: "drupal".to_string(),
                password: "it's".to_string(),
                port: 5434,
                driver: "pgsql".to_string(),
                prefix: String::new(),
            }
        );
    }

    #[test]
    fn parses_nested_short_array_syntax() {
        let content = "<?php\n$databases = ['default' => ['default' => ['database' => 'd8', 'driver' => 'pgsql']]];\n";
        let settings = parse_settings(content).unwrap();
        assert_eq!(settings.name, "d8");
        assert_eq!(settings.driver, "pgsql");
    }

    #[test]
    fn last_assignment_wins() {
        let content = "$databases['default']['default'] = array('database' => 'first');\n\
                       $databases['default']['default'] = array('database' => 'second');";
        assert_eq!(parse_settings(content).unwrap().name, "second");
    }

    #[test]
    fn later_reset_clears_definition() {
        let content = "$databases['default']['default'] = array('database' => 'gone');\n\
                       $databases = array();";
        assert_eq!(parse_settings(content), None);
    }

    #[test]
    fn other_connections_are_skipped() {
        let content = "$databases['default']['default'] = array('database' => 'main');\n\
                       $databases['legacy']['default'] = array('database' => 'legacy');";
        assert_eq!(parse_settings(content).unwrap().name, "main");
    }

    #[test]
    fn missing_block_is_none() {
        assert_eq!(parse_settings("<?php\n$conf = array();\n"), None);
    }
}
