//! Writes rendered templates into the generated directory tree.
//!
//! ```text
//! <base>/<field>_output/<module>.fields.inc
//! <base>/<field>_output/<field>/<field>.inc
//! <base>/<field>_output/<field>/<field>_widget.inc
//! <base>/<field>_output/<field>/<field>_formatter.inc
//! ```
//!
//! Both directories must be new: nothing from an earlier run is merged or
//! overwritten.

use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::constants::{OUTPUT_DIR_SUFFIX, STUB_EXTENSION};
use crate::error::{Error, Result};
use crate::field::FieldSpec;
use crate::template::TemplateSet;

/// Where the output container is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBase {
    WorkingDirectory,
    Explicit(PathBuf),
}

impl OutputBase {
    pub fn from_option(output: Option<&Path>) -> Self {
        match output {
            Some(path) => OutputBase::Explicit(path.to_path_buf()),
            None => OutputBase::WorkingDirectory,
        }
    }

    fn resolve(&self) -> Result<PathBuf> {
        match self {
            OutputBase::WorkingDirectory => Ok(std::env::current_dir()?),
            OutputBase::Explicit(path) => Ok(path.clone()),
        }
    }
}

/// Directories created for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub container: PathBuf,
    pub field: PathBuf,
}

/// Creates the output tree of a field.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    base: OutputBase,
}

impl OutputWriter {
    pub fn new(base: OutputBase) -> Self {
        Self { base }
    }

    /// Writes the four rendered documents and returns the created
    /// directories.
    ///
    /// The field and module names must each be a single path component. If
    /// anything fails after the container was created, the container is
    /// removed again.
    pub fn write(&self, spec: &FieldSpec, files: &TemplateSet) -> Result<OutputPaths> {
        check_file_name("Field name", &spec.field_name)?;
        check_file_name("Module name", &spec.module_name)?;

        let base = self.base.resolve()?;
        let container = base.join(format!("{}{}", spec.field_name, OUTPUT_DIR_SUFFIX));
        create_new_dir(&container)?;

        match fill_container(&container, spec, files) {
            Ok(field) => Ok(OutputPaths { container, field }),
            Err(e) => {
                debug!("Removing incomplete output {}", container.display());
                if let Err(cleanup) = fs::remove_dir_all(&container) {
                    warn!("Cannot remove {}: {}", container.display(), cleanup);
                }
                Err(e)
            }
        }
    }
}

fn fill_container(container: &Path, spec: &FieldSpec, files: &TemplateSet) -> Result<PathBuf> {
    let fields_file = available_path(container.join(format!("{}.fields.inc", spec.module_name)));
    write_file(&fields_file, &files.fields)?;

    let field_dir = container.join(&spec.field_name);
    create_new_dir(&field_dir)?;

    let name = &spec.field_name;
    write_file(&field_dir.join(format!("{name}.inc")), &files.class)?;
    write_file(&field_dir.join(format!("{name}_widget.inc")), &files.widget)?;
    write_file(&field_dir.join(format!("{name}_formatter.inc")), &files.formatter)?;

    Ok(field_dir)
}

/// Rejects values that are not one plain path component.
fn check_file_name(what: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single && !value.contains(['/', '\\']) {
        return Ok(());
    }
    Err(Error::Configuration(format!(
        "{what} '{value}' cannot be used as a file name"
    )))
}

/// Creates exactly one directory level; an existing directory is an error.
fn create_new_dir(path: &Path) -> Result<()> {
    debug!("Creating directory: {}", path.display());
    fs::create_dir(path).map_err(|e| {
        debug!("Cannot create {}: {}", path.display(), e);
        Error::OutputDirectory { path: path.display().to_string() }
    })
}

/// Returns `path`, or `path.stub` when `path` is already taken.
///
/// The container created by [`OutputWriter::write`] is always new, so during
/// a run the plain name is free. The `.stub` name only applies to a
/// directory that already holds the file.
fn available_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(STUB_EXTENSION);
    let stub = path.with_file_name(name);
    debug!("{} exists, writing {} instead", path.display(), stub.display());
    stub
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    debug!("Writing file: {}", path.display());
    fs::write(path, content).map_err(Error::IoError)
}
