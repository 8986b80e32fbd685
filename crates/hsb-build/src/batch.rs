//! Input collection and parallel batch compilation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use hsb_compiler::{Compiler, SourceUnit, UnitError};
use hsb_config::BuildConfig;
use rayon::prelude::*;

/// Error that stops a build before any unit is compiled.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid file extension for {}. Allowed extensions: {allowed}", path.display())]
    UnsupportedExtension { path: PathBuf, allowed: String },

    #[error("Cannot read input directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source files selected for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    /// Input directory in batch mode, `None` for a single file.
    pub root: Option<PathBuf>,
    /// Files to compile, sorted.
    pub files: Vec<PathBuf>,
}

impl Inputs {
    /// Collect source files from a file or a directory tree.
    ///
    /// Directories are walked recursively, keeping files whose extension is
    /// accepted by `config`. Hidden entries and the output directory are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if `input` does not exist, a single file has an
    /// unsupported extension, or the top-level directory cannot be read.
    pub fn collect(input: &Path, config: &BuildConfig) -> Result<Self, BuildError> {
        if !input.exists() {
            return Err(BuildError::InputNotFound(input.to_path_buf()));
        }

        if !input.is_dir() {
            if !config.accepts(input) {
                return Err(BuildError::UnsupportedExtension {
                    path: input.to_path_buf(),
                    allowed: config.describe_extensions(),
                });
            }
            return Ok(Self {
                root: None,
                files: vec![input.to_path_buf()],
            });
        }

        let entries = fs::read_dir(input).map_err(|source| BuildError::ReadDir {
            path: input.to_path_buf(),
            source,
        })?;

        let skip = config.output_dir.canonicalize().ok();
        let mut files = Vec::new();
        collect_dir(entries, config, skip.as_deref(), &mut files);
        files.sort();
        tracing::debug!(root = %input.display(), count = files.len(), "Collected source files");

        Ok(Self {
            root: Some(input.to_path_buf()),
            files,
        })
    }

    /// Whether this is a directory build.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        self.root.is_some()
    }

    /// Path shown in reports: relative to the root, or the file name.
    #[must_use]
    pub fn display_path(&self, file: &Path) -> PathBuf {
        match &self.root {
            Some(root) => file.strip_prefix(root).unwrap_or(file).to_path_buf(),
            None => file.file_name().map_or_else(|| file.to_path_buf(), PathBuf::from),
        }
    }

    /// `output_root/<relative dir>/<stem>.html`
    #[must_use]
    pub fn output_path(&self, file: &Path, output_root: &Path) -> PathBuf {
        let relative = self.display_path(file);
        let mut name = file
            .file_stem()
            .unwrap_or_else(|| file.as_os_str())
            .to_os_string();
        name.push(".html");

        let mut out = output_root.join(relative.parent().unwrap_or_else(|| Path::new("")));
        out.push(name);
        out
    }
}

fn collect_dir(
    entries: fs::ReadDir,
    config: &BuildConfig,
    skip: Option<&Path>,
    files: &mut Vec<PathBuf>,
) {
    for entry in entries.filter_map(Result::ok) {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();

        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            if skip.is_some_and(|s| path.canonicalize().is_ok_and(|p| p == s)) {
                tracing::debug!(path = %path.display(), "Skipping output directory");
                continue;
            }
            match fs::read_dir(&path) {
                Ok(children) => collect_dir(children, config, skip, files),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Cannot read directory"),
            }
        } else if config.accepts(&path) {
            files.push(path);
        }
    }
}

/// Why one unit was not built.
#[derive(Debug, thiserror::Error)]
pub enum UnitFailure {
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Compile(#[from] UnitError),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another input earlier in the build maps to the same output file.
    #[error("Output {} is already produced by {}", path.display(), other.display())]
    OutputConflict { path: PathBuf, other: PathBuf },
}

/// A unit written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltUnit {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Size of the written document.
    pub bytes: usize,
}

/// A unit that failed, identified by its report path.
#[derive(Debug)]
pub struct FailedUnit {
    pub source: PathBuf,
    /// Path relative to the input root (or the file name).
    pub display_path: PathBuf,
    pub error: UnitFailure,
}

/// Outcome of a build, in input order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub built: Vec<BuiltUnit>,
    pub failed: Vec<FailedUnit>,
}

impl BuildReport {
    #[must_use]
    pub fn processed(&self) -> usize {
        self.built.len() + self.failed.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.built.len()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compiles collected inputs and writes the results under an output root.
pub struct Builder<'a> {
    compiler: Compiler<'a>,
    output_dir: PathBuf,
}

impl<'a> Builder<'a> {
    #[must_use]
    pub fn new(compiler: Compiler<'a>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            compiler,
            output_dir: output_dir.into(),
        }
    }

    /// Compile every input in parallel.
    ///
    /// A failing unit does not stop the others; its output file is not
    /// written. When several inputs map to the same output file, only the
    /// first in input order is built and the rest fail with
    /// [`UnitFailure::OutputConflict`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::OutputDir`] if the output root cannot be created.
    pub fn build(&self, inputs: &Inputs) -> Result<BuildReport, BuildError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| BuildError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        let planned: Vec<(&Path, PathBuf, Option<PathBuf>)> = inputs
            .files
            .iter()
            .map(|file| {
                let output = inputs.output_path(file, &self.output_dir);
                let conflict = match claimed.get(&output) {
                    Some(first) => Some(inputs.display_path(first)),
                    None => {
                        claimed.insert(output.clone(), file.as_path());
                        None
                    }
                };
                (file.as_path(), output, conflict)
            })
            .collect();

        let results: Vec<Result<BuiltUnit, FailedUnit>> = planned
            .into_par_iter()
            .map(|(file, output, conflict)| match conflict {
                Some(other) => Err(FailedUnit {
                    source: file.to_path_buf(),
                    display_path: inputs.display_path(file),
                    error: UnitFailure::OutputConflict {
                        path: output,
                        other,
                    },
                }),
                None => self.build_one(inputs, file, output),
            })
            .collect();

        let mut report = BuildReport::default();
        for result in results {
            match result {
                Ok(unit) => report.built.push(unit),
                Err(failed) => report.failed.push(failed),
            }
        }
        Ok(report)
    }

    fn build_one(
        &self,
        inputs: &Inputs,
        file: &Path,
        output: PathBuf,
    ) -> Result<BuiltUnit, FailedUnit> {
        let display_path = inputs.display_path(file);
        let fail = |error: UnitFailure| FailedUnit {
            source: file.to_path_buf(),
            display_path: display_path.clone(),
            error,
        };

        let text = fs::read_to_string(file).map_err(|source| {
            fail(UnitFailure::Read {
                path: file.to_path_buf(),
                source,
            })
        })?;
        let unit = SourceUnit::new(display_path.to_string_lossy(), text);

        let html = self
            .compiler
            .compile(&unit)
            .map_err(|e| fail(UnitFailure::Compile(e)))?;

        write_output(&output, &html).map_err(|source| {
            fail(UnitFailure::Write {
                path: output.clone(),
                source,
            })
        })?;

        tracing::info!(source = %display_path.display(), output = %output.display(), "Compiled");
        Ok(BuiltUnit {
            source: file.to_path_buf(),
            output,
            bytes: html.len(),
        })
    }
}

fn write_output(path: &Path, html: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)
}
