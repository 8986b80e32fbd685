//! Template directory loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use hsb_directive::TemplateProvider;
use regex::Regex;

/// File names allowed for templates.
static TEMPLATE_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("invalid template name regex"));

/// Error returned when the template directory itself cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Template directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Template path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot read template directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Named HTML snippets loaded from a template directory.
///
/// Only immediate children are considered. `header.html` and `header.HTM`
/// are both loaded as `header`.
#[derive(Debug, Default, Clone)]
pub struct TemplateLibrary {
    dir: Option<PathBuf>,
    templates: BTreeMap<String, String>,
}

impl TemplateLibrary {
    /// Library with no templates and no directory.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `.html`/`.htm` file directly inside `dir`.
    ///
    /// Files with other extensions, names outside `[A-Za-z0-9_.-]`, and
    /// subdirectories are skipped. A template file that cannot be read is
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if `dir` is missing, not a directory, or cannot
    /// be listed.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        if !dir.exists() {
            return Err(LoadError::NotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(LoadError::NotADirectory(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut templates = BTreeMap::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                tracing::debug!(path = %path.display(), "Skipping template subdirectory");
                continue;
            }
            if !TEMPLATE_FILE_NAME.is_match(&file_name) {
                tracing::debug!(file = %file_name, "Skipping file with unsupported name");
                continue;
            }
            let Some(name) = template_name(&path) else {
                tracing::debug!(file = %file_name, "Skipping non-template file");
                continue;
            };

            match fs::read_to_string(&path) {
                Ok(content) => {
                    tracing::info!(template = %name, "Loaded template");
                    templates.insert(name, content);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot read template");
                }
            }
        }

        Ok(Self {
            dir: Some(dir.to_path_buf()),
            templates,
        })
    }

    /// Directory the templates came from.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Add or replace a template in memory.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.templates.insert(name.into(), content.into());
    }
}

impl TemplateProvider for TemplateLibrary {
    fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }
}

/// Stem of an `.html`/`.htm` file (extension matched case-insensitively).
fn template_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if ext != "html" && ext != "htm" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    (!stem.is_empty()).then(|| stem.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_templates() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("header.html"), "<header></header>").unwrap();
        fs::write(temp.path().join("footer.HTM"), "<footer></footer>").unwrap();
        fs::write(temp.path().join("site.nav-v2.html"), "<nav></nav>").unwrap();

        let library = TemplateLibrary::load(temp.path()).unwrap();

        assert_eq!(library.names().collect::<Vec<_>>(), vec!["footer", "header", "site.nav-v2"]);
        assert_eq!(library.template("header"), Some("<header></header>"));
        assert_eq!(library.template("footer"), Some("<footer></footer>"));
        assert_eq!(library.dir(), Some(temp.path()));
    }

    #[test]
    fn test_skips_other_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::write(temp.path().join("handler.py"), "x").unwrap();
        fs::write(temp.path().join("bad name.html"), "x").unwrap();
        fs::create_dir(temp.path().join("nested.html")).unwrap();
        fs::create_dir(temp.path().join("partials")).unwrap();
        fs::write(temp.path().join("partials/inner.html"), "x").unwrap();

        let library = TemplateLibrary::load(temp.path()).unwrap();

        assert!(library.is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("Header.html"), "A").unwrap();

        let library = TemplateLibrary::load(temp.path()).unwrap();

        assert_eq!(library.template("Header"), Some("A"));
        assert_eq!(library.template("header"), None);
    }

    #[test]
    fn test_load_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let err = TemplateLibrary::load(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_load_file_instead_of_dir() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("templates");
        fs::write(&file, "").unwrap();
        let err = TemplateLibrary::load(&file).unwrap_err();
        assert!(matches!(err, LoadError::NotADirectory(_)));
    }

    #[test]
    fn test_template_name() {
        assert_eq!(template_name(Path::new("a/b.html")), Some("b".to_owned()));
        assert_eq!(template_name(Path::new("b.Htm")), Some("b".to_owned()));
        assert_eq!(template_name(Path::new(".html")), None);
        assert_eq!(template_name(Path::new("b.xhtml")), None);
    }

    #[test]
    fn test_insert() {
        let mut library = TemplateLibrary::empty();
        library.insert("x", "<x/>");
        assert_eq!(library.len(), 1);
        assert_eq!(library.template("x"), Some("<x/>"));
    }
}
