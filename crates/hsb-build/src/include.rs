//! Built-in `INCLUDE` special insertion.

use std::fs;
use std::path::{Component, Path, PathBuf};

use hsb_directive::{ArgumentError, DirectiveArgs, HandlerContext, HandlerError, SpecialHandler};

/// `<!--$_INCLUDE file="partials/card.html"-->`
///
/// Inserts a file from inside the template directory, verbatim. Paths are
/// relative to that directory and may not leave it.
#[derive(Debug, Clone)]
pub struct IncludeHandler {
    root: PathBuf,
}

impl IncludeHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, file: &str) -> Result<PathBuf, ArgumentError> {
        let relative = Path::new(file);
        if file.is_empty() {
            return Err(ArgumentError::invalid("file", "must not be empty"));
        }
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ArgumentError::invalid(
                "file",
                format!("`{file}` is outside the template directory"),
            ));
        }

        let path = self.root.join(relative);
        // Symlinks may still point elsewhere.
        if let (Ok(root), Ok(resolved)) = (self.root.canonicalize(), path.canonicalize())
            && !resolved.starts_with(&root)
        {
            return Err(ArgumentError::invalid(
                "file",
                format!("`{file}` is outside the template directory"),
            ));
        }
        Ok(path)
    }
}

impl SpecialHandler for IncludeHandler {
    fn keyword(&self) -> &'static str {
        "INCLUDE"
    }

    fn required_args(&self) -> &[&str] {
        &["file"]
    }

    fn render(&self, args: &DirectiveArgs, ctx: &HandlerContext<'_>) -> Result<String, HandlerError> {
        let file = args.get("file").unwrap_or_default();
        let path = self.resolve(file)?;
        tracing::debug!(unit = ctx.unit, line = ctx.line, path = %path.display(), "Including file");
        fs::read_to_string(&path)
            .map_err(|e| HandlerError::Failed(format!("cannot read {}: {e}", path.display())))
    }
}
