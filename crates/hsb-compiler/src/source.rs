//! Source units and the manifest/body split.

use crate::CompileError;

/// Line separating the manifest from the body.
pub const MANIFEST_MARKER: &str = "end of manifest";

/// Raw text of one `.hsb` file plus its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Identity used in diagnostics, usually the source path.
    pub id: String,
    pub text: String,
}

/// Borrowed manifest and body regions of a [`SourceUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitUnit<'a> {
    /// Lines before the marker, including their line endings.
    pub manifest: &'a str,
    /// Everything after the marker line.
    pub body: &'a str,
    /// 1-based source line on which `body` starts.
    pub body_line: usize,
}

impl SourceUnit {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Split at the first line that reads exactly `end of manifest`.
    ///
    /// A trailing `\r` is ignored when matching. Later marker lines are
    /// ordinary body text.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MalformedUnit`] if no marker line exists.
    pub fn split(&self) -> Result<SplitUnit<'_>, CompileError> {
        let mut offset = 0;
        for (index, line) in self.text.split_inclusive('\n').enumerate() {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let content = content.strip_suffix('\r').unwrap_or(content);
            if content == MANIFEST_MARKER {
                return Ok(SplitUnit {
                    manifest: &self.text[..offset],
                    body: &self.text[offset + line.len()..],
                    body_line: index + 2,
                });
            }
            offset += line.len();
        }

        Err(CompileError::MalformedUnit {
            message: format!("missing `{MANIFEST_MARKER}` marker line"),
            line: None,
        })
    }
}
