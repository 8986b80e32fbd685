//! Compilation errors.

use std::fmt;

use hsb_directive::{ArgumentError, ResolveError, ScanError};
use hsb_manifest::ManifestError;

/// Why a source unit could not be compiled.
///
/// Line numbers are 1-based and point into the original `.hsb` file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Missing marker line, or a directive the scanner cannot recognize.
    #[error("malformed unit: {message}")]
    MalformedUnit {
        message: String,
        line: Option<usize>,
    },

    #[error("invalid manifest: {message}")]
    ManifestSyntax {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("template `{name}` not found")]
    UnknownTemplate { name: String, line: usize },

    #[error("unknown special insertion keyword `{keyword}`")]
    UnknownKeyword { keyword: String, line: usize },

    #[error("invalid special insertion `{keyword}`: {source}")]
    InvalidArgument {
        keyword: String,
        #[source]
        source: ArgumentError,
        line: usize,
    },

    #[error("special insertion `{keyword}` failed: {message}")]
    HandlerFailed {
        keyword: String,
        message: String,
        line: usize,
    },
}

impl CompileError {
    /// Source line of the problem, when known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedUnit { line, .. } | Self::ManifestSyntax { line, .. } => *line,
            Self::UnknownTemplate { line, .. }
            | Self::UnknownKeyword { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::HandlerFailed { line, .. } => Some(*line),
        }
    }

    pub(crate) fn from_resolve(err: ResolveError, line: usize) -> Self {
        match err {
            ResolveError::UnknownKeyword(keyword) => Self::UnknownKeyword { keyword, line },
            ResolveError::InvalidArgument { keyword, source } => Self::InvalidArgument {
                keyword,
                source,
                line,
            },
            ResolveError::Failed { keyword, message } => Self::HandlerFailed {
                keyword,
                message,
                line,
            },
        }
    }
}

impl From<ScanError> for CompileError {
    fn from(err: ScanError) -> Self {
        Self::MalformedUnit {
            message: err.message,
            line: Some(err.line),
        }
    }
}

impl From<ManifestError> for CompileError {
    fn from(err: ManifestError) -> Self {
        Self::ManifestSyntax {
            message: err.message,
            line: err.line,
            column: err.column,
        }
    }
}

/// A [`CompileError`] tagged with the unit it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitError {
    pub unit: String,
    pub error: CompileError,
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error.line() {
            Some(line) => write!(f, "{}:{line}: {}", self.unit, self.error),
            None => write!(f, "{}: {}", self.unit, self.error),
        }
    }
}

impl std::error::Error for UnitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
