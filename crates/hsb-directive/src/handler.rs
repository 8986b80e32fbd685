//! Special insertion handler trait.
//!
//! Special insertions use the `<!--$_KEYWORD key="value"-->` syntax.

use std::fmt;

use crate::DirectiveArgs;

/// Context handed to a handler while rendering one directive.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Identity of the source unit being compiled (usually its path).
    pub unit: &'a str,
    /// 1-based source line of the directive.
    pub line: usize,
}

/// Handler for special insertions: `<!--$_KEYWORD key="value"-->`
///
/// Handlers are registered once per process in a
/// [`HandlerRegistry`](crate::HandlerRegistry) and shared by every
/// compilation, so they take `&self` and must be `Send + Sync`.
///
/// The default [`validate`](Self::validate) accepts exactly the names listed
/// by [`accepted_args`](Self::accepted_args) and
/// [`required_args`](Self::required_args), and requires the latter.
///
/// # Example
///
/// ```
/// use hsb_directive::{DirectiveArgs, HandlerContext, HandlerError, SpecialHandler};
///
/// struct Email;
///
/// impl SpecialHandler for Email {
///     fn keyword(&self) -> &str { "EMAIL" }
///     fn required_args(&self) -> &[&str] { &["user", "domain"] }
///
///     fn render(&self, args: &DirectiveArgs, _ctx: &HandlerContext<'_>) -> Result<String, HandlerError> {
///         let user = args.get("user").unwrap_or_default();
///         let domain = args.get("domain").unwrap_or_default();
///         Ok(format!(r#"<a href="mailto:{user}@{domain}">{user}@{domain}</a>"#))
///     }
/// }
/// ```
pub trait SpecialHandler: Send + Sync {
    /// Keyword matched against `<!--$_KEYWORD ...-->`. Case-sensitive.
    fn keyword(&self) -> &str;

    /// Optional argument names.
    fn accepted_args(&self) -> &[&str] {
        &[]
    }

    /// Argument names that must be present.
    fn required_args(&self) -> &[&str] {
        &[]
    }

    /// Check the supplied arguments before rendering.
    ///
    /// # Errors
    ///
    /// Returns the first unexpected argument in source order, then the first
    /// missing required argument.
    fn validate(&self, args: &DirectiveArgs) -> Result<(), ArgumentError> {
        let required = self.required_args();
        let accepted = self.accepted_args();

        if let Some(name) = args
            .names()
            .find(|name| !required.contains(name) && !accepted.contains(name))
        {
            return Err(ArgumentError::new(name, ArgumentProblem::Unexpected));
        }

        if let Some(name) = required.iter().find(|name| args.get(name).is_none()) {
            return Err(ArgumentError::new(*name, ArgumentProblem::Missing));
        }

        Ok(())
    }

    /// Render the directive to HTML. Called only after [`validate`](Self::validate) passed.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if an argument value is unusable or the
    /// handler cannot produce output.
    fn render(&self, args: &DirectiveArgs, ctx: &HandlerContext<'_>) -> Result<String, HandlerError>;
}

/// What is wrong with an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentProblem {
    /// The handler does not know this argument.
    Unexpected,
    /// A required argument was not supplied.
    Missing,
    /// The value was rejected.
    Invalid(String),
}

/// An argument rejected by a handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("argument `{name}` {problem}")]
pub struct ArgumentError {
    pub name: String,
    pub problem: ArgumentProblem,
}

impl ArgumentError {
    pub fn new(name: impl Into<String>, problem: ArgumentProblem) -> Self {
        Self {
            name: name.into(),
            problem,
        }
    }

    /// Shorthand for an [`ArgumentProblem::Invalid`] error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(name, ArgumentProblem::Invalid(reason.into()))
    }
}

impl fmt::Display for ArgumentProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unexpected => f.write_str("is not accepted"),
            Self::Missing => f.write_str("is required"),
            Self::Invalid(reason) => write!(f, "is invalid: {reason}"),
        }
    }
}

/// Error returned from [`SpecialHandler::render`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),
    #[error("{0}")]
    Failed(String),
}
