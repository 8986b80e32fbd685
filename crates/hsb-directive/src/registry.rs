//! Keyword → handler registry for special insertions.

use std::collections::HashMap;

use crate::{ArgumentError, DirectiveArgs, HandlerContext, HandlerError, SpecialHandler};

/// Why a special insertion could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown special insertion keyword `{0}`")]
    UnknownKeyword(String),
    #[error("{keyword}: {source}")]
    InvalidArgument {
        keyword: String,
        #[source]
        source: ArgumentError,
    },
    #[error("{keyword}: {message}")]
    Failed { keyword: String, message: String },
}

/// Registered special insertion handlers.
///
/// Built once, then shared read-only across compilations. Registering a
/// keyword twice replaces the earlier handler.
///
/// # Example
///
/// ```
/// use hsb_directive::{DirectiveArgs, HandlerContext, HandlerError, HandlerRegistry, SpecialHandler};
///
/// struct Hr;
///
/// impl SpecialHandler for Hr {
///     fn keyword(&self) -> &str { "HR" }
///     fn render(&self, _: &DirectiveArgs, _: &HandlerContext<'_>) -> Result<String, HandlerError> {
///         Ok("<hr>".to_owned())
///     }
/// }
///
/// let registry = HandlerRegistry::new().with(Hr);
/// assert!(registry.contains("HR"));
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn SpecialHandler>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, builder style.
    #[must_use]
    pub fn with<H: SpecialHandler + 'static>(mut self, handler: H) -> Self {
        self.register(handler);
        self
    }

    /// Register a handler under its keyword.
    pub fn register<H: SpecialHandler + 'static>(&mut self, handler: H) {
        let keyword = handler.keyword().to_owned();
        if self
            .handlers
            .insert(keyword.clone(), Box::new(handler))
            .is_some()
        {
            tracing::warn!(keyword = %keyword, "Replacing previously registered handler");
        }
    }

    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.handlers.contains_key(keyword)
    }

    /// Registered keywords, sorted.
    #[must_use]
    pub fn keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keywords.sort_unstable();
        keywords
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Validate `args` against the keyword's handler and render it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownKeyword`] for unregistered keywords,
    /// [`ResolveError::InvalidArgument`] when validation or rendering rejects
    /// an argument, and [`ResolveError::Failed`] for other rendering failures.
    pub fn resolve(
        &self,
        keyword: &str,
        args: &DirectiveArgs,
        ctx: &HandlerContext<'_>,
    ) -> Result<String, ResolveError> {
        let handler = self
            .handlers
            .get(keyword)
            .ok_or_else(|| ResolveError::UnknownKeyword(keyword.to_owned()))?;

        handler
            .validate(args)
            .map_err(|source| ResolveError::InvalidArgument {
                keyword: keyword.to_owned(),
                source,
            })?;

        handler.render(args, ctx).map_err(|e| match e {
            HandlerError::InvalidArgument(source) => ResolveError::InvalidArgument {
                keyword: keyword.to_owned(),
                source,
            },
            HandlerError::Failed(message) => ResolveError::Failed {
                keyword: keyword.to_owned(),
                message,
            },
        })
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keywords", &self.keywords())
            .finish()
    }
}
