//! HSB compiler.
//!
//! Turns one `.hsb` source unit into a standalone HTML document:
//!
//! 1. [`SourceUnit::split`] divides the text at the `end of manifest` line.
//! 2. The manifest is decoded into a typed
//!    [`ManifestRecord`](hsb_manifest::ManifestRecord).
//! 3. The body is scanned into fragments and every directive is resolved
//!    against a [`TemplateProvider`](hsb_directive::TemplateProvider) or a
//!    [`HandlerRegistry`](hsb_directive::HandlerRegistry).
//! 4. [`synthesize`] builds the head block and `<html>`/`<body>` attributes.
//! 5. [`assemble`] lays out the final document.
//!
//! [`Compiler`] runs all of it and wraps failures in a [`UnitError`].
//! Compilation does no I/O; reading sources and writing output is up to
//! the caller.

mod assemble;
mod compiler;
mod error;
mod frontmatter;
mod html;
mod jsonld;
mod source;

pub use assemble::{BODY_END_MARKER, BODY_START_MARKER, assemble};
pub use compiler::Compiler;
pub use error::{CompileError, UnitError};
pub use frontmatter::{Frontmatter, synthesize};
pub use html::{escape_html, set_attribute};
pub use source::{MANIFEST_MARKER, SourceUnit, SplitUnit};
