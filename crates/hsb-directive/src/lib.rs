//! Directive scanning and pluggable insertion handlers for HSB bodies.
//!
//! An HSB body is plain HTML with two kinds of directive comments:
//!
//! - **Template insertion**: `<!--$^name-->` is replaced by the template
//!   called `name` from a [`TemplateProvider`].
//! - **Special insertion**: `<!--$_KEYWORD key="value" ...-->` is rendered by
//!   the [`SpecialHandler`] registered for `KEYWORD` in a [`HandlerRegistry`].
//!   Arguments may span several lines.
//!
//! # Architecture
//!
//! Recognition and resolution are separate passes:
//!
//! 1. **Scanning** ([`scan`]): turns the body into an ordered list of
//!    [`Fragment`]s (literal spans and directive refs) without looking
//!    anything up.
//! 2. **Resolution**: the compiler walks the fragments and asks the template
//!    provider or the handler registry for each ref's HTML.
//!
//! # Example
//!
//! ```
//! use hsb_directive::{
//!     BodyFragment, DirectiveArgs, HandlerContext, HandlerError, HandlerRegistry,
//!     SpecialHandler, scan,
//! };
//!
//! struct Year;
//!
//! impl SpecialHandler for Year {
//!     fn keyword(&self) -> &str { "YEAR" }
//!
//!     fn render(&self, _args: &DirectiveArgs, _ctx: &HandlerContext<'_>) -> Result<String, HandlerError> {
//!         Ok("2024".to_owned())
//!     }
//! }
//!
//! let fragments = scan("<p>&copy; <!--$_YEAR--></p>", 1).unwrap();
//! assert!(matches!(fragments[1].kind, BodyFragment::SpecialRef { keyword: "YEAR", .. }));
//!
//! let registry = HandlerRegistry::new().with(Year);
//! let ctx = HandlerContext { unit: "index.hsb", line: 1 };
//! let html = registry.resolve("YEAR", &DirectiveArgs::default(), &ctx).unwrap();
//! assert_eq!(html, "2024");
//! ```

mod args;
mod fragment;
mod handler;
mod registry;
mod scanner;
mod template;

pub use args::{ArgsError, DirectiveArgs};
pub use fragment::{BodyFragment, Fragment};
pub use handler::{ArgumentError, ArgumentProblem, HandlerContext, HandlerError, SpecialHandler};
pub use registry::{HandlerRegistry, ResolveError};
pub use scanner::{ScanError, scan};
pub use template::TemplateProvider;
