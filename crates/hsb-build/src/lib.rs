//! Site building for HSB: template loading, the built-in `INCLUDE`
//! insertion, and parallel batch compilation.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use hsb_build::{Builder, IncludeHandler, Inputs, TemplateLibrary};
//! use hsb_compiler::Compiler;
//! use hsb_config::Config;
//! use hsb_directive::HandlerRegistry;
//!
//! let config = Config::load(None, None)?;
//! let build = &config.build_resolved;
//!
//! let templates = TemplateLibrary::load(&build.template_dir)?;
//! let handlers = HandlerRegistry::new().with(IncludeHandler::new(&build.template_dir));
//!
//! let inputs = Inputs::collect(Path::new("pages"), build)?;
//! let report = Builder::new(Compiler::new(&templates, &handlers), &build.output_dir)
//!     .build(&inputs)?;
//! println!("{} of {} built", report.succeeded(), report.processed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod batch;
mod include;
mod templates;

pub use batch::{BuildError, BuildReport, Builder, BuiltUnit, FailedUnit, Inputs, UnitFailure};
pub use include::IncludeHandler;
pub use templates::{LoadError, TemplateLibrary};
