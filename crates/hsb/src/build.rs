//! The build run: configuration, templates, compilation and reporting.

use std::path::{Path, PathBuf};

use hsb_build::{BuildReport, Builder, IncludeHandler, Inputs, TemplateLibrary};
use hsb_compiler::Compiler;
use hsb_config::{BuildConfig, CliSettings, Config};
use hsb_directive::HandlerRegistry;

use crate::error::CliError;
use crate::output::Output;

/// Options for one build run.
pub(crate) struct BuildArgs {
    pub input: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

impl BuildArgs {
    /// Run the build. Returns whether every unit succeeded.
    pub(crate) fn execute(self, output: &Output) -> Result<bool, CliError> {
        let cli_settings = CliSettings {
            template_dir: self.template_dir,
            output_dir: self.output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build = &config.build_resolved;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let templates = load_templates(build, output)?;
        let handlers = HandlerRegistry::new().with(IncludeHandler::new(&build.template_dir));

        let inputs = Inputs::collect(&self.input, build)?;
        if inputs.files.is_empty() {
            output.warning(&format!(
                "WARNING: No files with valid extensions found in directory: {}",
                self.input.display()
            ));
            return Ok(true);
        }
        if self.verbose && inputs.is_batch() {
            output.field("Batch processing mode:", &format!("{} file(s)", inputs.files.len()));
            output.field("Input directory:", &self.input.display().to_string());
            output.field("Output directory:", &build.output_dir.display().to_string());
        }

        let compiler = Compiler::new(&templates, &handlers);
        let report = Builder::new(compiler, &build.output_dir).build(&inputs)?;

        for failed in &report.failed {
            output.error(&format!("ERROR: {}", failed.error));
            output.warning(&format!("Skipping file: {}", failed.source.display()));
        }

        if inputs.is_batch() || inputs.files.len() > 1 {
            print_summary(output, &report);
        } else if let Some(built) = report.built.first() {
            print_single(output, &built.source, &built.output, built.bytes);
        }

        Ok(report.is_success())
    }
}

/// Load the configured template directory.
///
/// A missing default directory gives an empty library with a warning; a
/// missing explicit one is an error.
fn load_templates(build: &BuildConfig, output: &Output) -> Result<TemplateLibrary, CliError> {
    if !build.template_dir_explicit && !build.template_dir.is_dir() {
        output.warning(&format!(
            "WARNING: Template folder not found ({}), continuing without templates",
            build.template_dir.display()
        ));
        return Ok(TemplateLibrary::empty());
    }

    let templates = TemplateLibrary::load(&build.template_dir)?;
    tracing::info!(
        dir = %build.template_dir.display(),
        count = templates.len(),
        "Loaded templates"
    );
    Ok(templates)
}

fn print_single(output: &Output, source: &Path, target: &Path, bytes: usize) {
    output.separator();
    output.success("Page generation completed successfully!");
    output.separator();
    output.field("Input file: ", &source.display().to_string());
    output.field("Output file:", &target.display().to_string());
    output.field("Output size:", &format!("{bytes} bytes"));
    output.separator();
}

fn print_summary(output: &Output, report: &BuildReport) {
    output.info("");
    output.separator();
    output.highlight("BATCH PROCESSING SUMMARY");
    output.separator();
    output.field("Total Files:", &report.processed().to_string());
    output.count("Successful: ", report.succeeded(), true);
    output.count("Failed:     ", report.failed.len(), report.is_success());
    if !report.is_success() {
        output.rule();
        output.error("FAILED FILES:");
        for failed in &report.failed {
            output.info(&format!(" - {}", failed.display_path.display()));
        }
    }
    output.separator();
}
