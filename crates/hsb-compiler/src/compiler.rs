//! Compilation of one source unit.

use std::borrow::Cow;
use std::collections::HashMap;

use hsb_directive::{
    BodyFragment, DirectiveArgs, Fragment, HandlerContext, HandlerRegistry, TemplateProvider, scan,
};

use crate::{CompileError, SourceUnit, UnitError, assemble, synthesize};

/// Compiles source units against a shared template provider and handler
/// registry.
///
/// The compiler holds only shared references, so one instance can be used
/// from many threads at once.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use hsb_compiler::{Compiler, SourceUnit};
/// use hsb_directive::HandlerRegistry;
///
/// let mut templates = HashMap::new();
/// templates.insert("footer".to_owned(), "<footer>&copy;</footer>".to_owned());
/// let handlers = HandlerRegistry::new();
///
/// let compiler = Compiler::new(&templates, &handlers);
/// let unit = SourceUnit::new("index.hsb", "title: Home\nend of manifest\n<p>Hi</p>\n<!--$^footer-->");
/// let html = compiler.compile(&unit).unwrap();
///
/// assert!(html.contains("<title>Home</title>"));
/// assert!(html.contains("<p>Hi</p>\n<footer>&copy;</footer>"));
/// ```
#[derive(Clone, Copy)]
pub struct Compiler<'a> {
    templates: &'a dyn TemplateProvider,
    handlers: &'a HandlerRegistry,
}

impl<'a> Compiler<'a> {
    #[must_use]
    pub fn new(templates: &'a dyn TemplateProvider, handlers: &'a HandlerRegistry) -> Self {
        Self {
            templates,
            handlers,
        }
    }

    /// Compile a unit into a complete HTML document.
    ///
    /// Either the whole document is produced or nothing is: the first
    /// failing step aborts the unit.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError`] wrapping the [`CompileError`] that stopped the
    /// compilation.
    pub fn compile(&self, unit: &SourceUnit) -> Result<String, UnitError> {
        self.compile_unit(unit).map_err(|error| UnitError {
            unit: unit.id.clone(),
            error,
        })
    }

    fn compile_unit(&self, unit: &SourceUnit) -> Result<String, CompileError> {
        let parts = unit.split()?;

        let manifest = hsb_manifest::decode(parts.manifest)?;
        tracing::debug!(
            unit = %unit.id,
            keys = ?manifest.present_keys(),
            extras = manifest.extras.len(),
            "Decoded manifest"
        );

        let fragments = scan(parts.body, parts.body_line)?;
        let body = self.resolve_body(&unit.id, &fragments)?;

        let frontmatter = synthesize(&manifest);
        Ok(assemble(&frontmatter, &body))
    }

    /// Concatenate fragments with every directive replaced by its HTML.
    fn resolve_body(&self, unit: &str, fragments: &[Fragment<'_>]) -> Result<String, CompileError> {
        let mut templates: HashMap<&str, &str> = HashMap::new();
        let mut out = String::new();

        for fragment in fragments {
            match &fragment.kind {
                BodyFragment::Literal(text) => out.push_str(text),
                BodyFragment::TemplateRef(name) => {
                    let content = match templates.get(name) {
                        Some(content) => *content,
                        None => {
                            let content = self.templates.template(name).ok_or_else(|| {
                                CompileError::UnknownTemplate {
                                    name: (*name).to_owned(),
                                    line: fragment.line,
                                }
                            })?;
                            templates.insert(*name, content);
                            content
                        }
                    };
                    tracing::debug!(
                        unit,
                        line = fragment.line,
                        template = %name,
                        indent = fragment.indent.len(),
                        "Applied template"
                    );
                    out.push_str(&reindent(content, fragment.indent));
                }
                BodyFragment::SpecialRef { keyword, args } => {
                    let html = self.resolve_special(unit, keyword, args, fragment.line)?;
                    out.push_str(&reindent(&html, fragment.indent));
                }
            }
        }

        Ok(out)
    }

    fn resolve_special(
        &self,
        unit: &str,
        keyword: &str,
        args: &DirectiveArgs,
        line: usize,
    ) -> Result<String, CompileError> {
        let ctx = HandlerContext { unit, line };
        let html = self
            .handlers
            .resolve(keyword, args, &ctx)
            .map_err(|e| CompileError::from_resolve(e, line))?;
        tracing::debug!(
            unit,
            line,
            keyword,
            args = ?args.names().collect::<Vec<_>>(),
            "Applied special insertion"
        );
        Ok(html)
    }
}

/// Prefix every line after the first with `indent`.
fn reindent<'c>(content: &'c str, indent: &str) -> Cow<'c, str> {
    if indent.is_empty() || !content.contains('\n') {
        return Cow::Borrowed(content);
    }
    Cow::Owned(content.replace('\n', &format!("\n{indent}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsb_directive::{ArgumentError, HandlerError, SpecialHandler};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Year;

    impl SpecialHandler for Year {
        fn keyword(&self) -> &'static str {
            "YEAR"
        }

        fn render(
            &self,
            _args: &DirectiveArgs,
            _ctx: &HandlerContext<'_>,
        ) -> Result<String, HandlerError> {
            Ok("2024".to_owned())
        }
    }

    struct Quote;

    impl SpecialHandler for Quote {
        fn keyword(&self) -> &'static str {
            "QUOTE"
        }

        fn required_args(&self) -> &[&str] {
            &["text"]
        }

        fn accepted_args(&self) -> &[&str] {
            &["by"]
        }

        fn render(
            &self,
            args: &DirectiveArgs,
            ctx: &HandlerContext<'_>,
        ) -> Result<String, HandlerError> {
            let text = args.get("text").unwrap_or_default();
            if text.is_empty() {
                return Err(ArgumentError::invalid("text", "must not be empty").into());
            }
            if text == "fail" {
                return Err(HandlerError::Failed(format!("cannot quote at {}", ctx.line)));
            }
            let by = args.get("by").unwrap_or("anon");
            Ok(format!("<blockquote>\n<p>{text}</p>\n<cite>{by}</cite>\n</blockquote>"))
        }
    }

    /// Counts lookups to check per-compilation caching.
    struct Counting {
        lookups: AtomicUsize,
    }

    impl TemplateProvider for Counting {
        fn template(&self, name: &str) -> Option<&str> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            (name == "nav").then_some("<nav>\n<a href=\"/\">Home</a>\n</nav>")
        }
    }

    fn templates() -> HashMap<String, String> {
        [
            ("header", "<header>Site</header>"),
            ("nav", "<nav>\n<a href=\"/\">Home</a>\n</nav>"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
    }

    fn handlers() -> HandlerRegistry {
        HandlerRegistry::new().with(Year).with(Quote)
    }

    fn compile(text: &str) -> Result<String, UnitError> {
        let templates = templates();
        let handlers = handlers();
        Compiler::new(&templates, &handlers).compile(&SourceUnit::new("page.hsb", text))
    }

    fn body_of(doc: &str) -> &str {
        let start = doc.find("<!-- START OF HSB TEXT -->\n").unwrap() + 27;
        let end = doc.rfind("\n<!-- END OF HSB TEXT -->").unwrap();
        &doc[start..end]
    }

    #[test]
    fn test_directive_free_body_verbatim() {
        let body = "<main>\n  <!-- note -->\n  <p>a &amp; b</p>\n</main>\n";
        let doc = compile(&format!("title: X\nend of manifest\n{body}")).unwrap();
        assert_eq!(body_of(&doc), body);
    }

    #[test]
    fn test_article_example() {
        let doc = compile(
            "title: \"T\"\nschema_org_type: \"Article\"\ncanonical: \"https://x/y\"\n\
             end of manifest\n<p>Hi</p>",
        )
        .unwrap();
        assert!(doc.contains("<title>T</title>"));
        assert!(doc.contains(r#""headline":"T""#));
        assert!(doc.contains(r#""mainEntityOfPage":{"@type":"WebPage","@id":"https://x/y"}"#));
        assert_eq!(body_of(&doc), "<p>Hi</p>");
    }

    #[test]
    fn test_full_document_layout() {
        let doc = compile(
            "head_boilerplate: false\nno_frontmatter: true\ntitle: T\nlang: en\n\
             end of manifest\n<p>Hi</p>",
        )
        .unwrap();
        assert_eq!(
            doc,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\t<title>T</title>\n</head>\n<body>\n\n\
             <!-- START OF HSB TEXT -->\n<p>Hi</p>\n<!-- END OF HSB TEXT -->\n\n</body>\n</html>"
        );
    }

    #[test]
    fn test_template_insertion_reindents() {
        let doc = compile("end of manifest\n<body>\n  <!--$^nav-->\n</body>").unwrap();
        assert_eq!(
            body_of(&doc),
            "<body>\n  <nav>\n  <a href=\"/\">Home</a>\n  </nav>\n</body>"
        );
    }

    #[test]
    fn test_template_inline_not_reindented() {
        let doc = compile("end of manifest\n<div><!--$^nav--></div>").unwrap();
        assert_eq!(body_of(&doc), "<div><nav>\n<a href=\"/\">Home</a>\n</nav></div>");
    }

    #[test]
    fn test_unknown_template() {
        let err = compile("title: x\nend of manifest\n<p>a</p>\n<!--$^foo-->").unwrap_err();
        assert_eq!(err.unit, "page.hsb");
        assert_eq!(
            err.error,
            CompileError::UnknownTemplate {
                name: "foo".to_owned(),
                line: 4,
            }
        );
    }

    #[test]
    fn test_template_lookup_once_per_name() {
        let provider = Counting {
            lookups: AtomicUsize::new(0),
        };
        let handlers = HandlerRegistry::new();
        let compiler = Compiler::new(&provider, &handlers);
        let unit = SourceUnit::new(
            "a.hsb",
            "end of manifest\n<!--$^nav-->\n<!--$^nav-->\n<!--$^nav-->",
        );
        compiler.compile(&unit).unwrap();
        assert_eq!(provider.lookups.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_special_insertion() {
        let doc = compile("end of manifest\n<footer>&copy; <!--$_YEAR--></footer>").unwrap();
        assert_eq!(body_of(&doc), "<footer>&copy; 2024</footer>");
    }

    #[test]
    fn test_special_multiline_args_reindented() {
        let doc = compile(
            "end of manifest\n<section>\n    <!--$_QUOTE text=\"Hello\"\n        by=\"Ann\"\n    -->\n</section>",
        )
        .unwrap();
        assert_eq!(
            body_of(&doc),
            "<section>\n    <blockquote>\n    <p>Hello</p>\n    <cite>Ann</cite>\n    </blockquote>\n</section>"
        );
    }

    #[test]
    fn test_unknown_keyword() {
        let err = compile("end of manifest\n\n<!--$_NOPE-->").unwrap_err();
        assert_eq!(
            err.error,
            CompileError::UnknownKeyword {
                keyword: "NOPE".to_owned(),
                line: 3,
            }
        );
    }

    #[test]
    fn test_invalid_argument() {
        let err = compile("end of manifest\n<!--$_QUOTE by=\"Ann\"-->").unwrap_err();
        match err.error {
            CompileError::InvalidArgument {
                keyword,
                source,
                line,
            } => {
                assert_eq!(keyword, "QUOTE");
                assert_eq!(source.name, "text");
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }

        let err = compile("end of manifest\n<!--$_QUOTE text=\"\"-->").unwrap_err();
        assert!(matches!(err.error, CompileError::InvalidArgument { .. }));
    }

    #[test]
    fn test_handler_failed() {
        let err = compile("end of manifest\n<!--$_QUOTE text=\"fail\"-->").unwrap_err();
        assert_eq!(
            err.error,
            CompileError::HandlerFailed {
                keyword: "QUOTE".to_owned(),
                message: "cannot quote at 2".to_owned(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_unterminated_special() {
        let err = compile("end of manifest\n<!--$_KW a=\"1\"").unwrap_err();
        assert!(matches!(
            err.error,
            CompileError::MalformedUnit { line: Some(2), .. }
        ));
    }

    #[test]
    fn test_missing_marker() {
        let err = compile("<p>no manifest</p>").unwrap_err();
        assert!(matches!(err.error, CompileError::MalformedUnit { line: None, .. }));
    }

    #[test]
    fn test_manifest_syntax_error() {
        let err = compile("title: [unclosed\nend of manifest\n<p>x</p>").unwrap_err();
        assert!(matches!(err.error, CompileError::ManifestSyntax { .. }));
    }

    #[test]
    fn test_manifest_not_mapping() {
        let err = compile("- a\n- b\nend of manifest\n").unwrap_err();
        assert!(matches!(
            err.error,
            CompileError::ManifestSyntax { line: Some(1), .. }
        ));
    }

    #[test]
    fn test_later_marker_is_body_text() {
        let doc = compile("end of manifest\n<p>a</p>\nend of manifest").unwrap();
        assert_eq!(body_of(&doc), "<p>a</p>\nend of manifest");
    }

    #[test]
    fn test_reindent() {
        assert_eq!(reindent("a\nb\nc", "  "), "a\n  b\n  c");
        assert_eq!(reindent("a\nb", ""), "a\nb");
        assert!(matches!(reindent("single", "\t"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_compiler_is_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<Compiler<'static>>();
    }
}
