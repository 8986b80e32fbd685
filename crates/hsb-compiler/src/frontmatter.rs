//! Head synthesis from a decoded manifest.
//!
//! The head block is built in a fixed order:
//!
//! 1. Boilerplate (charset, X-UA-Compatible, viewport) unless
//!    `head_boilerplate: false`
//! 2. Basic tags: robots, title, description, keywords, canonical
//! 3. SEO metadata unless `no_frontmatter: true`: Schema.org JSON-LD,
//!    Open Graph, Twitter Card
//! 4. `add_to_header` entries, verbatim
//!
//! Every generated tag sits on its own line, indented by one tab.

use std::fmt::Write;

use hsb_manifest::ManifestRecord;

use crate::html::{escape_html, set_attribute};
use crate::jsonld::JsonLd;

const TWITTER_CARD_TYPE: &str = "summary_large_image";

/// Generated head block and attribute lists for `<html>` and `<body>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Head content placed between `<head>` and `</head>`.
    pub head: String,
    pub html_attributes: Vec<String>,
    pub body_attributes: Vec<String>,
}

/// Synthesize head metadata and structural attributes for a manifest.
///
/// Never fails: a JSON-LD block that cannot be serialized is logged and
/// left out.
#[must_use]
pub fn synthesize(manifest: &ManifestRecord) -> Frontmatter {
    let mut head = Head::default();

    if manifest.head_boilerplate {
        head.comment("[BASIC HEAD BOILERPLATE]");
        head.raw(r#"<meta charset="UTF-8">"#);
        head.raw(r#"<meta http-equiv="X-UA-Compatible" content="IE=edge">"#);
        head.raw(r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#);
    }

    basic_tags(&mut head, manifest);

    if !manifest.no_frontmatter {
        head.blank();
        head.comment("[SEO METADATA]");
        schema_org(&mut head, manifest);
        open_graph(&mut head, manifest);
        twitter_card(&mut head, manifest);
    }

    if !manifest.add_to_header.is_empty() {
        head.blank();
        for item in &manifest.add_to_header {
            head.raw(item);
        }
    }

    let mut html_attributes = manifest.html_attributes.clone();
    if let Some(lang) = manifest.lang.as_deref() {
        set_attribute(&mut html_attributes, "lang", lang);
    }

    let mut body_attributes = manifest.body_attributes.clone();
    if manifest.is_application {
        set_attribute(&mut body_attributes, "role", "application");
    }

    Frontmatter {
        head: head.0,
        html_attributes,
        body_attributes,
    }
}

fn basic_tags(head: &mut Head, manifest: &ManifestRecord) {
    if let Some(robots) = manifest.robot_directives.as_deref() {
        head.meta_name("robots", robots);
    }
    if let Some(title) = manifest.title.as_deref() {
        head.line(format_args!("<title>{}</title>", escape_html(title)));
    }
    if let Some(description) = manifest.description.as_deref() {
        head.meta_name("description", description);
    }
    if let Some(keywords) = manifest.keywords.as_deref() {
        head.meta_name("keywords", keywords);
    }
    if let Some(canonical) = manifest.canonical.as_deref() {
        head.line(format_args!(
            r#"<link rel="canonical" href="{}">"#,
            escape_html(canonical)
        ));
    }
}

fn schema_org(head: &mut Head, manifest: &ManifestRecord) {
    let Some(doc) = JsonLd::from_manifest(manifest) else {
        return;
    };
    match doc.to_script_json() {
        Ok(json) => head.line(format_args!(
            r#"<script type="application/ld+json">{json}</script>"#
        )),
        Err(e) => tracing::warn!(error = %e, "Skipping Schema.org JSON-LD"),
    }
}

fn open_graph(head: &mut Head, manifest: &ManifestRecord) {
    let Some(og_type) = manifest.open_graph_type.as_deref() else {
        return;
    };

    head.blank();
    head.comment("Open Graph (Facebook, LinkedIn, etc.)");
    head.meta_property_opt("og:title", manifest.title.as_deref());
    head.meta_property("og:type", og_type);
    head.meta_property_opt("og:url", manifest.canonical.as_deref());
    head.meta_property_opt("og:image", manifest.page_image.as_deref());
    head.meta_property_opt("og:description", manifest.description.as_deref());
    head.meta_property_opt("og:site_name", manifest.site_name.as_deref());

    if og_type == "article" {
        head.meta_property_opt(
            "article:published_time",
            manifest.date_published.as_deref(),
        );
        head.meta_property_opt("article:author", manifest.author.as_deref());
        head.meta_property_opt("article:section", manifest.article_section.as_deref());
        for tag in manifest.keyword_list() {
            head.meta_property("article:tag", tag);
        }
    }
}

fn twitter_card(head: &mut Head, manifest: &ManifestRecord) {
    head.blank();
    head.comment("Twitter Card");
    head.meta_name("twitter:card", TWITTER_CARD_TYPE);
    if let Some(title) = manifest.title.as_deref() {
        head.meta_name("twitter:title", title);
    }
    if let Some(description) = manifest.description.as_deref() {
        head.meta_name("twitter:description", description);
    }
    if let Some(image) = manifest.page_image.as_deref() {
        head.meta_name("twitter:image", image);
    }
    if let Some(user) = manifest.twitter_user.as_deref() {
        head.meta_name("twitter:site", user);
        head.meta_name("twitter:creator", user);
    }
}

/// Head content under construction.
#[derive(Default)]
struct Head(String);

impl Head {
    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        self.0.push_str("\n\t");
        // Writing to a String cannot fail.
        let _ = self.0.write_fmt(args);
    }

    fn raw(&mut self, html: &str) {
        self.0.push_str("\n\t");
        self.0.push_str(html);
    }

    fn blank(&mut self) {
        self.0.push('\n');
    }

    fn comment(&mut self, text: &str) {
        self.line(format_args!("<!-- {text} -->"));
    }

    fn meta_name(&mut self, name: &str, content: &str) {
        self.line(format_args!(
            r#"<meta name="{name}" content="{}">"#,
            escape_html(content)
        ));
    }

    fn meta_property(&mut self, property: &str, content: &str) {
        self.line(format_args!(
            r#"<meta property="{property}" content="{}">"#,
            escape_html(content)
        ));
    }

    fn meta_property_opt(&mut self, property: &str, content: Option<&str>) {
        if let Some(content) = content {
            self.meta_property(property, content);
        }
    }
}
