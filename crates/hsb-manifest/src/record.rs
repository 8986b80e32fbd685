//! Manifest record type.
//!
//! # Field groups
//!
//! - Basic page metadata: `title`, `description`, `keywords`, `canonical`,
//!   `robot_directives`
//! - Schema.org: `schema_org_type`, `author*`, `publisher*`, `date_*`,
//!   `article_section`, `main_entity_of_page`, `page_image`
//! - Social: `open_graph_type`, `site_name`, `twitter_user`
//! - Document structure: `lang`, `html_attributes`, `body_attributes`,
//!   `is_application`, `add_to_header`
//! - Switches: `head_boilerplate`, `no_frontmatter`

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::text;

/// Decoded manifest of one source unit.
///
/// Text fields are `None` when the key is absent, null, or an empty string.
/// Unrecognized keys land in [`extras`](Self::extras) and are otherwise inert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ManifestRecord {
    #[serde(deserialize_with = "text::opt_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub description: Option<String>,
    /// Comma-separated keywords. A YAML list is joined with `", "`.
    #[serde(deserialize_with = "text::opt_joined")]
    pub keywords: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub canonical: Option<String>,
    #[serde(alias = "robotDirectives", deserialize_with = "text::opt_text")]
    pub robot_directives: Option<String>,

    #[serde(deserialize_with = "text::opt_text")]
    pub author: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub author_type: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub author_url: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub publisher: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub publisher_type: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub publisher_url: Option<String>,
    /// Passed through verbatim; no date validation.
    #[serde(deserialize_with = "text::opt_text")]
    pub date_published: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub date_modified: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub article_section: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub schema_org_type: Option<String>,
    /// Explicit `mainEntityOfPage` value, emitted unmodified.
    pub main_entity_of_page: Option<serde_yaml::Value>,
    #[serde(deserialize_with = "text::opt_text")]
    pub page_image: Option<String>,

    #[serde(deserialize_with = "text::opt_text")]
    pub open_graph_type: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub site_name: Option<String>,
    #[serde(deserialize_with = "text::opt_text")]
    pub twitter_user: Option<String>,

    #[serde(deserialize_with = "text::opt_text")]
    pub lang: Option<String>,
    /// Raw attribute strings for `<html>`, e.g. `dir="ltr"`.
    #[serde(deserialize_with = "text::list")]
    pub html_attributes: Vec<String>,
    /// Raw attribute strings for `<body>`.
    #[serde(deserialize_with = "text::list")]
    pub body_attributes: Vec<String>,
    pub is_application: bool,
    /// Raw HTML appended to the head after everything else.
    #[serde(deserialize_with = "text::list")]
    pub add_to_header: Vec<String>,

    /// Emit charset/X-UA-Compatible/viewport tags (default true).
    pub head_boilerplate: bool,
    /// Suppress Schema.org, Open Graph and Twitter Card synthesis.
    pub no_frontmatter: bool,

    /// Unrecognized keys, preserved as parsed.
    #[serde(flatten)]
    pub extras: BTreeMap<String, serde_yaml::Value>,
}

impl Default for ManifestRecord {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            keywords: None,
            canonical: None,
            robot_directives: None,
            author: None,
            author_type: None,
            author_url: None,
            publisher: None,
            publisher_type: None,
            publisher_url: None,
            date_published: None,
            date_modified: None,
            article_section: None,
            schema_org_type: None,
            main_entity_of_page: None,
            page_image: None,
            open_graph_type: None,
            site_name: None,
            twitter_user: None,
            lang: None,
            html_attributes: Vec::new(),
            body_attributes: Vec::new(),
            is_application: false,
            add_to_header: Vec::new(),
            head_boilerplate: true,
            no_frontmatter: false,
            extras: BTreeMap::new(),
        }
    }
}

impl ManifestRecord {
    /// Individual keywords: `keywords` split on commas, trimmed, empties dropped.
    pub fn keyword_list(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Names of the recognized keys that hold a value, for diagnostics.
    #[must_use]
    pub fn present_keys(&self) -> Vec<&'static str> {
        let text_fields: [(&'static str, &Option<String>); 20] = [
            ("title", &self.title),
            ("description", &self.description),
            ("keywords", &self.keywords),
            ("canonical", &self.canonical),
            ("robot_directives", &self.robot_directives),
            ("author", &self.author),
            ("author_type", &self.author_type),
            ("author_url", &self.author_url),
            ("publisher", &self.publisher),
            ("publisher_type", &self.publisher_type),
            ("publisher_url", &self.publisher_url),
            ("date_published", &self.date_published),
            ("date_modified", &self.date_modified),
            ("article_section", &self.article_section),
            ("schema_org_type", &self.schema_org_type),
            ("page_image", &self.page_image),
            ("open_graph_type", &self.open_graph_type),
            ("site_name", &self.site_name),
            ("twitter_user", &self.twitter_user),
            ("lang", &self.lang),
        ];
        let mut keys: Vec<&'static str> = text_fields
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(key, _)| *key)
            .collect();
        if self.main_entity_of_page.is_some() {
            keys.push("main_entity_of_page");
        }
        if !self.html_attributes.is_empty() {
            keys.push("html_attributes");
        }
        if !self.body_attributes.is_empty() {
            keys.push("body_attributes");
        }
        if !self.add_to_header.is_empty() {
            keys.push("add_to_header");
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(yaml: &str) -> ManifestRecord {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let record = parse("title: Home\ntheme: dark\nnav:\n  - a\n  - b");
        assert_eq!(record.title.as_deref(), Some("Home"));
        assert_eq!(
            record.extras.get("theme"),
            Some(&serde_yaml::Value::String("dark".to_owned()))
        );
        assert!(record.extras.contains_key("nav"));
        assert!(!record.extras.contains_key("title"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let record = parse("Title: Home");
        assert!(record.title.is_none());
        assert!(record.extras.contains_key("Title"));
    }

    #[test]
    fn test_robot_directives_alias() {
        let record = parse("robotDirectives: noindex");
        assert_eq!(record.robot_directives.as_deref(), Some("noindex"));
    }

    #[test]
    fn test_scalar_values_become_text() {
        let record = parse("date_published: 2024-05-01\narticle_section: 42\ntitle: true");
        assert_eq!(record.date_published.as_deref(), Some("2024-05-01"));
        assert_eq!(record.article_section.as_deref(), Some("42"));
        assert_eq!(record.title.as_deref(), Some("true"));
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let record = parse("title: \"\"\ndescription:\ncanonical: '   '");
        assert!(record.title.is_none());
        assert!(record.description.is_none());
        assert!(record.canonical.is_none());
    }

    #[test]
    fn test_keywords_list_joined() {
        let record = parse("keywords:\n  - rust\n  - web");
        assert_eq!(record.keywords.as_deref(), Some("rust, web"));
    }

    #[test]
    fn test_keyword_list() {
        let record = parse("keywords: \"rust, web ,, static sites\"");
        let keywords: Vec<&str> = record.keyword_list().collect();
        assert_eq!(keywords, vec!["rust", "web", "static sites"]);
    }

    #[test]
    fn test_keyword_list_absent() {
        let record = ManifestRecord::default();
        assert_eq!(record.keyword_list().count(), 0);
    }

    #[test]
    fn test_attribute_string_or_list() {
        let record = parse("html_attributes: 'dir=\"ltr\"'\nbody_attributes:\n  - 'class=\"home\"'\n  - 'id=\"top\"'");
        assert_eq!(record.html_attributes, vec![r#"dir="ltr""#.to_owned()]);
        assert_eq!(
            record.body_attributes,
            vec![r#"class="home""#.to_owned(), r#"id="top""#.to_owned()]
        );
    }

    #[test]
    fn test_add_to_header_order() {
        let record = parse("add_to_header:\n  - '<link rel=\"icon\" href=\"/a.png\">'\n  - '<script src=\"/b.js\"></script>'");
        assert_eq!(record.add_to_header.len(), 2);
        assert!(record.add_to_header[0].contains("icon"));
        assert!(record.add_to_header[1].contains("b.js"));
    }

    #[test]
    fn test_main_entity_of_page_passthrough() {
        let record = parse("main_entity_of_page:\n  \"@type\": WebPage\n  \"@id\": https://a/b");
        let value = record.main_entity_of_page.unwrap();
        assert_eq!(
            value.get("@id"),
            Some(&serde_yaml::Value::String("https://a/b".to_owned()))
        );
    }

    #[test]
    fn test_present_keys() {
        let record = parse("title: A\nlang: en\nadd_to_header: '<meta>'");
        assert_eq!(record.present_keys(), vec!["title", "lang", "add_to_header"]);
    }
}
