//! Schema.org JSON-LD document built from a manifest.

use hsb_manifest::ManifestRecord;
use serde::Serialize;

const SCHEMA_CONTEXT: &str = "https://schema.org";
const DEFAULT_AUTHOR_TYPE: &str = "Person";
const DEFAULT_PUBLISHER_TYPE: &str = "Organization";

/// JSON-LD object. Field order is serialization order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    headline: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<Party<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publisher: Option<Party<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_published: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_modified: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    main_entity_of_page: Option<MainEntity<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    article_section: Option<&'a str>,
}

/// Author or publisher.
#[derive(Debug, Serialize)]
struct Party<'a> {
    #[serde(rename = "@type")]
    kind: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MainEntity<'a> {
    /// `main_entity_of_page` from the manifest, unmodified.
    Explicit(&'a serde_yaml::Value),
    WebPage {
        #[serde(rename = "@type")]
        kind: &'static str,
        #[serde(rename = "@id")]
        id: &'a str,
    },
}

impl<'a> JsonLd<'a> {
    /// Build the document, or `None` without a `schema_org_type`.
    pub(crate) fn from_manifest(manifest: &'a ManifestRecord) -> Option<Self> {
        let kind = manifest.schema_org_type.as_deref()?;
        let canonical = manifest.canonical.as_deref();

        let author = manifest.author.as_deref().map(|name| Party {
            kind: manifest
                .author_type
                .as_deref()
                .unwrap_or(DEFAULT_AUTHOR_TYPE),
            name,
            url: manifest.author_url.as_deref(),
        });
        let publisher = manifest.publisher.as_deref().map(|name| Party {
            kind: manifest
                .publisher_type
                .as_deref()
                .unwrap_or(DEFAULT_PUBLISHER_TYPE),
            name,
            url: manifest.publisher_url.as_deref(),
        });

        let main_entity_of_page = match &manifest.main_entity_of_page {
            Some(value) if !is_empty_value(value) => Some(MainEntity::Explicit(value)),
            _ => canonical.map(|id| MainEntity::WebPage {
                kind: "WebPage",
                id,
            }),
        };

        Some(Self {
            context: SCHEMA_CONTEXT,
            kind,
            headline: manifest.title.as_deref(),
            description: manifest.description.as_deref(),
            image: manifest.page_image.as_deref(),
            url: canonical,
            author,
            publisher,
            date_published: manifest.date_published.as_deref(),
            date_modified: manifest.date_modified.as_deref(),
            main_entity_of_page,
            article_section: manifest.article_section.as_deref(),
        })
    }

    /// Compact JSON safe to embed in a `<script>` element.
    pub(crate) fn to_script_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(json.replace("</", r"<\/"))
    }
}

fn is_empty_value(value: &serde_yaml::Value) -> bool {
    match value {
        serde_yaml::Value::Null => true,
        serde_yaml::Value::String(s) => s.is_empty(),
        serde_yaml::Value::Sequence(seq) => seq.is_empty(),
        serde_yaml::Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}
