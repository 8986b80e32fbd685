//! Template lookup for `<!--$^name-->` insertions.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only source of named HTML snippets.
///
/// Lookup is by exact, case-sensitive name. Providers are shared across
/// parallel compilations, hence `Sync`.
pub trait TemplateProvider: Sync {
    /// Content of the template called `name`, if any.
    fn template(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher + Sync> TemplateProvider for HashMap<String, String, S> {
    fn template(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl TemplateProvider for BTreeMap<String, String> {
    fn template(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: TemplateProvider + ?Sized> TemplateProvider for &T {
    fn template(&self, name: &str) -> Option<&str> {
        (**self).template(name)
    }
}
