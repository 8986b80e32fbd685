//! Small HTML helpers shared by head synthesis and assembly.

/// Escape special HTML characters for text content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Replace the first `name=...` entry in a raw attribute list, or append.
///
/// Entries are raw strings like `lang="en"`; matching is by the `name=`
/// prefix.
pub fn set_attribute(attributes: &mut Vec<String>, name: &str, value: &str) {
    let entry = format!(r#"{name}="{}""#, escape_html(value));
    let prefix = format!("{name}=");
    match attributes.iter_mut().find(|a| a.starts_with(&prefix)) {
        Some(existing) => *existing = entry,
        None => attributes.push(entry),
    }
}

/// Render an opening tag with space-joined raw attributes.
pub(crate) fn open_tag(tag: &str, attributes: &[String]) -> String {
    if attributes.is_empty() {
        format!("<{tag}>")
    } else {
        format!("<{tag} {}>", attributes.join(" "))
    }
}
