//! Final document layout.

use crate::Frontmatter;
use crate::html::open_tag;

pub const BODY_START_MARKER: &str = "<!-- START OF HSB TEXT -->";
pub const BODY_END_MARKER: &str = "<!-- END OF HSB TEXT -->";

/// Wrap a resolved body and synthesized head into a complete HTML document.
#[must_use]
pub fn assemble(frontmatter: &Frontmatter, body: &str) -> String {
    let html_tag = open_tag("html", &frontmatter.html_attributes);
    let body_tag = open_tag("body", &frontmatter.body_attributes);
    let head = &frontmatter.head;

    let mut out = String::with_capacity(head.len() + body.len() + 256);
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&html_tag);
    out.push_str("\n<head>");
    out.push_str(head);
    out.push_str("\n</head>\n");
    out.push_str(&body_tag);
    out.push_str("\n\n");
    out.push_str(BODY_START_MARKER);
    out.push('\n');
    out.push_str(body);
    out.push('\n');
    out.push_str(BODY_END_MARKER);
    out.push_str("\n\n</body>\n</html>");
    out
}
