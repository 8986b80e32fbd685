//! Directive scanning.
//!
//! Splits an HSB body into literal spans and directive refs:
//! `<!--$^name-->` and `<!--$_KEYWORD key="value"...-->`.

use crate::{BodyFragment, DirectiveArgs, Fragment};

/// Comment opener shared by both directive kinds, up to the sigil.
const OPEN: &str = "<!--$";
const CLOSE: &str = "-->";
const TEMPLATE_SIGIL: char = '^';
const SPECIAL_SIGIL: char = '_';

/// A directive that cannot be recognized: unterminated, nameless, or with
/// malformed arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScanError {
    pub message: String,
    /// 1-based source line of the problem.
    pub line: usize,
}

/// Scan a body into fragments.
///
/// `first_line` is the source line number of the body's first line, so that
/// fragment lines and error lines point into the original file.
///
/// Comments without a recognized sigil stay inside literal spans. Joining
/// all literal spans with the original text of each directive reproduces
/// `body` exactly.
///
/// # Errors
///
/// Returns [`ScanError`] for a template insertion not closed on its own line,
/// a special insertion not closed before the end of the body, an empty
/// template name or keyword, or special arguments that are not `key="value"`
/// pairs.
pub fn scan(body: &str, first_line: usize) -> Result<Vec<Fragment<'_>>, ScanError> {
    let mut fragments = Vec::new();
    // Start of the pending literal span, and its line.
    let mut cursor = 0;
    let mut line = first_line;
    let mut search = 0;

    while let Some(found) = body[search..].find(OPEN) {
        let start = search + found;
        let after_open = start + OPEN.len();
        let directive_line = line + count_newlines(&body[cursor..start]);

        let (kind, end) = match body[after_open..].chars().next() {
            Some(TEMPLATE_SIGIL) => scan_template(body, after_open + 1, directive_line)?,
            Some(SPECIAL_SIGIL) => scan_special(body, after_open + 1, directive_line)?,
            _ => {
                search = after_open;
                continue;
            }
        };

        if start > cursor {
            fragments.push(Fragment::literal(&body[cursor..start], line));
        }
        fragments.push(Fragment {
            kind,
            line: directive_line,
            indent: line_indent(body, start),
        });

        line = directive_line + count_newlines(&body[start..end]);
        cursor = end;
        search = end;
    }

    if cursor < body.len() {
        fragments.push(Fragment::literal(&body[cursor..], line));
    }

    Ok(fragments)
}

/// Parse `name-->` starting right after `<!--$^`.
///
/// Returns the fragment and the byte offset just past `-->`.
fn scan_template(
    body: &str,
    name_start: usize,
    line: usize,
) -> Result<(BodyFragment<'_>, usize), ScanError> {
    let rest = &body[name_start..];
    let line_end = rest.find('\n').unwrap_or(rest.len());

    let Some(close) = rest[..line_end].find(CLOSE) else {
        return Err(ScanError {
            message: "unterminated template insertion: expected `-->` on the same line".to_owned(),
            line,
        });
    };

    let name = &rest[..close];
    if name.is_empty() {
        return Err(ScanError {
            message: "template insertion `<!--$^-->` has no template name".to_owned(),
            line,
        });
    }

    Ok((BodyFragment::TemplateRef(name), name_start + close + CLOSE.len()))
}

/// Parse `KEYWORD args-->` starting right after `<!--$_`.
///
/// Returns the fragment and the byte offset just past `-->`.
fn scan_special(
    body: &str,
    keyword_start: usize,
    line: usize,
) -> Result<(BodyFragment<'_>, usize), ScanError> {
    let rest = &body[keyword_start..];
    let keyword_len = [rest.find(char::is_whitespace), rest.find(CLOSE)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());
    let keyword = &rest[..keyword_len];

    let after_keyword = &rest[keyword_len..];
    let Some(close) = find_close(after_keyword) else {
        return Err(ScanError {
            message: format!(
                "unterminated special insertion `<!--$_{keyword}`: missing `-->` before end of input"
            ),
            line,
        });
    };

    if keyword.is_empty() {
        return Err(ScanError {
            message: "special insertion has no keyword".to_owned(),
            line,
        });
    }

    let args_text = &after_keyword[..close];
    let args = DirectiveArgs::parse(args_text).map_err(|e| ScanError {
        message: format!("invalid arguments for `{keyword}`: {e}"),
        line: line + count_newlines(&args_text[..e.offset]),
    })?;

    let end = keyword_start + keyword_len + close + CLOSE.len();
    Ok((BodyFragment::SpecialRef { keyword, args }, end))
}

/// Find `-->` outside double-quoted argument values.
fn find_close(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut in_quote = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quote => i += 1,
            b'"' => in_quote = !in_quote,
            b'-' if !in_quote && bytes[i..].starts_with(CLOSE.as_bytes()) => return Some(i),
            _ => {}
        }
        i += 1;
    }

    None
}

/// Whitespace-only prefix of the line containing `pos`, or `""`.
fn line_indent(body: &str, pos: usize) -> &str {
    let line_start = body[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &body[line_start..pos];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}

fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}
