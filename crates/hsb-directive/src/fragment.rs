//! Body fragments produced by the scanner.

use crate::DirectiveArgs;

/// One piece of an HSB body, in source order.
///
/// Literal spans and template names borrow from the scanned body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyFragment<'a> {
    /// Text copied to the output unchanged.
    Literal(&'a str),
    /// `<!--$^name-->`
    TemplateRef(&'a str),
    /// `<!--$_KEYWORD key="value"...-->`
    SpecialRef {
        keyword: &'a str,
        args: DirectiveArgs,
    },
}

/// A [`BodyFragment`] with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub kind: BodyFragment<'a>,
    /// 1-based source line where the fragment starts.
    pub line: usize,
    /// Whitespace between the start of the line and a directive, when nothing
    /// else precedes it on that line. Always empty for literals.
    pub indent: &'a str,
}

impl<'a> Fragment<'a> {
    pub(crate) fn literal(text: &'a str, line: usize) -> Self {
        Self {
            kind: BodyFragment::Literal(text),
            line,
            indent: "",
        }
    }

    /// Whether this fragment is a directive that needs resolving.
    #[must_use]
    pub fn is_ref(&self) -> bool {
        !matches!(self.kind, BodyFragment::Literal(_))
    }
}
