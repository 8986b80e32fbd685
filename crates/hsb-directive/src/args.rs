//! Directive argument parsing.
//!
//! Parses the `key="value"` pairs of a special insertion:
//! `<!--$_KEYWORD key="value" other="x"-->`.

/// Parsed arguments of a special insertion, in source order.
///
/// # Example
///
/// ```
/// use hsb_directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("file=\"nav.html\"\n  class=\"main\"").unwrap();
/// assert_eq!(args.get("file"), Some("nav.html"));
/// assert_eq!(args.names().collect::<Vec<_>>(), vec!["file", "class"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveArgs {
    pairs: Vec<(String, String)>,
}

/// Argument text that is not a sequence of `key="value"` pairs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ArgsError {
    pub message: String,
    /// Byte offset into the parsed text where the problem starts.
    pub offset: usize,
}

impl DirectiveArgs {
    /// Parse argument text into ordered pairs.
    ///
    /// Pairs are separated by any whitespace, including newlines. Values are
    /// double-quoted; `\"` and `\\` are the only escapes, any other backslash
    /// is kept as written.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError`] for a missing `=`, an unquoted or unterminated
    /// value, an invalid or repeated key, or text glued to a closing quote.
    pub fn parse(text: &str) -> Result<Self, ArgsError> {
        let mut args = Self::default();
        let mut pos = 0;

        loop {
            pos += leading_whitespace(&text[pos..]);
            if pos >= text.len() {
                return Ok(args);
            }

            let rest = &text[pos..];
            let key_len = rest
                .find(|c: char| !is_key_char(c))
                .unwrap_or(rest.len());
            if key_len == 0 {
                return Err(ArgsError {
                    message: format!("expected an argument name, found {:?}", first_char(rest)),
                    offset: pos,
                });
            }
            let key = &rest[..key_len];
            pos += key_len;

            if !text[pos..].starts_with("=\"") {
                return Err(ArgsError {
                    message: format!("argument `{key}` must be written as {key}=\"value\""),
                    offset: pos,
                });
            }
            pos += 2;

            let (value, consumed) = parse_quoted(&text[pos..]).ok_or_else(|| ArgsError {
                message: format!("unterminated value for argument `{key}`"),
                offset: pos,
            })?;
            pos += consumed;

            if let Some(c) = text[pos..].chars().next()
                && !c.is_whitespace()
            {
                return Err(ArgsError {
                    message: format!("expected whitespace after argument `{key}`, found {c:?}"),
                    offset: pos,
                });
            }

            if args.get(key).is_some() {
                return Err(ArgsError {
                    message: format!("argument `{key}` given more than once"),
                    offset: pos - consumed - 2 - key_len,
                });
            }
            args.pairs.push((key.to_owned(), value));
        }
    }

    /// Get an argument value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Argument names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(key, _)| key.as_str())
    }

    /// Name/value pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DirectiveArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or(' ')
}

/// Read a quoted value after its opening quote.
///
/// Returns the unescaped value and the bytes consumed including the closing
/// quote, or `None` if the value never closes.
pub(crate) fn parse_quoted(s: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = s.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, i + 1)),
            '\\' => match chars.clone().next() {
                Some((_, escaped @ ('"' | '\\'))) => {
                    value.push(escaped);
                    chars.next();
                }
                _ => value.push('\\'),
            },
            _ => value.push(c),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_args() {
        let args = DirectiveArgs::parse("").unwrap();
        assert!(args.is_empty());
        let args = DirectiveArgs::parse("  \n\t ").unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_single_pair() {
        let args = DirectiveArgs::parse(r#" lang="en""#).unwrap();
        assert_eq!(args.get("lang"), Some("en"));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_pairs_across_lines() {
        let args = DirectiveArgs::parse("a=\"1\"\nb=\"2\"\n").unwrap();
        assert_eq!(args.iter().collect::<Vec<_>>(), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_order_preserved() {
        let args = DirectiveArgs::parse(r#"zeta="1" alpha="2" mid="3""#).unwrap();
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_value_with_spaces_and_newlines() {
        let args = DirectiveArgs::parse("title=\"Hello\n World\"").unwrap();
        assert_eq!(args.get("title"), Some("Hello\n World"));
    }

    #[test]
    fn test_empty_value() {
        let args = DirectiveArgs::parse(r#"alt="""#).unwrap();
        assert_eq!(args.get("alt"), Some(""));
    }

    #[test]
    fn test_escaped_quote() {
        let args = DirectiveArgs::parse(r#"text="say \"hi\"" path="C:\dir""#).unwrap();
        assert_eq!(args.get("text"), Some(r#"say "hi""#));
        assert_eq!(args.get("path"), Some(r"C:\dir"));
    }

    #[test]
    fn test_escaped_backslash() {
        let args = DirectiveArgs::parse(r#"a="x\\" b="y""#).unwrap();
        assert_eq!(args.get("a"), Some(r"x\"));
        assert_eq!(args.get("b"), Some("y"));
    }

    #[test]
    fn test_missing_quotes() {
        let err = DirectiveArgs::parse("width=560").unwrap_err();
        assert!(err.message.contains("width"));
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn test_bare_word() {
        let err = DirectiveArgs::parse(r#"a="1" flag"#).unwrap_err();
        assert!(err.message.contains("flag"));
    }

    #[test]
    fn test_unterminated_value() {
        let err = DirectiveArgs::parse(r#"a="1"#).unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_glued_pairs_rejected() {
        let err = DirectiveArgs::parse(r#"a="1"b="2""#).unwrap_err();
        assert!(err.message.contains("whitespace"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = DirectiveArgs::parse(r#"a="1" a="2""#).unwrap_err();
        assert!(err.message.contains("more than once"));
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn test_invalid_key_char() {
        let err = DirectiveArgs::parse(r#"="1""#).unwrap_err();
        assert!(err.message.contains("argument name"));
    }

    #[test]
    fn test_get_nonexistent() {
        let args = DirectiveArgs::parse(r#"foo="bar""#).unwrap();
        assert_eq!(args.get("baz"), None);
    }

    #[test]
    fn test_from_iter() {
        let args: DirectiveArgs = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(args.get("b"), Some("2"));
    }
}
