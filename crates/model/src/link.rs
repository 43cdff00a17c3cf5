//! `Link` header values (RFC 8288).
//!
//! Only the subset LDP needs is supported: URI references in angle brackets
//! followed by `;`-separated parameters, with quoted or token values. Several
//! values may share one header line separated by commas, and several header
//! lines may be combined.

use std::fmt;

use crate::error::{ModelError, ModelResult};

/// A single link value: target plus parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    target: String,
    params: Vec<(String, String)>,
}

impl LinkValue {
    /// Creates a link to `target` with no parameters.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            params: Vec::new(),
        }
    }

    /// Creates a link to `target` with the given `rel`.
    pub fn with_rel(target: impl Into<String>, rel: impl Into<String>) -> Self {
        Self::new(target).param("rel", rel)
    }

    /// Adds a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    /// Returns the link target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the first value of the named parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if the `rel` parameter lists `rel`.
    ///
    /// Relation types are compared case-insensitively, and a `rel` may hold
    /// several space-separated relation types.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.get("rel")
            .map(|value| {
                value
                    .split_ascii_whitespace()
                    .any(|r| r.eq_ignore_ascii_case(rel))
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for LinkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.target)?;
        for (name, value) in &self.params {
            write!(f, "; {}=\"{}\"", name, value.replace('"', "\\\""))?;
        }
        Ok(())
    }
}

/// Parses one `Link` header line into its link values.
///
/// # Errors
///
/// Returns [`ModelError::InvalidLinkHeader`] if a value is not enclosed in
/// angle brackets, a quoted string is unterminated, or a parameter has no
/// name.
pub fn parse_link_header(header: &str) -> ModelResult<Vec<LinkValue>> {
    let mut cursor = Cursor::new(header);
    let mut links = Vec::new();

    loop {
        cursor.skip_while(|c| c.is_ascii_whitespace() || c == ',');
        if cursor.at_end() {
            break;
        }

        if !cursor.eat('<') {
            return Err(invalid(format!(
                "expected '<' at offset {}",
                cursor.offset()
            )));
        }
        let target = cursor
            .take_until('>')
            .ok_or_else(|| invalid("unterminated URI reference"))?;
        let mut link = LinkValue::new(target.trim());

        loop {
            cursor.skip_while(|c| c.is_ascii_whitespace());
            if cursor.at_end() || cursor.eat(',') {
                break;
            }
            if !cursor.eat(';') {
                return Err(invalid(format!(
                    "expected ';' or ',' at offset {}",
                    cursor.offset()
                )));
            }
            cursor.skip_while(|c| c.is_ascii_whitespace());
            let name = cursor.take_while(|c| !matches!(c, '=' | ';' | ',') && !c.is_ascii_whitespace());
            if name.is_empty() {
                // tolerate a trailing ';'
                continue;
            }
            cursor.skip_while(|c| c.is_ascii_whitespace());
            let value = if cursor.eat('=') {
                cursor.skip_while(|c| c.is_ascii_whitespace());
                if cursor.eat('"') {
                    cursor
                        .take_quoted()
                        .ok_or_else(|| invalid("unterminated quoted string"))?
                } else {
                    cursor.take_while(|c| !matches!(c, ';' | ',') && !c.is_ascii_whitespace())
                }
            } else {
                String::new()
            };
            link = link.param(name, value);
        }

        links.push(link);
    }

    Ok(links)
}

/// Parses every `Link` header line of a request.
pub fn parse_link_headers<'a, I>(headers: I) -> ModelResult<Vec<LinkValue>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut links = Vec::new();
    for header in headers {
        links.extend(parse_link_header(header)?);
    }
    Ok(links)
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidLinkHeader {
        message: message.into(),
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn offset(&self) -> usize {
        self.pos
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        self.skip_while(pred);
        self.input[start..self.pos].to_string()
    }

    fn take_until(&mut self, end: char) -> Option<String> {
        let rest = &self.input[self.pos..];
        let idx = rest.find(end)?;
        let taken = rest[..idx].to_string();
        self.pos += idx + end.len_utf8();
        Some(taken)
    }

    fn take_quoted(&mut self) -> Option<String> {
        let mut out = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek() {
            self.pos += c.len_utf8();
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                return Some(out);
            } else {
                out.push(c);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_type_link() {
        let links =
            parse_link_header("<http://www.w3.org/ns/ldp#IndirectContainer>;rel=\"type\"").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target(), "http://www.w3.org/ns/ldp#IndirectContainer");
        assert!(links[0].has_rel("type"));
    }

    #[test]
    fn test_parse_multiple_values_and_token_params() {
        let links = parse_link_header(
            "<http://www.w3.org/ns/ldp#Resource>; rel=type, <http://example.com/a,b>; rel=\"describedby\"; anchor=\"x\"",
        )
        .unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[0].has_rel("TYPE"));
        assert_eq!(links[1].target(), "http://example.com/a,b");
        assert!(links[1].has_rel("describedby"));
        assert_eq!(links[1].get("anchor"), Some("x"));
    }

    #[test]
    fn test_space_separated_relations() {
        let links = parse_link_header("<http://example.com/>; rel=\"type describedby\"").unwrap();
        assert!(links[0].has_rel("type"));
        assert!(links[0].has_rel("describedby"));
        assert!(!links[0].has_rel("next"));
    }

    #[test]
    fn test_malformed_link_is_rejected() {
        assert!(matches!(
            parse_link_header("http://www.w3.org/ns/ldp#Resource; rel=\"type\""),
            Err(ModelError::InvalidLinkHeader { .. })
        ));
        assert!(parse_link_header("<http://example.com/").is_err());
        assert!(parse_link_header("<http://example.com/>; rel=\"type").is_err());
    }

    #[test]
    fn test_display_renders_quoted_params() {
        let link = LinkValue::with_rel("http://www.w3.org/ns/ldp#Resource", "type");
        assert_eq!(
            link.to_string(),
            "<http://www.w3.org/ns/ldp#Resource>; rel=\"type\""
        );
    }

    #[test]
    fn test_combines_header_lines() {
        let links = parse_link_headers([
            "<http://www.w3.org/ns/ldp#Resource>; rel=\"type\"",
            "<http://example.com/c>; rel=\"acl\"",
        ])
        .unwrap();
        assert_eq!(links.len(), 2);
    }
}
