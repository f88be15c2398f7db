//! Attribute Parsing
//!
//! Parses name/value pairs from a start tag's raw interior. Tolerant of
//! real-world markup: single-quoted, double-quoted, unquoted, and
//! valueless attributes are all accepted.

use super::entities::decode_text;
use std::borrow::Cow;

/// A parsed attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name as written in the tag
    pub name: &'a [u8],
    /// Attribute value (entities decoded); empty for valueless attributes
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        // Skip whitespace
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() {
            break;
        }

        // Check for end of attributes (/ or >)
        if input[pos] == b'/' || input[pos] == b'>' {
            break;
        }

        // Parse attribute name
        let name_start = pos;

        if !is_name_start_char(input[pos]) {
            pos += 1;
            continue;
        }

        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }

        let name = &input[name_start..pos];

        // Skip whitespace around '='
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() || input[pos] != b'=' {
            // Attribute without value (HTML boolean attributes)
            attrs.push(Attribute {
                name,
                value: Cow::Borrowed(b""),
            });
            continue;
        }

        pos += 1; // Skip '='

        // Skip whitespace
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() {
            attrs.push(Attribute {
                name,
                value: Cow::Borrowed(b""),
            });
            break;
        }

        // Parse attribute value
        let quote = input[pos];
        if quote != b'"' && quote != b'\'' {
            // Unquoted value (non-standard but handle it)
            let value_start = pos;
            while pos < input.len()
                && !is_whitespace(input[pos])
                && input[pos] != b'/'
                && input[pos] != b'>'
            {
                pos += 1;
            }
            attrs.push(Attribute {
                name,
                value: decode_text(&input[value_start..pos]),
            });
            continue;
        }

        pos += 1; // Skip opening quote
        let value_start = pos;

        // Find closing quote
        while pos < input.len() && input[pos] != quote {
            pos += 1;
        }

        attrs.push(Attribute {
            name,
            value: decode_text(&input[value_start..pos]),
        });

        if pos < input.len() {
            pos += 1; // Skip closing quote
        }
    }

    attrs
}

/// Check if byte can start an attribute name
#[inline]
fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Check if byte is whitespace
#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Check if byte is valid in an attribute name
#[inline]
fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_attributes() {
        let attrs = parse_attributes(b" id=\"test\" class=\"foo\"");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("test"));
        assert_eq!(attrs[1].name_str(), Some("class"));
        assert_eq!(attrs[1].value_str(), Some("foo"));
    }

    #[test]
    fn test_single_quoted() {
        let attrs = parse_attributes(b" id='test'");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value_str(), Some("test"));
    }

    #[test]
    fn test_unquoted_value() {
        let attrs = parse_attributes(b" width=100% border=0/");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].value_str(), Some("100%"));
        assert_eq!(attrs[1].value_str(), Some("0"));
    }

    #[test]
    fn test_valueless_attribute() {
        let attrs = parse_attributes(b" checked disabled");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name_str(), Some("checked"));
        assert_eq!(attrs[0].value_str(), Some(""));
        assert_eq!(attrs[1].name_str(), Some("disabled"));
    }

    #[test]
    fn test_entity_in_value() {
        let attrs = parse_attributes(b" title=\"&lt;hello&gt;\"");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value_str(), Some("<hello>"));
    }

    #[test]
    fn test_duplicate_names_kept_in_order() {
        let attrs = parse_attributes(b" href=\"first\" href=\"second\"");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].value_str(), Some("first"));
        assert_eq!(attrs[1].value_str(), Some("second"));
    }

    #[test]
    fn test_empty_attributes() {
        let attrs = parse_attributes(b"");
        assert_eq!(attrs.len(), 0);
    }

    #[test]
    fn test_whitespace_handling() {
        let attrs = parse_attributes(b"  id  =  \"test\"  ");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("test"));
    }
}
