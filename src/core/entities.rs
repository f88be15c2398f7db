//! HTML Entity Decoding
//!
//! Handles decoding of character entities in text and attribute values:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Common HTML named entities: &nbsp; &copy; &mdash; ...
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present. Unknown or
//! malformed references pass through literally; dirty markup is never an
//! error.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    // Slow path: decode entities
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input
fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        if let Some(amp_pos) = memchr(b'&', &input[pos..]) {
            // Copy everything before the entity
            result.extend_from_slice(&input[pos..pos + amp_pos]);
            pos += amp_pos;

            // Find the semicolon
            if let Some(semi_offset) = memchr(b';', &input[pos..]) {
                let entity = &input[pos + 1..pos + semi_offset];

                if let Some(decoded) = decode_entity(entity) {
                    result.extend_from_slice(decoded.as_bytes());
                    pos += semi_offset + 1;
                } else {
                    // Unknown entity, keep as-is
                    result.push(b'&');
                    pos += 1;
                }
            } else {
                // No semicolon found, keep the ampersand
                result.push(b'&');
                pos += 1;
            }
        } else {
            // No more entities, copy the rest
            result.extend_from_slice(&input[pos..]);
            break;
        }
    }

    result
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &[u8]) -> Option<String> {
    if entity.is_empty() {
        return None;
    }

    // Numeric character reference
    if entity[0] == b'#' {
        return decode_numeric_entity(&entity[1..]);
    }

    // Named entity
    match entity {
        b"lt" => Some("<".to_string()),
        b"gt" => Some(">".to_string()),
        b"amp" => Some("&".to_string()),
        b"quot" => Some("\"".to_string()),
        b"apos" => Some("'".to_string()),
        // HTML named entities (common ones)
        b"nbsp" => Some("\u{00A0}".to_string()),
        b"copy" => Some("\u{00A9}".to_string()),
        b"reg" => Some("\u{00AE}".to_string()),
        b"trade" => Some("\u{2122}".to_string()),
        b"mdash" => Some("\u{2014}".to_string()),
        b"ndash" => Some("\u{2013}".to_string()),
        b"lsquo" => Some("\u{2018}".to_string()),
        b"rsquo" => Some("\u{2019}".to_string()),
        b"ldquo" => Some("\u{201C}".to_string()),
        b"rdquo" => Some("\u{201D}".to_string()),
        b"hellip" => Some("\u{2026}".to_string()),
        _ => None,
    }
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &[u8]) -> Option<String> {
    if entity.is_empty() {
        return None;
    }

    let codepoint = if entity[0] == b'x' || entity[0] == b'X' {
        // Hexadecimal: &#xHHHH;
        let hex = std::str::from_utf8(&entity[1..]).ok()?;
        u32::from_str_radix(hex, 16).ok()?
    } else {
        // Decimal: &#DDDD;
        let dec = std::str::from_utf8(entity).ok()?;
        dec.parse::<u32>().ok()?
    };

    char::from_u32(codepoint).map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let input = b"Hello, World!";
        let result = decode_text(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), b"Hello, World!");
    }

    #[test]
    fn test_basic_entities() {
        let input = b"&lt;b&gt; &amp; &quot;text&quot;";
        let result = decode_text(input);
        assert_eq!(result.as_ref(), b"<b> & \"text\"");
    }

    #[test]
    fn test_html_named_entities() {
        let result = decode_text(b"a&nbsp;b&mdash;c");
        assert_eq!(
            std::str::from_utf8(result.as_ref()).unwrap(),
            "a\u{00A0}b\u{2014}c"
        );
    }

    #[test]
    fn test_numeric_decimal() {
        let input = b"&#65;&#66;&#67;";
        let result = decode_text(input);
        assert_eq!(result.as_ref(), b"ABC");
    }

    #[test]
    fn test_numeric_hex() {
        let input = b"&#x41;&#x42;&#x43;";
        let result = decode_text(input);
        assert_eq!(result.as_ref(), b"ABC");
    }

    #[test]
    fn test_unknown_entity_kept() {
        let input = b"&unknown; and a bare & alone";
        let result = decode_text(input);
        assert_eq!(result.as_ref(), b"&unknown; and a bare & alone");
    }
}
