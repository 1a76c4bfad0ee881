//! Text decoding helpers.

use std::borrow::Cow;

use memchr::memmem;

/// How far into a page to look for a `<meta charset>` declaration.
const CHARSET_SNIFF_LEN: usize = 1024;

/// Decode bytes to a string, handling various encodings.
///
/// 1. UTF-8 first (a BOM is handled by encoding_rs)
/// 2. the hint encoding, usually from `<meta charset>`
/// 3. Windows-1252, the browser default for unlabeled legacy pages
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find the charset label in the first kilobyte of an HTML page.
///
/// Matches both `<meta charset="x">` and the `content="text/html; charset=x"`
/// form; the value ends at the first quote, semicolon, slash, `>` or space.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(CHARSET_SNIFF_LEN)];
    let lower = head.to_ascii_lowercase();

    let pos = memmem::find(&lower, b"charset=")?;
    let rest = &head[pos + b"charset=".len()..];
    let rest = rest
        .strip_prefix(b"\"")
        .or_else(|| rest.strip_prefix(b"'"))
        .unwrap_or(rest);
    let end = rest
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'/' | b'>') || b.is_ascii_whitespace())
        .unwrap_or(rest.len());

    let label = std::str::from_utf8(&rest[..end]).ok()?;
    (!label.is_empty()).then_some(label)
}
