use std::borrow::Cow;

#[inline]
fn needs_escape(byte: u8) -> bool {
    matches!(byte, b'"' | b'\\' | b'\x08' | b'\x0C' | b'\n' | b'\r' | b'\t')
}

/// Encode `value` as the body of a JSON string literal, without the surrounding quotes.
///
/// Only quotes, backslashes, and the five named control characters are escaped. Everything else,
/// including non-ASCII text, is written through as-is so that translated files stay readable
/// UTF-8 instead of becoming walls of `\uXXXX` sequences.
pub fn escape_json_str(value: &str) -> Cow<'_, str> {
    if !value.bytes().any(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\x08' => escaped.push_str("\\b"),
            '\x0C' => escaped.push_str("\\f"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

enum Escape {
    /// The sequence decoded to a character, consuming this many bytes after the backslash.
    Char(char, usize),
    /// The sequence is not understood and this many bytes after the backslash are kept verbatim,
    /// along with the backslash itself.
    Literal(usize),
}

fn parse_hex4(s: &str, at: usize) -> Option<u32> {
    let digits = s.as_bytes().get(at..at + 4)?;
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    // All four bytes are ASCII, so this slice is on char boundaries.
    u32::from_str_radix(&s[at..at + 4], 16).ok()
}

/// Decode the escape sequence at the start of `s`, which is the text immediately following a
/// backslash.
fn decode_escape(s: &str) -> Escape {
    let Some(next) = s.chars().next() else {
        return Escape::Literal(0);
    };
    match next {
        '"' | '\\' | '/' => Escape::Char(next, 1),
        'b' => Escape::Char('\x08', 1),
        'f' => Escape::Char('\x0C', 1),
        'n' => Escape::Char('\n', 1),
        'r' => Escape::Char('\r', 1),
        't' => Escape::Char('\t', 1),
        'u' => {
            let Some(first) = parse_hex4(s, 1) else {
                return Escape::Literal(1);
            };
            if (0xD800..=0xDBFF).contains(&first) && s.get(5..7) == Some("\\u") {
                if let Some(second) = parse_hex4(s, 7).filter(|c| (0xDC00..=0xDFFF).contains(c)) {
                    // Taken from serde_json: https://github.com/serde-rs/json/blob/1d7378e8ee87e9225da28094329e06345b76cd99/src/read.rs#L969
                    let combined = (((first - 0xD800) << 10) | (second - 0xDC00)) + 0x1_0000;
                    if let Some(ch) = char::from_u32(combined) {
                        return Escape::Char(ch, 11);
                    }
                }
            }
            match char::from_u32(first) {
                Some(ch) => Escape::Char(ch, 5),
                // Lone surrogates can't be represented in a `str`.
                None => Escape::Literal(5),
            }
        }
        other => Escape::Literal(other.len_utf8()),
    }
}

/// Decode the body of a JSON string literal into the logical text it represents.
///
/// This is intentionally lenient: an escape that isn't one of the JSON forms is kept in the output
/// exactly as written, backslash included, rather than being reported as an error. It is used to
/// recover key names from templates that are assumed to have been validated elsewhere.
pub fn unescape_json_str(raw: &str) -> Cow<'_, str> {
    let bytes = raw.as_bytes();
    let Some(first) = memchr::memchr(b'\\', bytes) else {
        return Cow::Borrowed(raw);
    };

    let mut unescaped = String::with_capacity(raw.len());
    let mut position = 0;
    let mut escape_start = first;
    loop {
        unescaped.push_str(&raw[position..escape_start]);
        let sequence_start = escape_start + 1;
        position = match decode_escape(&raw[sequence_start..]) {
            Escape::Char(ch, consumed) => {
                unescaped.push(ch);
                sequence_start + consumed
            }
            Escape::Literal(consumed) => {
                unescaped.push_str(&raw[escape_start..sequence_start + consumed]);
                sequence_start + consumed
            }
        };

        match memchr::memchr(b'\\', &bytes[position..]) {
            Some(offset) => escape_start = position + offset,
            None => break,
        }
    }
    unescaped.push_str(&raw[position..]);
    Cow::Owned(unescaped)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_escape_plain_text_is_borrowed() {
        assert!(matches!(escape_json_str("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    pub fn test_escape_named_characters() {
        assert_eq!(
            escape_json_str("a\"b\\c\x08\x0C\n\r\t"),
            r#"a\"b\\c\b\f\n\r\t"#
        );
    }

    #[test]
    pub fn test_escape_keeps_non_ascii() {
        assert_eq!(escape_json_str("こんにちは\n世界 🔈"), "こんにちは\\n世界 🔈");
    }

    #[test]
    pub fn test_escape_leaves_slash_and_other_controls() {
        assert_eq!(escape_json_str("a/b\x01"), "a/b\x01");
    }

    #[test]
    pub fn test_unescape_without_escapes_is_borrowed() {
        assert!(matches!(unescape_json_str("KEY_NAME"), Cow::Borrowed(_)));
    }

    #[test]
    pub fn test_unescape_ascii_escapes() {
        assert_eq!(unescape_json_str(r#"\n\t\f55\/\r\\\""#), "\n\t\x0C55/\r\\\"");
    }

    #[test]
    pub fn test_unescape_unicode() {
        assert_eq!(unescape_json_str(r"\u3053\u3093"), "こん");
        assert_eq!(unescape_json_str(r"speaker \uD83D\uDD08"), "speaker 🔈");
    }

    #[test]
    pub fn test_unescape_unknown_escape_is_literal() {
        assert_eq!(unescape_json_str(r"a\qb"), r"a\qb");
        assert_eq!(unescape_json_str(r"\é"), r"\é");
    }

    #[test]
    pub fn test_unescape_short_unicode_is_literal() {
        assert_eq!(unescape_json_str(r"\u12"), r"\u12");
        assert_eq!(unescape_json_str(r"\uZZZZ!"), r"\uZZZZ!");
    }

    #[test]
    pub fn test_unescape_lone_surrogate_is_literal() {
        assert_eq!(unescape_json_str(r"\uD83Dx"), r"\uD83Dx");
        assert_eq!(unescape_json_str(r"\uDD08"), r"\uDD08");
    }

    #[test]
    pub fn test_unescape_trailing_backslash() {
        assert_eq!(unescape_json_str("end\\"), "end\\");
    }

    #[test]
    pub fn test_escape_round_trip() {
        let samples = [
            "",
            "\"quoted\"",
            "back\\slash\\\\",
            "line\nbreak\r\n\ttab\x08\x0C",
            "日本語のテキスト「引用」",
            "mixed \\n literal and \n real",
            "emoji 🔈 and \u{7f}",
        ];
        for sample in samples {
            assert_eq!(unescape_json_str(&escape_json_str(sample)), sample);
        }
    }
}
