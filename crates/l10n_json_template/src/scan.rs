/// Return the index of the quote that closes the string literal opened by the quote at `open`.
///
/// A backslash always consumes the byte after it, so `\"` and runs of `\\` are handled without
/// tracking any extra state. Returns `None` when the literal is never closed.
pub fn find_string_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut position = open + 1;
    loop {
        let offset = memchr::memchr2(b'"', b'\\', bytes.get(position..)?)?;
        position += offset;
        if bytes[position] == b'"' {
            return Some(position);
        }
        position += 2;
    }
}

/// Return the index of the first byte at or after `from` that isn't JSON whitespace, or the length
/// of `bytes` if there is none.
#[inline]
pub fn next_non_whitespace(bytes: &[u8], from: usize) -> usize {
    let mut position = from;
    while position < bytes.len() && matches!(bytes[position], b' ' | b'\t' | b'\r' | b'\n') {
        position += 1;
    }
    position
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_simple_string() {
        let text = br#"{"KEY": "value"}"#;
        assert_eq!(find_string_end(text, 1), Some(5));
        assert_eq!(find_string_end(text, 8), Some(14));
    }

    #[test]
    pub fn test_escaped_quote_does_not_close() {
        let text = br#""say \"hi\"" "#;
        assert_eq!(find_string_end(text, 0), Some(11));
    }

    #[test]
    pub fn test_escaped_backslash_before_quote_closes() {
        let text = br#""dir\\" : 1"#;
        assert_eq!(find_string_end(text, 0), Some(6));
    }

    #[test]
    pub fn test_odd_backslash_run_escapes_quote() {
        let text = br#""a\\\"b""#;
        assert_eq!(find_string_end(text, 0), Some(7));
    }

    #[test]
    pub fn test_unterminated_string() {
        assert_eq!(find_string_end(br#""never closed"#, 0), None);
        assert_eq!(find_string_end(br#""ends in escape\"#, 0), None);
        assert_eq!(find_string_end(br#"""#, 0), None);
    }

    #[test]
    pub fn test_multibyte_content() {
        let text = "\"日本語\" :".as_bytes();
        assert_eq!(find_string_end(text, 0), Some(10));
    }

    #[test]
    pub fn test_next_non_whitespace() {
        let text = b"\"k\" \r\n\t : 1";
        assert_eq!(next_non_whitespace(text, 3), 8);
        assert_eq!(next_non_whitespace(text, 8), 8);
        assert_eq!(next_non_whitespace(b"   ", 0), 3);
        assert_eq!(next_non_whitespace(b"", 0), 0);
    }
}
