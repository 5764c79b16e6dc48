use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::{TemplateError, TemplateResult};

/// Flat mapping of bare object keys to the translated string for that key.
pub type TranslationMap = FxHashMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexMode {
    Normal,
    LineComment,
    BlockComment,
    String { escaped: bool },
}

/// Strip a leading UTF-8 byte order mark, if present.
#[inline]
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Remove `// ...`, `## ...`, and `/* ... */` comments from `text`, leaving plain JSON behind.
///
/// Line comments keep their terminating newline and block comments keep any newlines they
/// contained, so line numbers in parser errors still point at the right place in the original
/// file. Anything inside a string literal is never treated as a comment, even when it looks like
/// one (`"http://..."`, `"/* not a comment */"`).
pub fn strip_json_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut stripped = String::with_capacity(text.len());
    let mut mode = LexMode::Normal;
    // Start of the run of bytes that will be copied once the next comment (or the end) is found.
    let mut kept_from = 0;
    let mut position = 0;

    while position < bytes.len() {
        let byte = bytes[position];
        let next = bytes.get(position + 1).copied();
        match mode {
            LexMode::String { escaped: true } => {
                mode = LexMode::String { escaped: false };
                position += 1;
            }
            LexMode::String { escaped: false } => {
                match byte {
                    b'\\' => mode = LexMode::String { escaped: true },
                    b'"' => mode = LexMode::Normal,
                    _ => {}
                }
                position += 1;
            }
            LexMode::LineComment => {
                if byte == b'\n' {
                    mode = LexMode::Normal;
                    kept_from = position;
                }
                position += 1;
            }
            LexMode::BlockComment => {
                if byte == b'*' && next == Some(b'/') {
                    mode = LexMode::Normal;
                    position += 2;
                    kept_from = position;
                } else {
                    if byte == b'\n' {
                        stripped.push('\n');
                    }
                    position += 1;
                }
            }
            LexMode::Normal => match (byte, next) {
                (b'"', _) => {
                    mode = LexMode::String { escaped: false };
                    position += 1;
                }
                (b'/', Some(b'/')) | (b'#', Some(b'#')) => {
                    stripped.push_str(&text[kept_from..position]);
                    mode = LexMode::LineComment;
                    position += 2;
                }
                (b'/', Some(b'*')) => {
                    stripped.push_str(&text[kept_from..position]);
                    mode = LexMode::BlockComment;
                    position += 2;
                }
                _ => position += 1,
            },
        }
    }

    if matches!(mode, LexMode::Normal | LexMode::String { .. }) {
        stripped.push_str(&text[kept_from..]);
    }
    stripped
}

/// Parse `text` as JSON after removing comments and a leading BOM. Trailing commas are still
/// rejected.
pub fn parse_relaxed_json(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(&strip_json_comments(strip_bom(text)))
}

pub(crate) fn read_text_file(path: &Path) -> TemplateResult<String> {
    fs::read_to_string(path).map_err(|source| TemplateError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a commented JSON file, returning any read or parse failure to the caller.
pub fn read_relaxed_json_file(path: &Path) -> TemplateResult<Value> {
    let text = read_text_file(path)?;
    parse_relaxed_json(&text).map_err(|source| TemplateError::Parse {
        origin: path.display().to_string(),
        source,
    })
}

/// Like [read_relaxed_json_file], but for informational callers that would rather carry on
/// without the document. Failures are logged as warnings and yield `None`.
pub fn read_relaxed_json_file_lenient(path: &Path) -> Option<Value> {
    match read_relaxed_json_file(path) {
        Ok(value) => Some(value),
        Err(error) => {
            log::warn!("{error}");
            None
        }
    }
}

fn collect_into(value: &Value, map: &mut TranslationMap) {
    match value {
        Value::Object(object) => {
            for (key, value) in object {
                match value {
                    Value::String(text) => {
                        map.insert(key.clone(), text.clone());
                    }
                    nested => collect_into(nested, map),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, map);
            }
        }
        _ => {}
    }
}

/// Build the flat translation map for a parsed document. Every string value found under an object
/// key at any depth is included, keyed by that bare key. When the same key appears more than once,
/// the one that comes last in the document wins.
pub fn collect_translation_map(document: &Value) -> TranslationMap {
    let mut map = TranslationMap::default();
    collect_into(document, &mut map);
    map
}

/// Read a translated file into a [TranslationMap]. Parse errors are always returned, since merging
/// with an empty or partial map would silently discard translations.
pub fn read_translation_map_file(path: &Path) -> TemplateResult<TranslationMap> {
    Ok(collect_translation_map(&read_relaxed_json_file(path)?))
}
