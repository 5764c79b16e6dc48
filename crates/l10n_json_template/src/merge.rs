use std::fs;
use std::path::Path;

use crate::escape::{escape_json_str, unescape_json_str};
use crate::relaxed::{read_text_file, read_translation_map_file, strip_bom, TranslationMap};
use crate::scan::{find_string_end, next_non_whitespace};
use crate::{TemplateError, TemplateResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// String values that were swapped for a translation.
    pub replaced: usize,
    /// String values that were copied from the template as-is.
    pub kept: usize,
}

#[derive(Debug)]
pub struct MergeOutput {
    pub text: String,
    pub summary: MergeSummary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanMode {
    Normal,
    LineComment,
    BlockComment,
}

/// Transient state for a single pass over a template. String literals are consumed whole (see
/// [find_string_end]), so the scan itself only needs to distinguish comments from everything else.
struct MergeCursor<'a> {
    source: &'a str,
    translations: &'a TranslationMap,
    position: usize,
    mode: ScanMode,
    /// The most recent object key, until its value is consumed or the pair ends.
    current_key: Option<String>,
    /// Set after a `:` that follows a key, meaning the next string literal is that key's value.
    expect_value: bool,
    depth: i32,
    output: String,
    /// Everything in `source` before this index has already been written to `output`. Bytes are
    /// only copied in bulk when a replacement is made or the scan finishes.
    flushed: usize,
    summary: MergeSummary,
}

impl<'a> MergeCursor<'a> {
    fn new(source: &'a str, translations: &'a TranslationMap) -> Self {
        Self {
            source,
            translations,
            position: 0,
            mode: ScanMode::Normal,
            current_key: None,
            expect_value: false,
            depth: 0,
            output: String::with_capacity(source.len()),
            flushed: 0,
            summary: MergeSummary::default(),
        }
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    #[inline]
    fn end_pair(&mut self) {
        self.current_key = None;
        self.expect_value = false;
    }

    fn run(&mut self) {
        let bytes = self.bytes();
        while self.position < bytes.len() {
            let byte = bytes[self.position];
            let next = bytes.get(self.position + 1).copied();
            match self.mode {
                ScanMode::LineComment => {
                    if byte == b'\n' {
                        self.mode = ScanMode::Normal;
                    }
                    self.position += 1;
                }
                ScanMode::BlockComment => {
                    if byte == b'*' && next == Some(b'/') {
                        self.mode = ScanMode::Normal;
                        self.position += 2;
                    } else {
                        self.position += 1;
                    }
                }
                ScanMode::Normal => self.step_normal(byte, next),
            }
        }
    }

    fn step_normal(&mut self, byte: u8, next: Option<u8>) {
        match (byte, next) {
            (b'/', Some(b'/')) | (b'#', Some(b'#')) => {
                self.mode = ScanMode::LineComment;
                self.position += 2;
            }
            (b'/', Some(b'*')) => {
                self.mode = ScanMode::BlockComment;
                self.position += 2;
            }
            (b'"', _) => self.consume_string(),
            (b':', _) => {
                self.expect_value = self.current_key.is_some();
                self.position += 1;
            }
            (b'{', _) => {
                self.depth += 1;
                self.position += 1;
            }
            (b'}', _) => {
                self.depth -= 1;
                self.end_pair();
                self.position += 1;
            }
            (b',', _) => {
                self.end_pair();
                self.position += 1;
            }
            _ => self.position += 1,
        }
    }

    /// Handle the string literal starting at the current position, deciding whether it is a key
    /// or a value by looking at what follows it.
    fn consume_string(&mut self) {
        let bytes = self.bytes();
        let start = self.position;
        // An unterminated literal runs to the end of the input. Templates are validated before
        // they get here, so this only needs to avoid panicking.
        let (content_end, span_end) = match find_string_end(bytes, start) {
            Some(close) => (close, close + 1),
            None => (bytes.len(), bytes.len()),
        };
        self.position = span_end;

        let after = next_non_whitespace(bytes, span_end);
        if bytes.get(after) == Some(&b':') {
            let raw_key = &self.source[start + 1..content_end];
            self.current_key = Some(unescape_json_str(raw_key).into_owned());
            return;
        }

        let translations = self.translations;
        let replacement = match &self.current_key {
            Some(key) if self.expect_value => translations.get(key),
            _ => None,
        };
        let Some(replacement) = replacement else {
            self.summary.kept += 1;
            return;
        };

        self.output.push_str(&self.source[self.flushed..start]);
        self.output.push('"');
        self.output.push_str(&escape_json_str(replacement));
        self.output.push('"');
        self.flushed = span_end;
        self.summary.replaced += 1;
        self.end_pair();
    }

    fn finish(mut self) -> MergeOutput {
        if self.depth != 0 {
            log::debug!("template ended at object depth {}", self.depth);
        }
        self.output.push_str(&self.source[self.flushed..]);
        MergeOutput {
            text: self.output,
            summary: self.summary,
        }
    }
}

/// Merge `translations` into `template`, returning text that is byte-for-byte identical to the
/// template except for string values whose key has a translation.
///
/// The template is walked once from start to end. Comments (`//`, `##`, `/* */`), whitespace,
/// punctuation, keys, non-string values, and untranslated strings are all carried over exactly as
/// written. A string literal counts as a key when the next significant character after it is `:`.
/// Any other string literal is a value, and is replaced when it directly follows `"key":` and `key`
/// exists in `translations`.
///
/// Keys are matched by their bare name regardless of how deeply they are nested, and the pending
/// key is forgotten at every `,` and `}` so that it can never be applied to a value belonging to a
/// different pair. The merge never fails: malformed templates produce best-effort output.
pub fn merge_template(template: &str, translations: &TranslationMap) -> MergeOutput {
    let mut cursor = MergeCursor::new(strip_bom(template), translations);
    cursor.run();
    cursor.finish()
}

/// Merge the translated file at `translated_path` into the template at `template_path` and write
/// the result to `out_path`, which may be the same file as `translated_path`.
///
/// Both inputs are fully read before anything is written. An unreadable translation file aborts
/// the merge rather than producing a template with every translation dropped.
pub fn merge_template_files(
    template_path: &Path,
    translated_path: &Path,
    out_path: &Path,
) -> TemplateResult<MergeSummary> {
    let translations = read_translation_map_file(translated_path)?;
    let template = read_text_file(template_path)?;
    log::info!(
        "Merging {} translated keys into {}",
        translations.len(),
        template_path.display()
    );

    let merged = merge_template(&template, &translations);
    fs::write(out_path, merged.text).map_err(|source| TemplateError::Write {
        path: out_path.to_path_buf(),
        source,
    })?;
    Ok(merged.summary)
}
