//! Reading and rewriting the commented JSON files that make up a mod's `i18n` folder.
//!
//! Translation templates (`default.json`) are JSON with `//`, `##`, and `/* */` comments that
//! translators rely on for context, so they can't be round-tripped through a JSON serializer.
//! Instead, [merge_template] walks the template text directly and swaps in translated values,
//! leaving every other byte alone.
mod error;
mod escape;
mod merge;
mod relaxed;
mod scan;

pub use error::{TemplateError, TemplateResult};
pub use escape::{escape_json_str, unescape_json_str};
pub use merge::{merge_template, merge_template_files, MergeOutput, MergeSummary};
pub use relaxed::{
    collect_translation_map, parse_relaxed_json, read_relaxed_json_file,
    read_relaxed_json_file_lenient, read_translation_map_file, strip_bom, strip_json_comments,
    TranslationMap,
};
pub use scan::{find_string_end, next_non_whitespace};
