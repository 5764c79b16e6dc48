//! The translation site's pre-commit guard.
//!
//! [PrecommitHook] checks the `translations/` tree, regenerates the website's data files, mirrors
//! the translations into the website, and then blocks the commit if anything was reported or if
//! the run changed files outside the generated set.
mod checks;
mod hook;
mod mirror;
mod policy;
mod report;
mod runlog;

pub use checks::{check_extra_files, check_slug_layout, check_slug_names, check_syntax};
pub use hook::{HookDecision, HookOutcome, PrecommitHook};
pub use mirror::mirror_translations;
pub use policy::{evaluate_new_changes, is_allowed_generated_path, new_changes, ChangeDecision};
pub use report::{Finding, FindingLevel, StepReport};
pub use runlog::{format_run_log, write_run_log};

/// Whether `PRECOMMIT_AUTOSTAGE=1` is set.
pub fn autostage_from_env() -> bool {
    std::env::var("PRECOMMIT_AUTOSTAGE").is_ok_and(|value| value == "1")
}
