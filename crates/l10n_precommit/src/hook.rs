use anyhow::Result;
use chrono::Local;
use l10n_site_data::{
    ChangelogEnv, GenerateModData, GenerateProgressData, ProgressScope, SiteDataReport,
    SiteDataResult, SiteDataService, SiteLayout, UpdateChangelog,
};
use l10n_vcs::ChangedFilesProvider;

use crate::checks::{check_extra_files, check_slug_layout, check_slug_names, check_syntax};
use crate::mirror::mirror_translations;
use crate::policy::{evaluate_new_changes, is_allowed_generated_path, new_changes, ChangeDecision};
use crate::runlog::{format_run_log, write_run_log};
use crate::StepReport;

/// How a hook run ended, and what the commit should do about it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookDecision {
    /// A step reported findings. The commit is blocked before looking at new changes.
    Blocked,
    /// Nothing new changed. The commit can go ahead.
    Clean,
    /// Generated files changed and were staged automatically.
    AutoStaged(Vec<String>),
    /// Generated files changed and need to be reviewed and staged by hand.
    NeedsStaging(Vec<String>),
    /// Files outside the generated set changed while the hook ran.
    Unexpected(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookOutcome {
    pub report: StepReport,
    pub decision: HookDecision,
}

impl HookOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.decision, HookDecision::Clean | HookDecision::AutoStaged(_))
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// The lines to show the person committing.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec!["-- pre-commit report ------------------------------".to_string()];
        lines.extend(self.report.notes.iter().map(|note| format!("note: {note}")));
        lines.extend(self.report.findings.iter().map(ToString::to_string));

        match &self.decision {
            HookDecision::Blocked => {
                lines.push("Commit aborted because of the issues above.".into());
            }
            HookDecision::Clean => {}
            HookDecision::AutoStaged(paths) => {
                lines.push(format!(
                    "Staged {} generated file(s) (PRECOMMIT_AUTOSTAGE=1).",
                    paths.len()
                ));
            }
            HookDecision::NeedsStaging(paths) => {
                lines.push("The hook generated or updated these files:".into());
                lines.extend(paths.iter().map(|path| format!(" - {path}")));
                lines.push("Review them, then either:".into());
                lines.push(format!("  1) git add {} and commit again", paths.join(" ")));
                lines.push(
                    "  2) commit with PRECOMMIT_AUTOSTAGE=1 to stage them automatically".into(),
                );
            }
            HookDecision::Unexpected(paths) => {
                lines.push("Files other than generated data changed while the hook ran:".into());
                lines.extend(paths.iter().map(|path| format!(" - {path}")));
            }
        }
        lines
    }
}

/// The pre-commit guard. Runs the layout checks and every generator, then decides whether the
/// commit may proceed based on what the run changed.
pub struct PrecommitHook<'a> {
    layout: &'a SiteLayout,
    vcs: &'a dyn ChangedFilesProvider,
    changelog_env: ChangelogEnv,
    autostage: bool,
}

impl<'a> PrecommitHook<'a> {
    pub fn new(layout: &'a SiteLayout, vcs: &'a dyn ChangedFilesProvider) -> Self {
        Self {
            layout,
            vcs,
            changelog_env: ChangelogEnv::local("local"),
            autostage: false,
        }
    }

    pub fn with_changelog_env(mut self, env: ChangelogEnv) -> Self {
        self.changelog_env = env;
        self
    }

    /// Stage generated files instead of asking for them to be staged by hand.
    pub fn with_autostage(mut self, autostage: bool) -> Self {
        self.autostage = autostage;
        self
    }

    fn generator_step(name: &str, result: SiteDataResult<SiteDataReport>) -> StepReport {
        let mut report = StepReport::default();
        match result {
            Ok(generated) => {
                if !generated.summary.is_empty() {
                    report.note(generated.summary);
                }
                for warning in generated.warnings {
                    report.warning(warning);
                }
            }
            Err(error) => report.error(format!("{name} failed: {error}")),
        }
        report
    }

    fn run_steps(&self) -> StepReport {
        let mut report = StepReport::default();
        report.absorb(check_slug_names(self.layout));
        report.absorb(check_slug_layout(self.layout));
        report.absorb(check_extra_files(self.layout));

        report.absorb(Self::generator_step(
            "Generating mod data",
            GenerateModData::new(self.layout).run(),
        ));
        report.absorb(Self::generator_step(
            "Generating progress data",
            GenerateProgressData::new(self.layout, ProgressScope::Staged(self.vcs)).run(),
        ));

        match mirror_translations(self.layout) {
            Ok(_) => report.note(format!(
                "Copied {} to {}",
                self.layout.translations_dir, self.layout.mirror_dir
            )),
            Err(error) => report.error(format!("Copying translations failed: {error:#}")),
        }

        report.absorb(Self::generator_step(
            "Updating the changelog",
            UpdateChangelog::new(self.layout, self.vcs, self.changelog_env.clone()).run(),
        ));
        report
    }

    fn stage_generated(&self, baseline: &[String], paths: &[String]) -> Result<HookDecision> {
        for path in paths {
            if self.layout.resolve(path).exists() {
                self.vcs.stage(path)?;
            }
        }
        let after = self.vcs.snapshot_changes()?;
        let unexpected: Vec<String> = new_changes(baseline, &after)
            .into_iter()
            .filter(|path| !is_allowed_generated_path(self.layout, path))
            .collect();
        if unexpected.is_empty() {
            Ok(HookDecision::AutoStaged(paths.to_vec()))
        } else {
            Ok(HookDecision::Unexpected(unexpected))
        }
    }
}

impl SiteDataService for PrecommitHook<'_> {
    type Result = Result<HookOutcome>;

    fn run(&mut self) -> Self::Result {
        let baseline = self.vcs.snapshot_changes()?;
        log::info!("{} path(s) already changed before the hook", baseline.len());

        let mut report = self.run_steps();

        let staged = self.vcs.staged_files()?;
        report.absorb(check_syntax(self.layout, &staged));

        let run_log = format_run_log(Local::now(), &self.vcs.identity(), &staged, &report);
        if let Err(error) = write_run_log(self.layout, &run_log) {
            log::warn!("{error:#}");
        }

        if !report.is_clean() {
            return Ok(HookOutcome {
                report,
                decision: HookDecision::Blocked,
            });
        }

        let after = self.vcs.snapshot_changes()?;
        let decision = match evaluate_new_changes(self.layout, &new_changes(&baseline, &after)) {
            ChangeDecision::Clean => HookDecision::Clean,
            ChangeDecision::Unexpected(paths) => HookDecision::Unexpected(paths),
            ChangeDecision::GeneratedOnly(paths) if self.autostage => {
                self.stage_generated(&baseline, &paths)?
            }
            ChangeDecision::GeneratedOnly(paths) => HookDecision::NeedsStaging(paths),
        };
        Ok(HookOutcome { report, decision })
    }
}
