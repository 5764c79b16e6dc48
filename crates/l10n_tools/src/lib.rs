//! Shared setup for the `l10n_tools` binaries: logging, the repository arguments every
//! site command takes, and loading the [SiteLayout] they describe.
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use fern::Dispatch;
use l10n_site_data::{SiteDataReport, SiteLayout};
use l10n_vcs::GitCli;
use log::{Level, LevelFilter};

fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31merror\x1b[0m",
        Level::Warn => "\x1b[33mwarning\x1b[0m",
        Level::Info => "info",
        Level::Debug | Level::Trace => "debug",
    }
}

/// Log to stderr as `warning: ...` / `error: ...`, the same way hook findings are printed.
/// Only warnings and errors are shown unless `verbose` is set.
pub fn setup_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let result = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{}: {message}", level_label(record.level())))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();

    if let Err(error) = result {
        eprintln!("Failed to set up logging: {error}");
    }
}

/// Arguments shared by every command that works on the site repository.
#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Root of the site repository.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file to use instead of `l10n-tools.json` at the root.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log progress as well as warnings.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RepoArgs {
    pub fn load_layout(&self) -> anyhow::Result<SiteLayout> {
        SiteLayout::load(&self.root, self.config.as_deref())
            .with_context(|| format!("Failed to load the layout for {}", self.root.display()))
    }
}

pub fn git_for(layout: &SiteLayout) -> GitCli {
    GitCli::new(&layout.root, layout.git_timeout())
}

pub fn print_report(report: &SiteDataReport) {
    for warning in &report.warnings {
        log::warn!("{warning}");
    }
    if !report.summary.is_empty() {
        println!("{}", report.summary);
    }
}
