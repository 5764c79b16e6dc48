use std::process::ExitCode;

use clap::Parser;
use l10n_site_data::{GenerateProgressData, ProgressScope, SiteDataService};
use l10n_tools::{git_for, print_report, setup_logger, RepoArgs};

/// Update translation progress for the mods with staged changes.
#[derive(Parser, Debug)]
#[command(name = "generate-progress-data", version)]
struct Cli {
    #[command(flatten)]
    repo: RepoArgs,

    /// Recompute every mod on disk instead of only the staged ones.
    #[arg(long)]
    all: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let layout = cli.repo.load_layout()?;
    let git = git_for(&layout);
    let scope = if cli.all {
        ProgressScope::All
    } else {
        ProgressScope::Staged(&git)
    };
    print_report(&GenerateProgressData::new(&layout, scope).run()?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logger(cli.repo.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
