use std::process::ExitCode;

use clap::Parser;
use l10n_site_data::{ChangelogEnv, SiteDataService, UpdateChangelog};
use l10n_tools::{git_for, print_report, setup_logger, RepoArgs};

/// Record the mods whose translations changed. In CI (`GITHUB_ACTIONS=true`) the commit range
/// comes from `BEFORE` and `SHA`; otherwise the staged changes are recorded under `STAGED`.
#[derive(Parser, Debug)]
#[command(name = "update-changelog", version)]
struct Cli {
    #[command(flatten)]
    repo: RepoArgs,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let layout = cli.repo.load_layout()?;
    let git = git_for(&layout);
    print_report(&UpdateChangelog::new(&layout, &git, ChangelogEnv::from_env()).run()?);
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
