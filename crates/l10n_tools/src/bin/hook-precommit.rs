use std::process::ExitCode;

use clap::Parser;
use l10n_precommit::{autostage_from_env, HookOutcome, PrecommitHook};
use l10n_site_data::{ChangelogEnv, SiteDataService};
use l10n_tools::{git_for, setup_logger, RepoArgs};

/// Check the translations, regenerate the site data, and block the commit on any problem or on
/// generated files that still need staging. Set `PRECOMMIT_AUTOSTAGE=1` to stage them
/// automatically.
#[derive(Parser, Debug)]
#[command(name = "hook-precommit", version)]
struct Cli {
    #[command(flatten)]
    repo: RepoArgs,
}

fn run(cli: &Cli) -> anyhow::Result<HookOutcome> {
    let layout = cli.repo.load_layout()?;
    let git = git_for(&layout);
    PrecommitHook::new(&layout, &git)
        .with_changelog_env(ChangelogEnv::from_env())
        .with_autostage(autostage_from_env())
        .run()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logger(cli.repo.verbose);

    match run(&cli) {
        Ok(outcome) => {
            for line in outcome.render() {
                println!("{line}");
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
