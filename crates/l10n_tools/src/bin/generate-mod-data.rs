use std::process::ExitCode;

use clap::Parser;
use l10n_site_data::{GenerateModData, SiteDataService};
use l10n_tools::{print_report, setup_logger, RepoArgs};

/// Regenerate the per-mod metadata file from every translated file.
#[derive(Parser, Debug)]
#[command(name = "generate-mod-data", version)]
struct Cli {
    #[command(flatten)]
    repo: RepoArgs,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let layout = cli.repo.load_layout()?;
    print_report(&GenerateModData::new(&layout).run()?);
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
