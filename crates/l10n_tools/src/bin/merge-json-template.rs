use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use l10n_json_template::merge_template_files;
use l10n_tools::setup_logger;

/// Fill a commented JSON template with the values of a translated file, keeping the template's
/// comments and layout.
#[derive(Parser, Debug)]
#[command(name = "merge-json-template", version)]
struct Cli {
    /// The template, usually a mod's `default.json`.
    default_json_path: PathBuf,

    /// The translated file the values are taken from, usually `ja.json`.
    ja_json_path: PathBuf,

    /// Overwrite JA_JSON_PATH instead of writing `out.json` in the current directory.
    #[arg(long)]
    in_place: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> anyhow::Result<PathBuf> {
    for path in [&cli.default_json_path, &cli.ja_json_path] {
        if !path.is_file() {
            bail!("{} does not exist", path.display());
        }
    }

    let out_path = if cli.in_place {
        cli.ja_json_path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to read the current directory")?
            .join("out.json")
    };
    let summary = merge_template_files(&cli.default_json_path, &cli.ja_json_path, &out_path)?;
    log::info!(
        "Replaced {} values, kept {} untouched",
        summary.replaced,
        summary.kept
    );
    Ok(out_path)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logger(cli.verbose);

    match run(&cli) {
        Ok(out_path) => {
            println!("Done. Wrote to {}", out_path.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
