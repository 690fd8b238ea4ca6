use anyhow::Result;
use clap::Parser;

use gtrans::cli::commands::{configure, languages, translate};
use gtrans::cli::{Args, Command};
use gtrans::config::MissingTargetLanguage;
use gtrans::input::DuplicateStdin;
use gtrans::output::{self, OutputConfig};
use gtrans::ui::Style;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        verbose: args.verbose,
        no_color: args.no_color || OutputConfig::default().no_color,
    });

    if let Err(e) = run(args).await {
        eprintln!("{} {e:#}", Style::error("Error:"));
        std::process::exit(exit_code(&e));
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Command::Configure { show }) => configure::run_configure(show),
        Some(Command::Languages { json }) => languages::run_languages(json).await,
        None => {
            let options = translate::TranslateOptions {
                files: args.files,
                from: args.from,
                to: args.to,
            };
            translate::run_translate(options).await
        }
    }
}

fn exit_code(error: &anyhow::Error) -> exitcode::ExitCode {
    if error.is::<MissingTargetLanguage>() || error.is::<DuplicateStdin>() {
        exitcode::USAGE
    } else {
        exitcode::SOFTWARE
    }
}
