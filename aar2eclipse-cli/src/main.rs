use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

use aar2eclipse::{AndroidTool, ConvertError, ConvertOptions, ProjectUpdater, UpdateOutcome};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aar2eclipse")]
#[command(about = "Convert *.aar to Eclipse library project")]
struct Cli {
    /// The input *.aar file
    aar: PathBuf,
    /// The directory to contain the Eclipse library project; by default it
    /// will write to a directory having the same name as the *.aar file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Force rewriting the output directory even if it already exists
    #[arg(short, long)]
    force: bool,
    /// Do not run `android update lib-project` on the result
    #[arg(long)]
    no_update: bool,
    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = ConvertOptions::new(&cli.aar);
    if let Some(output) = &cli.output {
        options.output(output);
    }
    options.force(cli.force);

    let android = AndroidTool::locate();
    let updater: Option<&dyn ProjectUpdater> = if cli.no_update {
        None
    } else {
        Some(&android)
    };

    match aar2eclipse::convert_with(&options, updater) {
        Ok(conversion) => {
            if let UpdateOutcome::Warning(_) = conversion.update {
                eprintln!("⚠️  local.properties was not generated");
            }
            eprintln!(
                "✅ Done: {} (target=android-{})",
                conversion.output_dir.display(),
                conversion.target_sdk
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(error: &ConvertError) {
    eprintln!("❌ {}", error);

    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("   caused by: {}", cause);
        source = cause.source();
    }
}

/// 1 for output conflicts the user can fix with `--force` or `-o`, 2 for
/// everything else.
fn exit_code(error: &ConvertError) -> u8 {
    if error.is_user_error() { 1 } else { 2 }
}
