use std::process::ExitCode;

use clap::Parser;
use hcloverlay::cli::{Cli, Commands};
use hcloverlay::{OverlayError, OverlaySettings, SettingsBuilder, merge_files, write_output};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `HCLOVERLAY_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_env("HCLOVERLAY_LOG").unwrap_or_else(|_| level.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), OverlayError> {
    let mut builder =
        SettingsBuilder::<OverlaySettings>::new("hcloverlay").config_file(cli.config.clone());
    for (key, value) in cli.overrides() {
        builder = builder.cli_override(key, Some(value));
    }

    if let Some(Commands::Config(args)) = cli.command {
        let result = builder.handle(&args.into_action())?;
        println!("{result}");
        return Ok(());
    }

    let settings = builder.load()?;
    let merged = merge_files(&settings)?;
    match &settings.output.path {
        Some(path) => write_output(path, &merged)?,
        None => print!("{merged}"),
    }
    Ok(())
}

#[cfg(feature = "rich-errors")]
fn report(err: OverlayError) {
    eprintln!("{:?}", miette::Report::new(err));
}

#[cfg(not(feature = "rich-errors"))]
fn report(err: OverlayError) {
    eprintln!("error: {err}");
}
