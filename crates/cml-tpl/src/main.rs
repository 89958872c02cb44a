//! cml-tpl - compile cml templates for web, weex and mini-program targets.

use clap::Parser;
use miette::Result;
use std::process::ExitCode;

mod cli;
mod config;
mod output;
mod runner;

use cli::Args;
use runner::Runner;

fn main() -> ExitCode {
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    init_logging(args.verbose);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so compiled output on stdout stays clean.
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<ExitCode> {
    let runner = Runner::new(args)?;
    let summary = runner.run()?;

    if summary.error_count > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
