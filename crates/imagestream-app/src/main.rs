// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imagestream — Image-from-stream sample
//
// Entry point. Initialises logging, parses the command line, loads the
// configuration, and runs the ingest-and-place workflow.

mod workflow;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use imagestream_core::error::Result;
use imagestream_core::{FsProbe, TargetOs, WorkflowConfig};

use workflow::RunOutcome;

#[derive(Parser)]
#[command(name = "imagestream")]
#[command(version)]
#[command(
    about = "Load a bitmap and a JPEG through in-memory streams; export the bitmap as PNG and place the JPEG on a new PDF page",
    long_about = None
)]
struct Cli {
    /// Bitmap input, exported as a standalone PNG
    #[arg(value_name = "BITMAP")]
    bitmap: Option<PathBuf>,

    /// JPEG input, placed on the PDF page
    #[arg(value_name = "JPEG")]
    jpeg: Option<PathBuf>,

    /// Output PDF document
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", env = "IMAGESTREAM_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Positional arguments in order, stopping at the first absent one.
    fn positional(&self) -> Vec<PathBuf> {
        [&self.bitmap, &self.jpeg, &self.output]
            .into_iter()
            .map_while(|arg| arg.clone())
            .collect()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(RunOutcome::Completed { .. }) | Ok(RunOutcome::MissingDependency { .. }) => {
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<RunOutcome> {
    let config = WorkflowConfig::load_or_default(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    let mut console = stdout.lock();
    workflow::run(
        &config,
        &cli.positional(),
        TargetOs::current(),
        &FsProbe,
        &mut console,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_zero_to_three_positionals() {
        let cli = Cli::try_parse_from(["imagestream"]).unwrap();
        assert!(cli.positional().is_empty());

        let cli = Cli::try_parse_from(["imagestream", "a.bmp", "b.jpg"]).unwrap();
        assert_eq!(
            cli.positional(),
            vec![PathBuf::from("a.bmp"), PathBuf::from("b.jpg")]
        );

        let cli = Cli::try_parse_from(["imagestream", "a.bmp", "b.jpg", "c.pdf"]).unwrap();
        assert_eq!(cli.positional().len(), 3);
    }

    #[test]
    fn cli_rejects_a_fourth_positional() {
        assert!(Cli::try_parse_from(["imagestream", "a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn cli_config_flag() {
        let cli = Cli::try_parse_from(["imagestream", "--config", "run.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("run.json")));
    }
}
