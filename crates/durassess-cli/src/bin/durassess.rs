use std::process::ExitCode;

use clap::Parser;
use durassess_cli::{Cli, CliError, ConsoleSession, Mode, StdioServer};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("DURASSESS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "durassess failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match cli.mode {
        Mode::Stdio => StdioServer::new().serve_stdio(),
        Mode::Console => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(ConsoleSession::<std::io::Stdout>::run_stdio(cli.pacing()))
        }
    }
}
