//! Entry point of the `clasp` binary.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, field};

use clasp_cli::{
    cli::{Cli, CliError, run_cli},
    logging::{self, LoggingError},
};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    run_cli(cli).context("clasp failed")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let Err(err) = try_main() else {
        return ExitCode::SUCCESS;
    };
    let core = err
        .downcast_ref::<CliError>()
        .and_then(|cli_error| match cli_error {
            CliError::Core(core) => Some(core),
            _ => None,
        });
    error!(
        error = format_args!("{err:#}"),
        code = core.map(|core| field::display(core.code().as_str())),
        graph_code = core
            .and_then(|core| core.graph_code())
            .map(|code| field::display(code.as_str())),
        "command execution failed"
    );
    ExitCode::FAILURE
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is not available when its installation fails"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
