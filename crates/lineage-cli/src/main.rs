use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod exit;

use exit::Code;

fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                Code::WrongSyntax.into()
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match commands::run_command(cli, &mut out) {
        Ok(code) => code.into(),
        Err(failure) => {
            failure.report();
            failure.code.into()
        }
    }
}
