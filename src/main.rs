use clap::Parser;
use reorgmap::cli::{Cli, run_cli};
use reorgmap::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let _cli = Cli::parse();

    let project_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            OutputFormatter::error(&format!("Cannot determine working directory: {}", e));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_cli(&project_dir) {
        OutputFormatter::error(&e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
