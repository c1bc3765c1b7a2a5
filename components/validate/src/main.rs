//! `validate <path>`: prints `OK` or the first syntax error.

use clap::Parser as ClapParser;
use std::process::ExitCode;
use validate::{init_tracing, run, Cli};

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
