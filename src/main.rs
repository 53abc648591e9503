//! `bt`: a command-line front end for the in-memory issue tracker.

use clap::Parser;

mod cli;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(error) = cli.run() {
        eprintln!("Error: {error:#}");
        std::process::exit(cli::exit_code(&error));
    }
}
