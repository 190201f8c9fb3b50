use clap::Parser;
use wrbars::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
