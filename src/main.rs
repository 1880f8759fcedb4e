use clap::Parser;
use psarstop::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
