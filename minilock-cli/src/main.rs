use clap::Parser;
use minilock_cli::Cli;

fn main() -> miette::Result<()> {
    Cli::parse().run()
}
