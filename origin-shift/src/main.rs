use anyhow::Result;
use clap::Parser;

mod cli;
mod rotate_cmd;
mod show_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Rotate(args) => rotate_cmd::run_rotate(args),
        Command::Show(args) => show_cmd::run_show(args),
    }
}
