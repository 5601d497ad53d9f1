use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "origin-shift")]
#[command(about = "Rotate allow-listed origins across an ingress rule set and a membership set")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Replace retiring origins with incoming origins across both backends.
    Rotate(RotateArgs),
    /// Show the current allow-list state of both backends.
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct RotateArgs {
    /// Retiring origins, comma and/or whitespace separated.
    #[arg(short, long)]
    pub before: String,
    /// Incoming origins, comma and/or whitespace separated.
    #[arg(short, long)]
    pub after: String,
    /// Config file (region, backend names, state file, backup dir).
    #[arg(long, default_value = "origin-shift.toml")]
    pub config: PathBuf,
    /// Skip the pre-mutation backup step entirely.
    #[arg(long)]
    pub skip_backup: bool,
    /// Apply without the interactive confirmation prompt.
    #[arg(short = 'y', long)]
    pub assume_yes: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Config file (region, backend names, state file, backup dir).
    #[arg(long, default_value = "origin-shift.toml")]
    pub config: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
