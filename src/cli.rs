use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};

pub const NO_CHART_HELP: &str = "Print the summary only and skip the interactive percent-change chart.";
pub const NO_PROGRESS_HELP: &str = "Disable progress spinner output.";

#[derive(Debug, Parser)]
#[command(
    name = "dtscash",
    about = "Summarize this year's U.S. Treasury operating cash deposits and withdrawals and chart the daily percent change.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[arg(long, help = NO_CHART_HELP)]
    pub no_chart: bool,
    #[arg(long, help = NO_PROGRESS_HELP)]
    pub no_progress: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a completion script for dtscash to standard output.
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for.")]
        shell: Shell,
    },
}

pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Completions { shell } => write_completions(shell, &mut io::stdout().lock()),
    }
}

fn write_completions(shell: Shell, out: &mut impl Write) -> Result<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    generate(shell, &mut command, bin_name, out);
    out.flush().context("failed to flush completion output")
}
