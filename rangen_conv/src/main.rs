#![forbid(unsafe_code)]
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};

mod commands;
mod output;

#[derive(Debug, Parser)]
#[command(name = "rangen-conv", version)]
/// Converts RanGen project instances into time-indexed solver models
struct App {
    #[clap(flatten)]
    verbose: Verbosity,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate release dates and deadlines and write the solver model
    Convert(Convert),
    /// Check if a given input file obeys the RanGen format
    Check {
        #[arg(required = true)]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct Convert {
    /// RanGen (Patterson) input file
    input: PathBuf,
    /// Solver model output file
    output: PathBuf,
    /// Output the dummy nodes at start and end
    #[arg(short, long)]
    dummy: bool,
    /// Additionally write `<OUTPUT>.graphml`
    #[arg(short, long)]
    graphml: bool,
    /// Limits the random stretch of every window. Higher values lead to more flexibility
    /// but a longer time horizon
    #[arg(short, long, env = "RANGEN_TIME_LIMIT", default_value_t = 10)]
    time_limit: u64,
    /// Seed of the random number generator, drawn from entropy if missing
    #[arg(long, env = "RANGEN_SEED")]
    seed: Option<u64>,
    /// Rate of the geometric draw delaying each release
    #[arg(long, default_value_t = 0.6)]
    release_rate: f64,
    /// Rate of the geometric draw widening each window towards the deadline
    #[arg(long, default_value_t = 0.4)]
    deadline_rate: f64,
}

fn main() {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Convert(convert) => commands::convert(convert),
        Commands::Check { path } => commands::check(path),
    } {
        error!("An error occurred: {:#}", err);
        std::process::exit(1);
    }
}
