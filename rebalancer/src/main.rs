//! CLI entry point for yajirobe.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use yajirobe::{AssetClass, classify};

use yajirobe_rebalancer::config::Config;
use yajirobe_rebalancer::error::{Error, Result};
use yajirobe_rebalancer::workflow;

#[derive(Parser)]
#[command(name = "yajirobe")]
#[command(about = "Portfolio allocation and rebalancing-buy planner")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the allocation by asset class against targets
    Allocation {
        /// Path to target.json
        #[arg(long)]
        targets: PathBuf,

        /// Path to holdings.json
        holdings: PathBuf,
    },

    /// Split a new contribution across underweight classes
    Buy {
        /// Path to target.json
        #[arg(long)]
        targets: PathBuf,

        /// Path to holdings.json
        holdings: PathBuf,

        /// Amount to invest
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Print the asset class of a fund category description
    Classify {
        description: String,
    },

    /// Inspect or edit the fund info cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Show the cached entry for a fund
    Get { code: String },

    /// Store a fund's asset class
    Set {
        code: String,

        /// Asset class id, e.g. international-stocks
        class: AssetClass,

        #[arg(long, default_value = "")]
        name: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Err(e) = run(&config, cli.command) {
        match &e {
            Error::Contribution(_) => {
                eprintln!("Error: {e}");
                process::exit(2);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}

fn run(config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Allocation { targets, holdings } => {
            workflow::run_allocation(config, &targets, &holdings)?;
        }
        Command::Buy {
            targets,
            holdings,
            amount,
        } => {
            workflow::run_buy(config, &targets, &holdings, amount)?;
        }
        Command::Classify { description } => {
            let class = classify(&description);
            println!("{} ({})", class, class.id());
        }
        Command::Cache { command } => match command {
            CacheCommand::Get { code } => match workflow::cache_get(config, &code)? {
                Some(info) => println!("{}\t{}\t{}", info.code, info.class.id(), info.name),
                None => println!("{code}: not cached"),
            },
            CacheCommand::Set { code, class, name } => {
                let info = workflow::cache_set(config, &code, class, &name)?;
                println!("{}\t{}", info.code, info.class.id());
            }
        },
    }
    Ok(())
}
