use clap::{Parser, Subcommand};
use page_behaviors::logging::{self, LogConfig, LogFormat};
use page_behaviors::{check, config, output, scenario};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "page-behaviors")]
#[command(about = "Run page-behavior scenarios against a headless page host")]
#[command(long_about = "\
Run page-behavior scenarios against a headless page host

A scenario is a TOML file naming an HTML page, the layout to assume, and a
list of steps: user actions (click, type, scroll, advance the clock) and
expectations about the resulting document.

Scenario directory:

  scenarios/
  ├── behaviors.toml               # Behavior config (optional, sparse)
  ├── .behavior-snapshots.json     # Recorded digests (written by --update)
  ├── nav.toml
  └── forms/
      └── contact.toml

Run 'page-behaviors gen-config' to generate a documented behaviors.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Multi-line log output
    #[arg(long, global = true)]
    pretty_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scenario and print its report
    Run {
        /// Scenario file
        scenario: PathBuf,
        /// Scenario root, for naming and config cascading
        #[arg(long, default_value = "fixtures/scenarios")]
        scenarios: PathBuf,
        /// Write the final page HTML to this file
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// Run every scenario in a directory and compare snapshot digests
    Check {
        /// Scenario directory
        #[arg(long, default_value = "fixtures/scenarios")]
        scenarios: PathBuf,
        /// Rewrite the snapshot manifest from this run
        #[arg(long)]
        update: bool,
        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
    /// Print a stock behaviors.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let format = if cli.pretty_logs {
        LogFormat::Pretty
    } else {
        LogFormat::Compact
    };
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(format))?;

    match cli.command {
        Command::Run {
            scenario,
            scenarios,
            dump,
        } => {
            let report = scenario::run_standalone(&scenario, &scenarios)?;
            output::print_run_report(&report);
            if let Some(path) = dump {
                std::fs::write(&path, &report.html)?;
            }
            if !report.passed() {
                std::process::exit(1);
            }
        }
        Command::Check {
            scenarios,
            update,
            threads,
        } => {
            init_thread_pool(threads);
            let summary = check::check_directory(&scenarios, update)?;
            output::print_check_summary(&summary);
            if !summary.is_success() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool for `check`.
///
/// Caps at the number of available CPU cores; 0 means all of them.
fn init_thread_pool(requested: usize) {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let threads = if requested == 0 {
        cores
    } else {
        requested.min(cores)
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

