//! Kernel simulator CLI.
//!
//! This binary drives a complete run. It performs:
//! 1. **Run:** Load a workload, its reference traces, and an optional JSON config, then
//!    simulate until every process finishes and print statistics.
//! 2. **Config:** Print the effective default configuration as JSON, as a starting
//!    point for a config file.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kernsim_core::config::Config;
use kernsim_core::sim::{FileTraceLoader, Simulator, Workload};
use kernsim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "kernsim",
    author,
    version,
    about = "Cycle-stepped round-robin scheduler and demand-paging simulator",
    long_about = "Simulate a single-CPU kernel: processes arrive, run round-robin, fault on \
                  pages that are not resident, and wait for a serialized swap disk.\n\n\
                  Each process reads its memory references from <traces>/<name>.mem.\n\n\
                  Examples:\n  kernsim run -w workload.json -t traces/\n  \
                  kernsim run -w workload.json -t traces/ -c kernel.json --stats memory\n  \
                  kernsim config > kernel.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a workload to completion.
    Run {
        /// Workload JSON listing processes and their arrival cycles.
        #[arg(short, long)]
        workload: PathBuf,

        /// Directory holding one `<name>.mem` trace per process.
        #[arg(short, long, default_value = ".")]
        traces: PathBuf,

        /// Configuration JSON; built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Statistics sections to print (summary, cpu, scheduler, memory); all by default.
        #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
        stats: Vec<String>,

        /// Print every context switch after the run.
        #[arg(long)]
        timeline: bool,

        /// Log scheduling decisions (overridden by RUST_LOG).
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            workload,
            traces,
            config,
            stats,
            timeline,
            verbose,
        } => {
            init_tracing(verbose);
            cmd_run(&workload, traces, config, &stats, timeline);
        }
        Commands::Config => cmd_config(),
    }
}

/// Installs the log subscriber; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "kernsim_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads inputs, runs the simulation, and prints the report.
///
/// Any load or run error is printed and exits with code 1.
fn cmd_run(
    workload_path: &Path,
    traces: PathBuf,
    config_path: Option<PathBuf>,
    sections: &[String],
    timeline: bool,
) {
    let config = match config_path {
        Some(path) => {
            let config = Config::from_file(&path).unwrap_or_else(|e| fail(&e));
            info!(path = %path.display(), "configuration loaded");
            config
        }
        None => Config::default(),
    };
    let workload = Workload::from_file(workload_path).unwrap_or_else(|e| fail(&e));

    println!(
        "[*] {} processes  quantum={}  frames={}  swap_latency={}",
        workload.len(),
        config.scheduler.quantum,
        config.memory.page_frames,
        config.memory.swap_latency
    );

    let mut sim = Simulator::new(&config, FileTraceLoader::new(traces));
    sim.submit(&workload);

    let outcome = sim.run();

    if timeline {
        println!("\nCONTEXT SWITCHES");
        for record in sim.unit().timeline() {
            println!(
                "  cycle {:>10}  -> {:<16} (starts {})",
                record.at, record.next, record.start
            );
        }
    }

    match outcome {
        Ok(report) => report.print_sections(sections),
        Err(e) => {
            sim.report().print_sections(sections);
            fail(&e);
        }
    }
}

/// Prints the default configuration.
fn cmd_config() {
    match serde_json::to_string_pretty(&Config::default()) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(&e),
    }
}

fn fail(error: &dyn std::error::Error) -> ! {
    eprintln!("\n[!] FATAL: {error}");
    process::exit(1);
}
