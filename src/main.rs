//! Paging Simulator - Main Entry Point
//!
//! Runs a sequence of page accesses against a segmented, paged memory and
//! reports page faults, replacements, fragmentation and the final frame layout.
//!
//! Examples:
//!   paging-sim
//!   paging-sim --algorithm optimal --pages 1,2,3,1 --segment-ids 0,0,1,0
//!   paging-sim --config scenario.cfg --demand -v

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{debug, LevelFilter};

use paging_sim::io::{parse_list, write_reports};
use paging_sim::simulation::{run, run_demand_paging, Report};
use paging_sim::{Algorithm, ConfigError, SimulationConfig};

/// Segmentation and paging simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file of `key = value` lines; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page size in bytes
    #[arg(long)]
    page_size: Option<u64>,

    /// Total physical memory in bytes
    #[arg(long)]
    total_memory: Option<u64>,

    /// Segment sizes in bytes, comma-separated
    #[arg(long)]
    segments: Option<String>,

    /// Replacement algorithm: lru or optimal
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Page sequence, comma-separated
    #[arg(short, long)]
    pages: Option<String>,

    /// Segment id of each access, comma-separated
    #[arg(short, long)]
    segment_ids: Option<String>,

    /// Run in demand-paging mode instead of the selected algorithm
    #[arg(long, conflicts_with = "compare")]
    demand: bool,

    /// Run every replacement algorithm and print each report
    #[arg(long)]
    compare: bool,

    /// Also write the report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print per-access details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    // Run the simulator and handle any errors
    if let Err(e) = run_cli(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Build the configuration: file (or defaults), then command-line overrides
fn load_config(args: &Args) -> Result<SimulationConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(total_memory) = args.total_memory {
        config.total_memory = total_memory;
    }
    if let Some(segments) = &args.segments {
        config.segment_sizes = parse_list("segment sizes", segments)?;
    }
    if let Some(algorithm) = &args.algorithm {
        config.algorithm = algorithm.parse()?;
    }
    if let Some(pages) = &args.pages {
        config.access_sequence = parse_list("pages", pages)?;
    }
    if let Some(segment_ids) = &args.segment_ids {
        config.segment_ids = parse_list("segment ids", segment_ids)?;
    }

    config.validate()?;
    Ok(config)
}

/// Main logic separated from main() for cleaner error handling
fn run_cli(args: &Args) -> Result<(), ConfigError> {
    let config = load_config(args)?;
    debug!("configuration: {:?}", config);

    let reports = if args.demand {
        vec![run_demand_paging(&config)?]
    } else if args.compare {
        Algorithm::ALL
            .iter()
            .map(|&algorithm| run(&SimulationConfig { algorithm, ..config.clone() }))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![run(&config)?]
    };

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_report(report, args.verbose);
    }

    if let Some(path) = &args.output {
        write_reports(path, &reports, args.verbose)?;
        debug!("report written to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &Report, verbose: bool) {
    print!("{}", report);
    println!("Hit Ratio: {:.2}%", report.hit_ratio() * 100.0);

    if verbose {
        println!();
        println!("Access Trace:");
        for record in &report.trace {
            println!("  {}", record);
        }
    }
}
