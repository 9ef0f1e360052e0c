//! `filter-recent`: keeps recent records in wanted categories and assigns each one a group.
//!
//! Usage: `filter-recent <input_file> <output_file>`. Summary lines go to stdout;
//! set `RUST_LOG` for diagnostics on stderr.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use NewsSieve::config::{presets, VariantArgs};
use NewsSieve::error::Result;
use NewsSieve::runner::{PipelineRunner, RunStatistics};
use NewsSieve::utils::init_tracing;

fn run(args: &VariantArgs) -> Result<RunStatistics> {
    let config = presets::filter_recent()?;
    let runner = PipelineRunner::from_config(&config)?.with_progress(true);
    info!(input = %args.input_file.display(), output = %args.output_file.display(), "filter-recent started");
    runner.run_files(&args.input_file, &args.output_file)
}

fn main() -> ExitCode {
    // Parse command-line arguments; clap exits with status 2 on misuse
    let args = VariantArgs::parse();
    init_tracing();

    println!("Reading data from {}...", args.input_file.display());
    match run(&args) {
        Ok(stats) => {
            for line in stats.summary_lines() {
                println!("{}", line);
            }
            println!();
            println!("Filtered data saved to {}", args.output_file.display());
            println!("Data filtering completed successfully!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("filter-recent failed: {}", e);
            eprintln!("Error: {}", e);
            println!("Data filtering failed!");
            ExitCode::FAILURE
        }
    }
}
