//! `preprocess`: builds the coronavirus subset with processed keywords, groups and ids.
//!
//! Usage: `preprocess <input_file> <output_file>`. Summary lines go to stdout;
//! set `RUST_LOG` for diagnostics on stderr.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use NewsSieve::config::{presets, VariantArgs};
use NewsSieve::error::Result;
use NewsSieve::runner::{PipelineRunner, RunStatistics};
use NewsSieve::utils::init_tracing;

fn run(args: &VariantArgs) -> Result<RunStatistics> {
    let config = presets::preprocess()?;
    let runner = PipelineRunner::from_config(&config)?.with_progress(true);
    info!(input = %args.input_file.display(), output = %args.output_file.display(), "preprocess started");
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
            println!("Output written to {}", args.output_file.display());
            println!("Preprocessing completed successfully!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("preprocess failed: {}", e);
            eprintln!("Error: {}", e);
            println!("Preprocessing failed!");
            ExitCode::FAILURE
        }
    }
}
