//! Five Letter Words - SCOWL word list builder
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use five_letter_words::cli::Args;
use five_letter_words::processor::{Processor, ProcessorConfig};
use five_letter_words::progress::{print_banner, print_error, print_header, print_info};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging; RUST_LOG still wins when set
    let default_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Print banner unless quiet mode
    if !args.quiet {
        print_banner();
    }

    let config = ProcessorConfig::from_args(&args)?;

    // Show configuration
    if !args.quiet && args.verbose {
        print_config(&config);
    }

    let processor = Processor::new(config);
    let summary = processor.process()?;

    if !args.quiet {
        summary.stats.print_summary(&summary.words);
    }

    Ok(())
}

/// Print configuration summary
fn print_config(config: &ProcessorConfig) {
    print_header("Configuration");

    match config.archive {
        Some(ref path) => print_info(&format!("Archive:      {:?}", path)),
        None => {
            print_info(&format!("Metadata URL: {}", config.metadata_url));
            print_info(&format!("Fallback URL: {}", config.fallback_url));
            if let Some(ref dir) = config.temp_dir {
                print_info(&format!("Scratch dir:  {:?}", dir));
            }
        }
    }
    print_info(&format!(
        "Levels:       {}-{}",
        config.bounds.min(),
        config.bounds.max()
    ));
    print_info(&format!("Output dir:   {:?}", config.output_dir));
}
