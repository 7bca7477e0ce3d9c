//! Escriba CLI binary.

use std::io::Write;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use escriba::cli::args::*;
use escriba::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = EscribaArgs::parse();

    // Set up logging/verbosity based on args
    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: EscribaArgs) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(execute_command(args))?;
    Ok(())
}
