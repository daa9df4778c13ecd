//! ksketch CLI binary.

use std::io::Write;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use ksketch::cli::args::KSketchArgs;
use ksketch::cli::commands::execute_command;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments using clap
    let args = KSketchArgs::parse();

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

    execute_command(args)?;
    Ok(())
}
