use log::{LevelFilter, debug};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

pub mod align;
pub mod config;
mod fasta_parser;
pub mod tree;

/// Installs the terminal logger.
///
/// Repeated calls within one process keep the first logger.
fn init_logging(level: LevelFilter) {
    if TermLogger::init(
        level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        debug!("Logger is already initialised");
    }
}
