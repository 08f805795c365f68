//! is25lp - ISSI IS25LP/IS25WP serial flash tool
//!
//! Drives an IS25LP chip through the `is25lp-core` driver over one of the
//! compiled-in transports: the in-memory emulator (`dummy`) or GPIO
//! bitbanging on Linux (`linux_gpio`).

mod cli;
mod commands;
mod transports;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Probe { programmer } => {
            let mut flash = commands::open(&programmer)?;
            commands::probe::run_probe(&mut flash)
        }
        Commands::Read {
            programmer,
            output,
            addr,
            len,
        } => {
            let mut flash = commands::open_initialized(&programmer)?;
            commands::read::run_read(&mut flash, &output, addr, len)
        }
        Commands::Write {
            programmer,
            input,
            addr,
            no_erase,
            verify,
        } => {
            let mut flash = commands::open_initialized(&programmer)?;
            commands::write::run_write(&mut flash, &input, addr, !no_erase, verify)
        }
        Commands::Erase { programmer, target } => {
            let mut flash = commands::open_initialized(&programmer)?;
            commands::erase::run_erase(&mut flash, &target)
        }
        Commands::Status { programmer } => {
            let mut flash = commands::open_initialized(&programmer)?;
            commands::status::run_status(&mut flash)
        }
        Commands::Demo { programmer } => {
            let mut flash = commands::open(&programmer)?;
            commands::demo::run_demo(&mut flash)
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
        Commands::ListChips => {
            commands::list_chips();
            Ok(())
        }
    }
}
