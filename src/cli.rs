//! CLI argument parsing

use crate::transports;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
pub fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Transport to use, as name[:key=value,...] [available: {}]",
        transports::transport_names_short()
    )
}

#[derive(Parser)]
#[command(name = "is25lp")]
#[command(author, version, about = "ISSI IS25LP/IS25WP serial flash tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Exactly one erase granularity
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct EraseTarget {
    /// Erase one 4 KiB sector by index
    #[arg(long, value_parser = parse_hex_u32)]
    pub sector: Option<u32>,

    /// Erase one 32 KiB block by index
    #[arg(long, value_parser = parse_hex_u32)]
    pub block32: Option<u32>,

    /// Erase one 64 KiB block by index
    #[arg(long, value_parser = parse_hex_u32)]
    pub block64: Option<u32>,

    /// Erase the whole chip
    #[arg(long)]
    pub chip: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the flash chip
    Probe {
        /// Transport to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// Read flash contents to file
    Read {
        /// Transport to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Start address (hex or decimal)
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        addr: u32,

        /// Number of bytes to read (defaults to the rest of the chip)
        #[arg(long, value_parser = parse_hex_u32)]
        len: Option<u32>,
    },

    /// Write file to flash
    Write {
        /// Transport to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Start address (hex or decimal)
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        addr: u32,

        /// Don't erase the covered sectors before writing
        #[arg(long)]
        no_erase: bool,

        /// Read back and compare after writing
        #[arg(long)]
        verify: bool,
    },

    /// Erase a sector, a block or the whole chip
    Erase {
        /// Transport to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        #[command(flatten)]
        target: EraseTarget,
    },

    /// Show status and function registers
    Status {
        /// Transport to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// Erase block 0, write a test pattern across pages and read it back
    Demo {
        /// Transport to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// List supported transports
    ListProgrammers,

    /// List supported chips
    ListChips,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_hex_u32() {
        assert_eq!(parse_hex_u32("0x1000"), Ok(0x1000));
        assert_eq!(parse_hex_u32("0XfF"), Ok(0xFF));
        assert_eq!(parse_hex_u32("4096"), Ok(4096));
        assert!(parse_hex_u32("0xZZ").is_err());
        assert!(parse_hex_u32("ten").is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_erase_requires_one_target() {
        assert!(Cli::try_parse_from(["is25lp", "erase", "-p", "dummy"]).is_err());
        assert!(Cli::try_parse_from([
            "is25lp", "erase", "-p", "dummy", "--sector", "1", "--chip"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["is25lp", "erase", "-p", "dummy", "--block64", "0x2"])
            .unwrap();
        match cli.command {
            Commands::Erase { target, .. } => {
                assert_eq!(target.block64, Some(2));
                assert!(!target.chip);
            }
            _ => panic!("expected erase"),
        }
    }

    #[test]
    fn test_read_defaults() {
        let cli = Cli::try_parse_from(["is25lp", "-vv", "read", "-p", "dummy", "-o", "out.bin"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Read { addr, len, .. } => {
                assert_eq!(addr, 0);
                assert_eq!(len, None);
            }
            _ => panic!("expected read"),
        }
    }
}
