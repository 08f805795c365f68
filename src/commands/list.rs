//! List commands implementation

use super::format_size;
use crate::transports;
use is25lp_core::chip;

/// List all transports compiled into this binary
pub fn list_programmers() {
    println!("Supported transports:");
    println!();
    for t in transports::available_transports() {
        println!("  {:12} - {}", t.name, t.description);
        if !t.aliases.is_empty() {
            println!("  {:12}   aliases: {}", "", t.aliases.join(", "));
        }
    }
}

/// List all chips recognised by device ID
pub fn list_chips() {
    println!("Supported flash chips:");
    println!();
    println!(
        "{:<22} {:>9} {:>6} {:>10}",
        "Name", "Device ID", "Mbit", "Size"
    );
    println!("{}", "-".repeat(50));

    for variant in chip::VARIANTS {
        println!(
            "{:<22} {:>9} {:>6} {:>10}",
            variant.name,
            format!("0x{:02X}", variant.device_id),
            variant.capacity_mbit(),
            format_size(variant.capacity)
        );
    }
}
