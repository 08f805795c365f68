//! Probe command implementation

use is25lp_core::spi::MANUFACTURER_ID;
use is25lp_core::transport::Transport;
use is25lp_core::{Error, Is25lp};

/// Identify the chip and print its ID and geometry
pub fn run_probe<T: Transport>(flash: &mut Is25lp<T>) -> Result<(), Box<dyn std::error::Error>> {
    let id = flash.identify()?;
    let is_issi = flash.initialize()?;

    println!("Manufacturer/device ID: 0x{:04X}", id.raw());
    if !is_issi {
        eprintln!(
            "Manufacturer 0x{:02X} is not ISSI (expected 0x{:02X})",
            id.manufacturer_id, MANUFACTURER_ID
        );
        return Err(Box::new(Error::ChipNotFound));
    }

    let (jedec_mfr, jedec_dev) = flash.read_jedec_id()?;
    let geometry = flash.geometry();

    println!("Found flash chip:");
    println!(
        "  Name:       {}",
        id.variant.map_or("unknown", |v| v.name)
    );
    println!("  JEDEC ID:   {:02X} {:04X}", jedec_mfr, jedec_dev);
    println!(
        "  Size:       {} bytes ({} KiB)",
        geometry.memory_size(),
        geometry.memory_size() / 1024
    );
    println!("  Pages:      {} x {} bytes", geometry.total_pages(), geometry.page_size());
    println!(
        "  Sectors:    {} x {} bytes",
        geometry.total_sectors(),
        geometry.sector_size()
    );
    println!("  32K blocks: {}", geometry.total_32k_blocks());
    println!("  64K blocks: {}", geometry.total_64k_blocks());

    if !geometry.is_known() {
        log::warn!("Device ID 0x{:02X} is not in the variant table", id.device_id);
    }

    Ok(())
}
