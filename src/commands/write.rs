//! Write command implementation

use super::progress_bar;
use is25lp_core::transport::Transport;
use is25lp_core::{Geometry, Is25lp};
use std::path::Path;

/// Chunk size handed to `write_pages` between progress updates
const WRITE_CHUNK_SIZE: usize = 4096;
/// Default chunk size for verification
const VERIFY_CHUNK_SIZE: usize = 4096;

/// Run the write command
pub fn run_write<T: Transport>(
    flash: &mut Is25lp<T>,
    input: &Path,
    addr: u32,
    erase: bool,
    verify: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input)?;
    println!("Read {} bytes from {:?}", data.len(), input);

    if data.is_empty() {
        println!("Nothing to write");
        return Ok(());
    }

    let size = flash.geometry().memory_size() as u64;
    let end = addr as u64 + data.len() as u64;
    if size > 0 && end > size {
        return Err(format!(
            "Data ({} bytes at 0x{:06X}) exceeds chip size ({} bytes)",
            data.len(),
            addr,
            size
        )
        .into());
    }
    // Unknown capacity: only the address width bounds the write
    if end > u32::MAX as u64 + 1 {
        return Err(format!(
            "Data ({} bytes at 0x{:06X}) runs past the end of the address space",
            data.len(),
            addr
        )
        .into());
    }

    if erase {
        erase_covering_sectors(flash, addr, data.len())?;
    }

    write_with_progress(flash, addr, &data)?;

    if verify {
        verify_with_progress(flash, addr, &data)?;
    }

    println!("Write complete!");

    Ok(())
}

/// Erase every sector touched by `len` bytes at `addr`
pub fn erase_covering_sectors<T: Transport>(
    flash: &mut Is25lp<T>,
    addr: u32,
    len: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    if len == 0 {
        return Ok(());
    }
    let last_addr = u32::try_from(len - 1)
        .ok()
        .and_then(|span| addr.checked_add(span))
        .ok_or_else(|| format!("Erase range of {} bytes at 0x{:06X} overflows", len, addr))?;

    let first = Geometry::addr_to_sector(addr);
    let last = Geometry::addr_to_sector(last_addr);

    let pb = progress_bar(
        (last - first + 1) as u64 * Geometry::SECTOR_SIZE as u64,
        "Erasing",
    )?;

    for sector in first..=last {
        flash.erase_sector(sector)?;
        pb.inc(Geometry::SECTOR_SIZE as u64);
    }

    pb.finish_with_message("Erase complete");
    Ok(())
}

/// Program `data` at `addr` with a progress bar
pub fn write_with_progress<T: Transport>(
    flash: &mut Is25lp<T>,
    addr: u32,
    data: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = progress_bar(data.len() as u64, "Writing")?;

    for (i, chunk) in data.chunks(WRITE_CHUNK_SIZE).enumerate() {
        let offset = i * WRITE_CHUNK_SIZE;
        flash.write_pages(addr.wrapping_add(offset as u32), chunk)?;
        pb.set_position((offset + chunk.len()) as u64);
    }

    pb.finish_with_message("Write complete");
    Ok(())
}

/// Verify flash contents against expected data with progress bar
pub fn verify_with_progress<T: Transport>(
    flash: &mut Is25lp<T>,
    addr: u32,
    expected: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = vec![0u8; VERIFY_CHUNK_SIZE];

    let pb = progress_bar(expected.len() as u64, "Verifying")?;

    for (i, expected_chunk) in expected.chunks(VERIFY_CHUNK_SIZE).enumerate() {
        let offset = i * VERIFY_CHUNK_SIZE;
        let chunk = &mut buf[..expected_chunk.len()];

        flash.read_bytes(addr.wrapping_add(offset as u32), chunk)?;

        if let Some(pos) = chunk.iter().zip(expected_chunk).position(|(a, b)| a != b) {
            pb.abandon_with_message("Verification failed!");
            return Err(format!(
                "Verification failed at 0x{:06X}: expected 0x{:02X}, got 0x{:02X}",
                addr as usize + offset + pos,
                expected_chunk[pos],
                chunk[pos]
            )
            .into());
        }

        pb.set_position((offset + chunk.len()) as u64);
    }

    pb.finish_with_message("Verification passed");
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::test_util::{dummy_flash, temp_path};
    use is25lp_dummy::DummyConfig;

    #[test]
    fn test_write_file_unaligned() {
        let mut flash = dummy_flash(DummyConfig::default());
        flash.initialize().unwrap();

        // Pre-existing data in the covered sector is erased first
        flash.transport_mut().data_mut()[0x1000..0x3000].fill(0x00);

        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7) as u8).collect();
        let path = temp_path("write-unaligned.bin");
        std::fs::write(&path, &data).unwrap();

        run_write(&mut flash, &path, 0x1080, true, true).unwrap();
        std::fs::remove_file(&path).ok();

        let mem = flash.transport().data();
        assert_eq!(mem[0x1080..0x1080 + 5000], data[..]);
        assert!(mem[0x1000..0x1080].iter().all(|&b| b == 0xFF));
        assert!(mem[0x1080 + 5000..0x3000].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_write_without_erase_fails_verify() {
        let mut flash = dummy_flash(DummyConfig::default());
        flash.initialize().unwrap();
        flash.transport_mut().data_mut()[0] = 0x00;

        let path = temp_path("write-noerase.bin");
        std::fs::write(&path, [0xAA; 16]).unwrap();

        let result = run_write(&mut flash, &path, 0, false, true);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_write_too_large() {
        let mut flash = dummy_flash(DummyConfig::for_device(0x02));
        flash.initialize().unwrap();

        let path = temp_path("write-large.bin");
        std::fs::write(&path, vec![0u8; 1024]).unwrap();

        let result = run_write(&mut flash, &path, 32 * 1024 - 512, true, false);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_write_unknown_device_past_address_space() {
        let mut flash = dummy_flash(DummyConfig::for_device(0x42));
        assert!(flash.initialize().unwrap());
        assert!(!flash.geometry().is_known());
        flash.transport_mut().take_transactions();

        let path = temp_path("write-overflow.bin");
        std::fs::write(&path, vec![0u8; 512]).unwrap();

        let result = run_write(&mut flash, &path, 0xFFFF_FF00, true, false);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
        assert!(flash.transport().transactions().is_empty());
    }

    #[test]
    fn test_erase_covering_sectors_overflow() {
        let mut flash = dummy_flash(DummyConfig::default());
        flash.initialize().unwrap();
        flash.transport_mut().take_transactions();

        assert!(erase_covering_sectors(&mut flash, u32::MAX - 10, 100).is_err());
        assert!(flash.transport().transactions().is_empty());

        erase_covering_sectors(&mut flash, 0x1FFF, 2).unwrap();
        let erased: Vec<u32> = flash
            .transport()
            .transactions()
            .iter()
            .filter(|t| t.is(is25lp_core::spi::Instruction::Ser))
            .filter_map(|t| t.address())
            .collect();
        assert_eq!(erased, vec![0x1000, 0x2000]);
    }
}
