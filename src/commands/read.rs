//! Read command implementation

use super::progress_bar;
use is25lp_core::transport::Transport;
use is25lp_core::Is25lp;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Default chunk size for reading (4 KiB)
const READ_CHUNK_SIZE: usize = 4096;

/// Run the read command
///
/// Without `len`, reads from `addr` to the end of the chip.
pub fn run_read<T: Transport>(
    flash: &mut Is25lp<T>,
    output: &Path,
    addr: u32,
    len: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = flash.geometry().memory_size();
    let len = match len {
        Some(len) => len,
        None if size == 0 => {
            return Err("Chip capacity is unknown; pass --len to read anyway".into());
        }
        None if addr >= size => {
            return Err(format!("Address 0x{:06X} is past the end of the chip", addr).into());
        }
        None => size - addr,
    };

    let data = read_with_progress(flash, addr, len as usize)?;

    let mut file = File::create(output)?;
    file.write_all(&data)?;

    println!("Wrote {} bytes to {:?}", data.len(), output);

    Ok(())
}

/// Read `len` bytes from `addr` with a progress bar
pub fn read_with_progress<T: Transport>(
    flash: &mut Is25lp<T>,
    addr: u32,
    len: usize,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut data = vec![0u8; len];

    let pb = progress_bar(len as u64, "Reading")?;

    for (i, chunk) in data.chunks_mut(READ_CHUNK_SIZE).enumerate() {
        let offset = i * READ_CHUNK_SIZE;
        flash.read_bytes(addr.wrapping_add(offset as u32), chunk)?;
        pb.set_position((offset + chunk.len()) as u64);
    }

    pb.finish_with_message("Read complete");
    Ok(data)
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::test_util::temp_path;
    use is25lp_dummy::{DummyConfig, DummyFlash};

    #[test]
    fn test_read_range_to_file() {
        let initial: Vec<u8> = (0..8192u32).map(|i| (i % 256) as u8).collect();
        let mut flash = Is25lp::new(DummyFlash::with_data(DummyConfig::default(), &initial));
        flash.initialize().unwrap();

        let path = temp_path("read-range.bin");
        run_read(&mut flash, &path, 0x100, Some(5000)).unwrap();

        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written, initial[0x100..0x100 + 5000]);
    }

    #[test]
    fn test_read_whole_chip() {
        let mut flash = Is25lp::new(DummyFlash::new(DummyConfig::for_device(0x02)));
        flash.initialize().unwrap();

        let path = temp_path("read-whole.bin");
        run_read(&mut flash, &path, 0, None).unwrap();

        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written.len(), 32 * 1024);
        assert!(written.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_read_unknown_capacity_needs_len() {
        let mut flash = Is25lp::new(DummyFlash::new(DummyConfig::for_device(0x42)));
        flash.initialize().unwrap();
        assert!(run_read(&mut flash, &temp_path("never.bin"), 0, None).is_err());
    }
}
