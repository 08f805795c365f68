//! Demo command implementation
//!
//! Identify the chip, erase the first 64 KiB block, write a 2000-byte
//! pattern across several pages and read it back.

use super::require_chip;
use is25lp_core::transport::Transport;
use is25lp_core::Is25lp;

/// Size of the demo buffer
const DEMO_LEN: usize = 2000;

/// Run the demo flow
pub fn run_demo<T: Transport>(flash: &mut Is25lp<T>) -> Result<(), Box<dyn std::error::Error>> {
    require_chip(flash)?;

    let mid = flash.manufacturer_id()?;
    println!("Manufacturer/device ID: 0x{:04X}", mid);

    // Erase only what is about to be written; block 0 is enough here
    println!("Erasing block 0...");
    if flash.geometry().total_64k_blocks() > 0 {
        flash.erase_block64k(0)?;
    } else {
        flash.erase_block32k(0)?;
    }

    let pattern: Vec<u8> = (0..DEMO_LEN).map(|i| (i % 251) as u8).collect();
    let addr = 0x000000;

    println!("Writing {} bytes at 0x{:06X}...", DEMO_LEN, addr);
    flash.write_pages(addr, &pattern)?;

    let mut readback = vec![0u8; DEMO_LEN];
    flash.read_bytes(addr, &mut readback)?;

    if let Some(pos) = readback.iter().zip(&pattern).position(|(a, b)| a != b) {
        return Err(format!(
            "Readback mismatch at 0x{:06X}: expected 0x{:02X}, got 0x{:02X}",
            addr as usize + pos,
            pattern[pos],
            readback[pos]
        )
        .into());
    }

    println!("Read back {} bytes, all match", DEMO_LEN);
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::test_util::dummy_flash;
    use is25lp_core::spi::Instruction;
    use is25lp_dummy::DummyConfig;

    #[test]
    fn test_demo_is25lp040e() {
        let mut flash = dummy_flash(DummyConfig::default());
        flash.transport_mut().data_mut()[..DEMO_LEN].fill(0x00);

        run_demo(&mut flash).unwrap();

        let mem = flash.transport().data();
        assert!(mem[..DEMO_LEN]
            .iter()
            .enumerate()
            .all(|(i, &b)| b == (i % 251) as u8));

        // 2000 bytes from page 0: seven full pages and one of 208 bytes
        let programs = flash
            .transport()
            .transactions()
            .iter()
            .filter(|t| t.is(Instruction::Pp))
            .count();
        assert_eq!(programs, 8);
    }

    #[test]
    fn test_demo_smallest_part() {
        let mut flash = dummy_flash(DummyConfig::for_device(0x02));
        run_demo(&mut flash).unwrap();
    }
}
