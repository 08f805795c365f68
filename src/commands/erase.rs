//! Erase command implementation

use crate::cli::EraseTarget;
use indicatif::{ProgressBar, ProgressStyle};
use is25lp_core::transport::Transport;
use is25lp_core::{Geometry, Is25lp};
use std::fmt;
use std::time::Duration;

/// What a single erase command covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Sector(u32),
    Block32(u32),
    Block64(u32),
    Chip,
}

impl From<&EraseTarget> for Region {
    fn from(target: &EraseTarget) -> Self {
        if target.chip {
            return Region::Chip;
        }
        match (target.sector, target.block32, target.block64) {
            (Some(n), _, _) => Region::Sector(n),
            (_, Some(n), _) => Region::Block32(n),
            (_, _, Some(n)) => Region::Block64(n),
            _ => Region::Chip,
        }
    }
}

impl Region {
    /// Index and unit count for indexed regions
    fn bounds(&self, geometry: &Geometry) -> Option<(u32, u32)> {
        match *self {
            Region::Sector(n) => Some((n, geometry.total_sectors())),
            Region::Block32(n) => Some((n, geometry.total_32k_blocks())),
            Region::Block64(n) => Some((n, geometry.total_64k_blocks())),
            Region::Chip => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Region::Sector(n) => write!(f, "sector {} at 0x{:06X}", n, Geometry::sector_to_addr(n)),
            Region::Block32(n) => {
                write!(f, "32K block {} at 0x{:06X}", n, Geometry::block32k_to_addr(n))
            }
            Region::Block64(n) => {
                write!(f, "64K block {} at 0x{:06X}", n, Geometry::block64k_to_addr(n))
            }
            Region::Chip => write!(f, "chip"),
        }
    }
}

/// Run the erase command
pub fn run_erase<T: Transport>(
    flash: &mut Is25lp<T>,
    target: &EraseTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = *flash.geometry();
    let region = Region::from(target);

    // The chip wraps out-of-range addresses; refuse them instead
    if let Some((index, count)) = region.bounds(&geometry) {
        if geometry.is_known() && index >= count {
            return Err(format!("{} out of range (chip has {})", region, count).into());
        }
    }

    let pb = spinner(format!("Erasing {}...", region));
    match region {
        Region::Sector(n) => flash.erase_sector(n)?,
        Region::Block32(n) => flash.erase_block32k(n)?,
        Region::Block64(n) => flash.erase_block64k(n)?,
        Region::Chip => flash.erase_chip()?,
    }
    pb.finish_with_message(format!("Erased {}", region));

    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::test_util::dummy_flash;
    use is25lp_dummy::DummyConfig;

    fn target(sector: Option<u32>, block32: Option<u32>, block64: Option<u32>) -> EraseTarget {
        EraseTarget {
            sector,
            block32,
            block64,
            chip: sector.is_none() && block32.is_none() && block64.is_none(),
        }
    }

    #[test]
    fn test_erase_sector() {
        let mut flash = dummy_flash(DummyConfig::default());
        flash.initialize().unwrap();
        flash.transport_mut().data_mut().fill(0x00);

        run_erase(&mut flash, &target(Some(2), None, None)).unwrap();

        let mem = flash.transport().data();
        assert!(mem[0x2000..0x3000].iter().all(|&b| b == 0xFF));
        assert!(mem[0x3000..0x4000].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_erase_block_out_of_range() {
        let mut flash = dummy_flash(DummyConfig::for_device(0x02));
        flash.initialize().unwrap();
        assert!(run_erase(&mut flash, &target(None, None, Some(0))).is_err());
        run_erase(&mut flash, &target(None, Some(0), None)).unwrap();
    }

    #[test]
    fn test_region_from_target() {
        assert_eq!(Region::from(&target(Some(3), None, None)), Region::Sector(3));
        assert_eq!(Region::from(&target(None, Some(1), None)), Region::Block32(1));
        assert_eq!(Region::from(&target(None, None, Some(2))), Region::Block64(2));
        assert_eq!(Region::from(&target(None, None, None)), Region::Chip);
        assert_eq!(Region::Block64(2).to_string(), "64K block 2 at 0x020000");
    }

    #[test]
    fn test_erase_issues_single_command() {
        let mut flash = dummy_flash(DummyConfig::default());
        flash.initialize().unwrap();
        flash.transport_mut().take_transactions();

        run_erase(&mut flash, &target(None, Some(3), None)).unwrap();

        let erases: Vec<_> = flash
            .transport()
            .transactions()
            .iter()
            .filter(|t| t.opcode() != Some(0x06) && t.opcode() != Some(0x05))
            .map(|t| t.mosi.clone())
            .collect();
        assert_eq!(erases, vec![vec![0x52, 0x01, 0x80, 0x00]]);
    }

    #[test]
    fn test_erase_chip() {
        let mut flash = dummy_flash(DummyConfig::default());
        flash.initialize().unwrap();
        flash.transport_mut().data_mut().fill(0x12);

        run_erase(&mut flash, &target(None, None, None)).unwrap();
        assert!(flash.transport().data().iter().all(|&b| b == 0xFF));
    }
}
