//! Device identification
//!
//! RDMDID returns a manufacturer byte (0x9D for ISSI) followed by a device
//! byte. The device byte selects the capacity; everything else about the
//! geometry is fixed for the family.

mod database;

pub use database::{lookup, ChipVariant, VARIANTS};

use crate::spi::MANUFACTURER_ID;

/// Result of reading the manufacturer/device ID pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identification {
    /// Manufacturer ID byte
    pub manufacturer_id: u8,
    /// Device ID byte
    pub device_id: u8,
    /// Matching table entry, if the device ID is known
    pub variant: Option<&'static ChipVariant>,
}

impl Identification {
    /// Build an identification from the 16-bit RDMDID value
    /// (manufacturer in the high byte, device in the low byte)
    pub fn from_raw(raw: u16) -> Self {
        let manufacturer_id = (raw >> 8) as u8;
        let device_id = raw as u8;
        Self {
            manufacturer_id,
            device_id,
            variant: lookup(device_id),
        }
    }

    /// The 16-bit RDMDID value
    pub fn raw(&self) -> u16 {
        ((self.manufacturer_id as u16) << 8) | self.device_id as u16
    }

    /// Returns true if the manufacturer byte is ISSI's
    pub fn manufacturer_matches(&self) -> bool {
        self.manufacturer_id == MANUFACTURER_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let id = Identification::from_raw(0x9D12);
        assert_eq!(id.manufacturer_id, 0x9D);
        assert_eq!(id.device_id, 0x12);
        assert!(id.manufacturer_matches());
        assert_eq!(id.variant.unwrap().capacity, 524_288);
        assert_eq!(id.raw(), 0x9D12);
    }

    #[test]
    fn test_foreign_manufacturer_still_resolves_variant() {
        let id = Identification::from_raw(0xEF12);
        assert!(!id.manufacturer_matches());
        assert!(id.variant.is_some());
    }
}
