//! Static table of supported IS25LP/IS25WP variants

use crate::geometry::Geometry;

/// One supported device variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipVariant {
    /// Device ID byte returned by RDMDID
    pub device_id: u8,
    /// Part names sharing this device ID (3.3V LP / 1.8V WP)
    pub name: &'static str,
    /// Total capacity in bytes
    pub capacity: u32,
}

impl ChipVariant {
    /// Geometry for this variant
    pub const fn geometry(&self) -> Geometry {
        Geometry::new(self.capacity)
    }

    /// Capacity in megabits, as printed in the part name
    pub const fn capacity_mbit(&self) -> u32 {
        self.capacity * 8 / (1024 * 1024)
    }
}

/// Known variants, keyed by the device ID byte
pub static VARIANTS: &[ChipVariant] = &[
    ChipVariant {
        device_id: 0x12,
        name: "IS25LP040E/IS25WP040E",
        capacity: 4 * 1024 * 1024 / 8,
    },
    ChipVariant {
        device_id: 0x11,
        name: "IS25LP020E/IS25WP020E",
        capacity: 2 * 1024 * 1024 / 8,
    },
    ChipVariant {
        device_id: 0x10,
        name: "IS25LP010E/IS25WP010E",
        capacity: 1024 * 1024 / 8,
    },
    ChipVariant {
        device_id: 0x05,
        name: "IS25LP512E/IS25WP512E",
        capacity: 512 * 1024 / 8,
    },
    ChipVariant {
        device_id: 0x02,
        name: "IS25LP025E/IS25WP025E",
        capacity: 256 * 1024 / 8,
    },
];

/// Look up a variant by its device ID byte
pub fn lookup(device_id: u8) -> Option<&'static ChipVariant> {
    VARIANTS.iter().find(|v| v.device_id == device_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_ids() {
        let expected = [
            (0x12, 524_288),
            (0x11, 262_144),
            (0x10, 131_072),
            (0x05, 65_536),
            (0x02, 32_768),
        ];
        for (id, capacity) in expected {
            let variant = lookup(id).unwrap();
            assert_eq!(variant.capacity, capacity);
            assert_eq!(variant.geometry().memory_size(), capacity);
        }
    }

    #[test]
    fn test_lookup_unknown_id() {
        assert!(lookup(0x00).is_none());
        assert!(lookup(0x13).is_none());
        assert!(lookup(0xFF).is_none());
    }

    #[test]
    fn test_capacities_are_whole_pages_and_sectors() {
        for variant in VARIANTS {
            assert_eq!(variant.capacity % Geometry::PAGE_SIZE, 0, "{}", variant.name);
            assert_eq!(variant.capacity % Geometry::SECTOR_SIZE, 0, "{}", variant.name);
            assert_eq!(variant.capacity % Geometry::BLOCK32_SIZE, 0, "{}", variant.name);
        }
    }

    #[test]
    fn test_capacity_mbit() {
        assert_eq!(lookup(0x12).unwrap().capacity_mbit(), 4);
        assert_eq!(lookup(0x10).unwrap().capacity_mbit(), 1);
    }
}
