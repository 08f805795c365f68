//! Device geometry
//!
//! Page, sector and block sizes are the same across the whole IS25LP/WP
//! "E" family. Only the total capacity differs, and it is learned once at
//! initialization from the device ID (see [`crate::chip`]).
//!
//! All conversions are plain arithmetic on the linear address space:
//! `index = address / unit_size` and `address = index * unit_size`. No
//! conversion is checked against the capacity; an out-of-range index
//! yields an out-of-range address and the chip decides what that means.

/// Geometry of one IS25LP device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    capacity: u32,
}

impl Geometry {
    /// Page size in bytes (program granularity)
    pub const PAGE_SIZE: u32 = 256;
    /// Sector size in bytes (smallest erase)
    pub const SECTOR_SIZE: u32 = 4 * 1024;
    /// 32 KiB block size in bytes
    pub const BLOCK32_SIZE: u32 = 32 * 1024;
    /// 64 KiB block size in bytes
    pub const BLOCK64_SIZE: u32 = 64 * 1024;

    /// Geometry of an unidentified device: every capacity-derived count is zero
    pub const UNKNOWN: Self = Self { capacity: 0 };

    /// Create a geometry with the given total capacity in bytes
    pub const fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    /// Geometry for a device ID, or [`Geometry::UNKNOWN`] if the ID is not in the table
    pub fn from_device_id(device_id: u8) -> Self {
        crate::chip::lookup(device_id).map_or(Self::UNKNOWN, |variant| variant.geometry())
    }

    /// Returns true if the capacity is known (non-zero)
    pub const fn is_known(&self) -> bool {
        self.capacity != 0
    }

    /// Total capacity in bytes
    pub const fn memory_size(&self) -> u32 {
        self.capacity
    }

    /// Page size in bytes
    pub const fn page_size(&self) -> u32 {
        Self::PAGE_SIZE
    }

    /// Sector size in bytes
    pub const fn sector_size(&self) -> u32 {
        Self::SECTOR_SIZE
    }

    /// Number of pages
    pub const fn total_pages(&self) -> u32 {
        self.capacity / Self::PAGE_SIZE
    }

    /// Number of 4 KiB sectors
    pub const fn total_sectors(&self) -> u32 {
        self.capacity / Self::SECTOR_SIZE
    }

    /// Number of 32 KiB blocks
    pub const fn total_32k_blocks(&self) -> u32 {
        self.capacity / Self::BLOCK32_SIZE
    }

    /// Number of 64 KiB blocks
    pub const fn total_64k_blocks(&self) -> u32 {
        self.capacity / Self::BLOCK64_SIZE
    }

    /// Start address of a page
    pub const fn page_to_addr(page: u32) -> u32 {
        page.wrapping_mul(Self::PAGE_SIZE)
    }

    /// Index of the page containing an address
    pub const fn addr_to_page(addr: u32) -> u32 {
        addr / Self::PAGE_SIZE
    }

    /// Start address of a sector
    pub const fn sector_to_addr(sector: u32) -> u32 {
        sector.wrapping_mul(Self::SECTOR_SIZE)
    }

    /// Index of the sector containing an address
    pub const fn addr_to_sector(addr: u32) -> u32 {
        addr / Self::SECTOR_SIZE
    }

    /// Start address of a 32 KiB block
    pub const fn block32k_to_addr(block: u32) -> u32 {
        block.wrapping_mul(Self::BLOCK32_SIZE)
    }

    /// Index of the 32 KiB block containing an address
    pub const fn addr_to_block32k(addr: u32) -> u32 {
        addr / Self::BLOCK32_SIZE
    }

    /// Start address of a 64 KiB block
    pub const fn block64k_to_addr(block: u32) -> u32 {
        block.wrapping_mul(Self::BLOCK64_SIZE)
    }

    /// Index of the 64 KiB block containing an address
    pub const fn addr_to_block64k(addr: u32) -> u32 {
        addr / Self::BLOCK64_SIZE
    }

    /// Offset of an address inside its page
    pub const fn page_offset(addr: u32) -> u32 {
        addr % Self::PAGE_SIZE
    }

    /// Bytes from an address to the end of its page
    pub const fn page_remaining(addr: u32) -> u32 {
        Self::PAGE_SIZE - Self::page_offset(addr)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is25lp040e_geometry() {
        let geo = Geometry::from_device_id(0x12);
        assert_eq!(geo.memory_size(), 524_288);
        assert_eq!(geo.total_pages(), 2048);
        assert_eq!(geo.total_sectors(), 128);
        assert_eq!(geo.total_32k_blocks(), 16);
        assert_eq!(geo.total_64k_blocks(), 8);
        assert_eq!(Geometry::sector_to_addr(1), 4096);
        assert_eq!(Geometry::addr_to_sector(4097), 1);
    }

    #[test]
    fn test_unknown_device_has_zero_counts() {
        let geo = Geometry::from_device_id(0x7F);
        assert!(!geo.is_known());
        assert_eq!(geo.memory_size(), 0);
        assert_eq!(geo.total_pages(), 0);
        assert_eq!(geo.total_sectors(), 0);
        assert_eq!(geo.total_32k_blocks(), 0);
        assert_eq!(geo.total_64k_blocks(), 0);
        // Fixed sizes do not depend on identification
        assert_eq!(geo.page_size(), 256);
        assert_eq!(geo.sector_size(), 4096);
    }

    #[test]
    fn test_index_round_trip() {
        let geo = Geometry::from_device_id(0x12);
        for page in 0..geo.total_pages() {
            assert_eq!(Geometry::addr_to_page(Geometry::page_to_addr(page)), page);
        }
        for sector in 0..geo.total_sectors() {
            assert_eq!(Geometry::addr_to_sector(Geometry::sector_to_addr(sector)), sector);
        }
        for block in 0..geo.total_32k_blocks() {
            assert_eq!(Geometry::addr_to_block32k(Geometry::block32k_to_addr(block)), block);
        }
        for block in 0..geo.total_64k_blocks() {
            assert_eq!(Geometry::addr_to_block64k(Geometry::block64k_to_addr(block)), block);
        }
    }

    #[test]
    fn test_address_containment() {
        let geo = Geometry::from_device_id(0x12);
        // Sample the address space, including unit edges
        let mut addr = 0u32;
        while addr < geo.memory_size() {
            for probe in [addr, addr + 1, addr + 255, addr + 4095] {
                let start = Geometry::page_to_addr(Geometry::addr_to_page(probe));
                assert!(start <= probe && probe < start + Geometry::PAGE_SIZE);

                let start = Geometry::sector_to_addr(Geometry::addr_to_sector(probe));
                assert!(start <= probe && probe < start + Geometry::SECTOR_SIZE);

                let start = Geometry::block32k_to_addr(Geometry::addr_to_block32k(probe));
                assert!(start <= probe && probe < start + Geometry::BLOCK32_SIZE);

                let start = Geometry::block64k_to_addr(Geometry::addr_to_block64k(probe));
                assert!(start <= probe && probe < start + Geometry::BLOCK64_SIZE);
            }
            addr += 4093;
        }
    }

    #[test]
    fn test_page_remaining() {
        assert_eq!(Geometry::page_remaining(0), 256);
        assert_eq!(Geometry::page_remaining(0x1F0), 16);
        assert_eq!(Geometry::page_remaining(0x1FF), 1);
        assert_eq!(Geometry::page_offset(0x1F0), 0xF0);
    }
}
