//! 24-bit address encoding

/// Number of address bytes following an addressed opcode
pub const ADDRESS_BYTES: usize = 3;

/// Bits of a linear address that reach the chip
pub const ADDRESS_MASK: u32 = 0x00FF_FFFF;

/// Encode an address as three big-endian bytes (bits 23-16, 15-8, 7-0)
///
/// Bits above 23 are dropped; the chip never sees them.
pub const fn encode(address: u32) -> [u8; ADDRESS_BYTES] {
    [(address >> 16) as u8, (address >> 8) as u8, address as u8]
}

/// Decode three big-endian address bytes back into a linear address
pub const fn decode(bytes: [u8; ADDRESS_BYTES]) -> u32 {
    ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_big_endian() {
        assert_eq!(encode(0x012345), [0x01, 0x23, 0x45]);
        assert_eq!(encode(0), [0, 0, 0]);
    }

    #[test]
    fn test_encode_truncates_high_bits() {
        assert_eq!(encode(0xAB12_3456), [0x12, 0x34, 0x56]);
        assert_eq!(decode(encode(0xAB12_3456)), 0xAB12_3456 & ADDRESS_MASK);
    }
}
