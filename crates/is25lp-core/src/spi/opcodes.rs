//! IS25LP instruction set
//!
//! Every instruction is a single opcode byte. The bus transaction that
//! follows it takes one of four shapes:
//!
//! - opcode only (WREN, WRDI, CER, RSTEN, RST)
//! - opcode + 24-bit address (SER, BER32, BER64)
//! - opcode + address + data stream (NORD, FRD, PP)
//! - opcode + data stream (RDSR, RDFR, RDJDID)
//!
//! The quad, suspend/resume, power-down and information-row instructions
//! are listed for completeness. No driver operation issues them.

/// One-byte instruction opcodes understood by IS25LP/IS25WP devices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Instruction {
    // ========================================================================
    // Read
    // ========================================================================
    /// Normal Read Mode
    Nord = 0x03,
    /// Fast Read Mode (one dummy byte after the address)
    Frd = 0x0B,
    /// Fast Read Dual I/O (reserved)
    Frdio = 0xBB,
    /// Fast Read Dual Output (reserved)
    Frdo = 0x3B,
    /// Fast Read Quad Output (reserved)
    Frqo = 0x6B,
    /// Fast Read Quad I/O (reserved)
    Frqio = 0xEB,

    // ========================================================================
    // Program / erase
    // ========================================================================
    /// Input Page Program
    Pp = 0x02,
    /// Quad Input Page Program (reserved)
    Ppq = 0x32,
    /// Sector Erase, 4 KiB (also accepted as 0x20)
    Ser = 0xD7,
    /// Block Erase, 32 KiB
    Ber32 = 0x52,
    /// Block Erase, 64 KiB (32 KiB on the 256Kb/512Kb parts)
    Ber64 = 0xD8,
    /// Chip Erase (also accepted as 0x60)
    Cer = 0xC7,

    // ========================================================================
    // Write control and registers
    // ========================================================================
    /// Write Enable - sets WEL, required before every program/erase
    Wren = 0x06,
    /// Write Disable - clears WEL
    Wrdi = 0x04,
    /// Read Status Register
    Rdsr = 0x05,
    /// Write Status Register
    Wrsr = 0x01,
    /// Read Function Register
    Rdfr = 0x48,
    /// Write Function Register
    Wrfr = 0x42,

    // ========================================================================
    // QPI, suspend and power (reserved)
    // ========================================================================
    /// Enter QPI mode
    Qpien = 0x35,
    /// Exit QPI mode
    Qpidi = 0xF5,
    /// Suspend during program/erase
    Persus = 0x75,
    /// Resume program/erase
    Perrsm = 0x7A,
    /// Deep Power Down
    Dp = 0xB9,
    /// Release Power Down (also the legacy Read ID opcode)
    Rdpd = 0xAB,

    // ========================================================================
    // Identification
    // ========================================================================
    /// Read JEDEC ID
    Rdjdid = 0x9F,
    /// Read JEDEC ID in QPI mode (reserved)
    RdjdidQpi = 0xAF,
    /// Read Manufacturer & Device ID
    Rdmdid = 0x90,
    /// Read Unique ID
    Rduid = 0x4B,
    /// SFDP Read
    Rdsfdp = 0x5A,

    // ========================================================================
    // Reset and misc
    // ========================================================================
    /// No Operation
    Nop = 0x00,
    /// Software Reset Enable
    Rsten = 0x66,
    /// Software Reset
    Rst = 0x99,

    // ========================================================================
    // Information row (reserved)
    // ========================================================================
    /// Erase Information Row
    Irer = 0x64,
    /// Program Information Row
    Irp = 0x62,
    /// Read Information Row
    Irrd = 0x68,
    /// Set Wrapped Burst Read
    Stwbr = 0xC0,
}

impl Instruction {
    /// The opcode byte sent on the wire
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

impl From<Instruction> for u8 {
    fn from(instruction: Instruction) -> u8 {
        instruction.opcode()
    }
}

/// Alternate sector-erase opcode accepted by the chip
pub const SER_ALT: u8 = 0x20;
/// Alternate chip-erase opcode accepted by the chip
pub const CER_ALT: u8 = 0x60;

/// JEDEC manufacturer ID of ISSI
pub const MANUFACTURER_ID: u8 = 0x9D;

/// Byte clocked out by the host when it only wants to receive
pub const DUMMY_BYTE: u8 = 0x00;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Instruction::Nord.opcode(), 0x03);
        assert_eq!(Instruction::Pp.opcode(), 0x02);
        assert_eq!(Instruction::Ser.opcode(), 0xD7);
        assert_eq!(Instruction::Ber32.opcode(), 0x52);
        assert_eq!(Instruction::Ber64.opcode(), 0xD8);
        assert_eq!(Instruction::Cer.opcode(), 0xC7);
        assert_eq!(Instruction::Wren.opcode(), 0x06);
        assert_eq!(Instruction::Rdsr.opcode(), 0x05);
        assert_eq!(Instruction::Rdmdid.opcode(), 0x90);
        assert_eq!(u8::from(Instruction::Rst), 0x99);
    }
}
