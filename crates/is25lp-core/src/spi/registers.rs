//! Status and function register bit definitions

use bitflags::bitflags;

bitflags! {
    /// Status register (RDSR/WRSR)
    ///
    /// Only WIP and WEL matter to the driver. The register is never cached:
    /// every consumer reads it fresh from the chip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusRegister: u8 {
        /// Write In Progress - an internal program/erase cycle is running
        const WIP  = 1 << 0;
        /// Write Enable Latch - set by WREN, cleared after each program/erase
        const WEL  = 1 << 1;
        /// Block Protection bit 0
        const BP0  = 1 << 2;
        /// Block Protection bit 1
        const BP1  = 1 << 3;
        /// Block Protection bit 2
        const BP2  = 1 << 4;
        /// Block Protection bit 3
        const BP3  = 1 << 5;
        /// Quad Enable
        const QE   = 1 << 6;
        /// Status Register Write Disable
        const SRWD = 1 << 7;

        /// All block protection bits
        const BP = Self::BP0.bits() | Self::BP1.bits() | Self::BP2.bits() | Self::BP3.bits();
    }
}

impl StatusRegister {
    /// Returns true while a program or erase cycle is running
    pub fn is_busy(self) -> bool {
        self.contains(Self::WIP)
    }

    /// Returns true if the write-enable latch is set
    pub fn is_write_enabled(self) -> bool {
        self.contains(Self::WEL)
    }

    /// Block protection level (BP3..BP0 as a number)
    pub fn protection_level(self) -> u8 {
        (self.bits() & Self::BP.bits()) >> 2
    }
}

bitflags! {
    /// Function register (RDFR/WRFR)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionRegister: u8 {
        /// Program suspended
        const PSUS  = 1 << 2;
        /// Erase suspended
        const ESUS  = 1 << 3;
        /// Information Row 0 locked
        const IRL0  = 1 << 4;
        /// Information Row 1 locked
        const IRL1  = 1 << 5;
        /// Information Row 2 locked
        const IRL2  = 1 << 6;
        /// Information Row 3 locked
        const IRL3  = 1 << 7;
    }
}
