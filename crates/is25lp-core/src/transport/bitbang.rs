//! Bitbang SPI helpers
//!
//! This module provides a trait for implementing a [`Transport`] on top of
//! software-controlled GPIO pins, together with the mode-0 byte exchange
//! the IS25LP expects (CPOL=0, CPHA=0, MSB first).
//!
//! The chip latches SI on the rising edge of SCK and shifts SO out on the
//! falling edge, so the host drives MOSI while SCK is low and samples MISO
//! right after raising it.
//!
//! [`Transport`]: super::Transport

/// Pin-level access needed to bitbang the IS25LP bus
pub trait BitbangSpiMaster {
    /// Drive CS#; `active=true` pulls the line low
    fn set_cs(&mut self, active: bool);

    /// Set clock line value
    fn set_sck(&mut self, high: bool);

    /// Set MOSI line value
    fn set_mosi(&mut self, high: bool);

    /// Get MISO line value
    fn get_miso(&self) -> bool;

    /// Wait for half an SCK period
    fn half_period_delay(&self);

    /// Update SCK and MOSI together
    ///
    /// Override when the hardware can change both lines in one write.
    fn set_sck_set_mosi(&mut self, sck: bool, mosi: bool) {
        self.set_sck(sck);
        self.set_mosi(mosi);
    }

    /// Update SCK, then sample MISO
    fn set_sck_get_miso(&mut self, sck: bool) -> bool {
        self.set_sck(sck);
        self.get_miso()
    }
}

/// Exchange one byte in SPI mode 0 (MSB first)
pub fn transfer_byte<M: BitbangSpiMaster + ?Sized>(master: &mut M, byte: u8) -> u8 {
    let mut received = 0u8;
    for i in (0..8).rev() {
        let bit = (byte >> i) & 1 != 0;
        master.set_sck_set_mosi(false, bit);
        master.half_period_delay();
        received <<= 1;
        if master.set_sck_get_miso(true) {
            received |= 1;
        }
        master.half_period_delay();
    }
    received
}

/// Assert chip-select with SCK idling low
pub fn begin<M: BitbangSpiMaster + ?Sized>(master: &mut M) {
    master.set_sck(false);
    master.set_cs(true);
    master.half_period_delay();
}

/// Return SCK to idle and release chip-select
pub fn end<M: BitbangSpiMaster + ?Sized>(master: &mut M) {
    master.set_sck(false);
    master.half_period_delay();
    master.set_cs(false);
    master.half_period_delay();
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Loopback wiring: MISO reads back whatever was last put on MOSI
    struct Loopback {
        cs: bool,
        sck: bool,
        mosi: Cell<bool>,
        rising_edges: usize,
    }

    impl BitbangSpiMaster for Loopback {
        fn set_cs(&mut self, active: bool) {
            self.cs = active;
        }

        fn set_sck(&mut self, high: bool) {
            if high && !self.sck {
                self.rising_edges += 1;
            }
            self.sck = high;
        }

        fn set_mosi(&mut self, high: bool) {
            self.mosi.set(high);
        }

        fn get_miso(&self) -> bool {
            self.mosi.get()
        }

        fn half_period_delay(&self) {}
    }

    #[test]
    fn test_transfer_loopback() {
        let mut wire = Loopback {
            cs: false,
            sck: false,
            mosi: Cell::new(false),
            rising_edges: 0,
        };

        begin(&mut wire);
        assert!(wire.cs);
        assert_eq!(transfer_byte(&mut wire, 0xA5), 0xA5);
        assert_eq!(transfer_byte(&mut wire, 0x3C), 0x3C);
        end(&mut wire);

        assert!(!wire.cs);
        assert!(!wire.sck);
        assert_eq!(wire.rising_edges, 16);
    }
}
