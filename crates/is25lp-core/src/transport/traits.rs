//! Transport trait definitions
//!
//! These traits use `maybe_async` to support both sync and async modes.
//! - By default, traits are async (suitable for Embassy or other executors)
//! - With the `is_sync` feature, traits become synchronous

use crate::error::Result;
use maybe_async::maybe_async;

/// Byte-level serial bus transport (sync or async depending on `is_sync`)
///
/// This is the only thing the driver needs from the hardware: a chip-select
/// line and a full-duplex single-byte exchange. Everything the IS25LP
/// understands is built from these primitives.
///
/// The driver brackets every instruction in `select()` ... `deselect()`.
/// Deselecting is significant to the chip: program and erase cycles start
/// on the rising edge of CS#, so an implementation must not defer or batch
/// it.
///
/// ## Example: GPIO bitbang transport
///
/// ```ignore
/// impl Transport for MyGpioSpi {
///     fn select(&mut self) -> Result<()> {
///         self.cs.set_low();
///         Ok(())
///     }
///
///     fn deselect(&mut self) -> Result<()> {
///         self.cs.set_high();
///         Ok(())
///     }
///
///     fn transfer(&mut self, byte: u8) -> Result<u8> {
///         Ok(bitbang::transfer_byte(self, byte))
///     }
///
///     fn delay_us(&mut self, us: u32) {
///         self.delay.delay_us(us);
///     }
/// }
/// ```
#[maybe_async(AFIT)]
pub trait Transport {
    /// Assert chip-select
    async fn select(&mut self) -> Result<()>;

    /// De-assert chip-select
    async fn deselect(&mut self) -> Result<()>;

    /// Clock one byte out and return the byte clocked in at the same time
    async fn transfer(&mut self, byte: u8) -> Result<u8>;

    /// Delay for the specified number of microseconds
    async fn delay_us(&mut self, us: u32);
}

// Forwarding impls so callers can lend a transport to the driver and keep
// inspecting it afterwards (sync mode only, like the boxed impl below)
#[cfg(feature = "is_sync")]
impl<T: Transport + ?Sized> Transport for &mut T {
    fn select(&mut self) -> Result<()> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<()> {
        (**self).deselect()
    }

    fn transfer(&mut self, byte: u8) -> Result<u8> {
        (**self).transfer(byte)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

// Blanket impl for boxed transports to allow trait objects (sync mode only)
// In async mode, traits with async fn are not object-safe
#[cfg(all(feature = "alloc", feature = "is_sync"))]
impl Transport for alloc::boxed::Box<dyn Transport + Send> {
    fn select(&mut self) -> Result<()> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<()> {
        (**self).deselect()
    }

    fn transfer(&mut self, byte: u8) -> Result<u8> {
        (**self).transfer(byte)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// Information about a transport implementation
#[derive(Debug, Clone)]
pub struct TransportInfo {
    /// Name of the transport
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Description
    pub description: &'static str,
}
