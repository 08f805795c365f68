//! IS25LP driver
//!
//! `Is25lp` owns a [`Transport`] and the [`Geometry`] learned at
//! initialization. Taking `&mut self` on every operation keeps each
//! select/deselect window exclusive; sharing a driver between threads
//! needs a lock around the whole call, not around single bytes.

use super::config::DriverConfig;
use crate::chip::Identification;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::protocol::{self, WaitPolicy};
use crate::spi::{FunctionRegister, Instruction, StatusRegister};
use crate::transport::Transport;
use maybe_async::maybe_async;

/// Driver for one IS25LP/IS25WP chip
///
/// # Example
///
/// ```ignore
/// let mut flash = Is25lp::new(transport);
/// if flash.initialize()? {
///     flash.erase_sector(0)?;
///     flash.write_pages(0, b"hello")?;
/// }
/// ```
pub struct Is25lp<T: Transport> {
    transport: T,
    geometry: Geometry,
    config: DriverConfig,
}

impl<T: Transport> Is25lp<T> {
    /// Create a driver with the default configuration
    ///
    /// The geometry is unknown until [`initialize`](Self::initialize) runs.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, DriverConfig::default())
    }

    /// Create a driver with an explicit configuration
    pub fn with_config(transport: T, config: DriverConfig) -> Self {
        Self {
            transport,
            geometry: Geometry::UNKNOWN,
            config,
        }
    }

    /// Geometry learned at initialization
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Driver configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the driver and return the transport
    pub fn release(self) -> T {
        self.transport
    }

    // ------------------------------------------------------------------
    // Identification
    // ------------------------------------------------------------------

    /// Software reset (RSTEN, RST)
    #[maybe_async]
    pub async fn reset(&mut self) -> Result<()> {
        log::debug!("Resetting flash");
        protocol::software_reset(&mut self.transport).await
    }

    /// Read the manufacturer/device ID pair (manufacturer in the high byte)
    #[maybe_async]
    pub async fn manufacturer_id(&mut self) -> Result<u16> {
        protocol::read_manufacturer_id(&mut self.transport).await
    }

    /// Read and decode the manufacturer/device ID pair
    #[maybe_async]
    pub async fn identify(&mut self) -> Result<Identification> {
        let raw = self.manufacturer_id().await?;
        Ok(Identification::from_raw(raw))
    }

    /// Identify the chip and record its geometry
    ///
    /// The geometry is replaced whatever the outcome: an unknown device ID
    /// leaves a zero capacity. Returns whether the manufacturer ID is
    /// ISSI's; check it before trusting any capacity-derived size.
    #[maybe_async]
    pub async fn initialize(&mut self) -> Result<bool> {
        let id = self.identify().await?;

        self.geometry = match id.variant {
            Some(variant) => {
                log::debug!(
                    "Found {} ({} bytes)",
                    variant.name,
                    variant.capacity
                );
                variant.geometry()
            }
            None => {
                log::warn!("Unknown device ID 0x{:02X}, capacity set to 0", id.device_id);
                Geometry::UNKNOWN
            }
        };

        if !id.manufacturer_matches() {
            log::warn!(
                "Unexpected manufacturer ID 0x{:02X} (device ID 0x{:02X})",
                id.manufacturer_id,
                id.device_id
            );
        }

        Ok(id.manufacturer_matches())
    }

    /// Read the JEDEC ID as (manufacturer_id, device_id)
    #[maybe_async]
    pub async fn read_jedec_id(&mut self) -> Result<(u8, u16)> {
        protocol::read_jedec_id(&mut self.transport).await
    }

    /// Read the 16-byte factory unique ID (or as many bytes as `buf` holds)
    #[maybe_async]
    pub async fn read_unique_id(&mut self, buf: &mut [u8]) -> Result<()> {
        protocol::read_unique_id(&mut self.transport, buf).await
    }

    // ------------------------------------------------------------------
    // Registers
    // ------------------------------------------------------------------

    /// Read the status register
    #[maybe_async]
    pub async fn read_status(&mut self) -> Result<StatusRegister> {
        protocol::read_status(&mut self.transport).await
    }

    /// Read the function register
    #[maybe_async]
    pub async fn read_function_register(&mut self) -> Result<FunctionRegister> {
        protocol::read_function_register(&mut self.transport).await
    }

    /// Check if a program or erase cycle is running
    #[maybe_async]
    pub async fn is_busy(&mut self) -> Result<bool> {
        protocol::is_busy(&mut self.transport).await
    }

    /// Check if the write-enable latch is set
    #[maybe_async]
    pub async fn is_write_enabled(&mut self) -> Result<bool> {
        protocol::check_wel(&mut self.transport).await
    }

    /// Set the write-enable latch
    ///
    /// Every program/erase operation already does this; it is exposed for
    /// callers driving raw sequences.
    #[maybe_async]
    pub async fn write_enable(&mut self) -> Result<()> {
        protocol::write_enable(&mut self.transport).await
    }

    /// Clear the write-enable latch
    #[maybe_async]
    pub async fn write_disable(&mut self) -> Result<()> {
        protocol::write_disable(&mut self.transport).await
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Read one byte
    #[maybe_async]
    pub async fn read_byte(&mut self, addr: u32) -> Result<u8> {
        let mut buf = [0u8; 1];
        protocol::read(&mut self.transport, addr, &mut buf).await?;
        Ok(buf[0])
    }

    /// Read `buf.len()` bytes from `addr` in one session
    ///
    /// Page, sector and block boundaries are ignored. Past the last byte of
    /// the chip the read continues from address 0.
    #[maybe_async]
    pub async fn read_bytes(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        log::trace!("read 0x{:06X} len {}", addr, buf.len());
        protocol::read(&mut self.transport, addr, buf).await
    }

    /// Like [`read_bytes`](Self::read_bytes), using the Fast Read instruction
    #[maybe_async]
    pub async fn fast_read_bytes(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        log::trace!("fast read 0x{:06X} len {}", addr, buf.len());
        protocol::fast_read(&mut self.transport, addr, buf).await
    }

    // ------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------

    /// Wait for a pending program/erase to finish
    ///
    /// Uses the chip-erase policy, the longest one, since the pending
    /// operation is not known here.
    #[maybe_async]
    pub async fn wait_ready(&mut self) -> Result<()> {
        let policy = self.config.timeouts.chip_erase;
        self.wait_ready_with(policy).await
    }

    /// Wait for a pending program/erase to finish, with an explicit policy
    #[maybe_async]
    pub async fn wait_ready_with(&mut self, policy: WaitPolicy) -> Result<()> {
        protocol::wait_ready(&mut self.transport, policy).await
    }

    // ------------------------------------------------------------------
    // Erase
    // ------------------------------------------------------------------

    /// Start erasing a 4 KiB sector
    #[maybe_async]
    pub async fn erase_sector_async(&mut self, sector: u32) -> Result<()> {
        let addr = Geometry::sector_to_addr(sector);
        log::debug!("Erasing sector {} (0x{:06X})", sector, addr);
        protocol::erase(&mut self.transport, Instruction::Ser, Some(addr)).await
    }

    /// Erase a 4 KiB sector and wait for completion
    #[maybe_async]
    pub async fn erase_sector(&mut self, sector: u32) -> Result<()> {
        self.erase_sector_async(sector).await?;
        let policy = self.config.timeouts.sector_erase;
        self.wait_ready_with(policy).await
    }

    /// Start erasing a 32 KiB block
    #[maybe_async]
    pub async fn erase_block32k_async(&mut self, block: u32) -> Result<()> {
        let addr = Geometry::block32k_to_addr(block);
        log::debug!("Erasing 32K block {} (0x{:06X})", block, addr);
        protocol::erase(&mut self.transport, Instruction::Ber32, Some(addr)).await
    }

    /// Erase a 32 KiB block and wait for completion
    #[maybe_async]
    pub async fn erase_block32k(&mut self, block: u32) -> Result<()> {
        self.erase_block32k_async(block).await?;
        let policy = self.config.timeouts.block_erase;
        self.wait_ready_with(policy).await
    }

    /// Start erasing a 64 KiB block
    #[maybe_async]
    pub async fn erase_block64k_async(&mut self, block: u32) -> Result<()> {
        let addr = Geometry::block64k_to_addr(block);
        log::debug!("Erasing 64K block {} (0x{:06X})", block, addr);
        protocol::erase(&mut self.transport, Instruction::Ber64, Some(addr)).await
    }

    /// Erase a 64 KiB block and wait for completion
    #[maybe_async]
    pub async fn erase_block64k(&mut self, block: u32) -> Result<()> {
        self.erase_block64k_async(block).await?;
        let policy = self.config.timeouts.block_erase;
        self.wait_ready_with(policy).await
    }

    /// Start erasing the whole chip
    #[maybe_async]
    pub async fn erase_chip_async(&mut self) -> Result<()> {
        log::debug!("Erasing chip");
        protocol::erase(&mut self.transport, Instruction::Cer, None).await
    }

    /// Erase the whole chip and wait for completion
    #[maybe_async]
    pub async fn erase_chip(&mut self) -> Result<()> {
        self.erase_chip_async().await?;
        let policy = self.config.timeouts.chip_erase;
        self.wait_ready_with(policy).await
    }

    // ------------------------------------------------------------------
    // Program
    // ------------------------------------------------------------------

    /// Start programming `data` into the page containing `addr`
    ///
    /// Writing wraps inside that page: if `data` is longer than the room
    /// left before the page end, the rest lands at the page start and
    /// overwrites what this same call wrote there. Bytes of the page that
    /// are not written keep their value. Use [`write_pages`](Self::write_pages)
    /// for anything that may cross a page boundary.
    #[maybe_async]
    pub async fn write_page_async(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        if data.len() > Geometry::page_remaining(addr) as usize {
            log::trace!(
                "program at 0x{:06X} len {} wraps inside page {}",
                addr,
                data.len(),
                Geometry::addr_to_page(addr)
            );
        }
        protocol::program_page(&mut self.transport, addr, data).await
    }

    /// Program one page and wait for completion
    #[maybe_async]
    pub async fn write_page(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.write_page_async(addr, data).await?;
        let policy = self.config.timeouts.page_program;
        self.wait_ready_with(policy).await
    }

    /// Program `data` starting at `addr`, one page per program command
    ///
    /// The first chunk runs from `addr` to the end of its page, every
    /// following chunk is a full page and the last is whatever remains.
    /// Each chunk is waited on before the next is issued.
    #[maybe_async]
    pub async fn write_pages(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        let policy = self.config.timeouts.page_program;
        let mut page_addr = addr;
        let mut offset = 0usize;

        log::debug!("Writing {} bytes at 0x{:06X}", data.len(), addr);

        while offset < data.len() {
            let room = Geometry::page_remaining(page_addr) as usize;
            let chunk_len = core::cmp::min(room, data.len() - offset);
            let chunk = &data[offset..offset + chunk_len];

            protocol::program_page(&mut self.transport, page_addr, chunk).await?;
            self.wait_ready_with(policy).await?;

            offset += chunk_len;
            // Always land on the next page boundary
            page_addr = Geometry::page_to_addr(Geometry::addr_to_page(page_addr) + 1);
        }

        Ok(())
    }
}
