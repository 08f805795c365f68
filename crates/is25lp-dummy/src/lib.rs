//! is25lp-dummy - In-memory IS25LP emulator for testing
//!
//! This crate provides a transport that emulates an IS25LP chip at the byte
//! level: it decodes each select/deselect window the way the chip does, so
//! the driver is exercised against the real framing rather than a mock of
//! its own API. It's useful for testing and development without hardware.
//!
//! The emulation covers the parts of the chip's state machine the driver
//! depends on:
//!
//! - WEL is set by WREN and required by PP/SER/BER32/BER64/CER; without it
//!   the command is ignored, as on silicon.
//! - Program and erase start on deselect and keep WIP set for a
//!   configurable number of status polls. Any command other than RDSR that
//!   arrives while busy is ignored.
//! - Page program loads a wrapping page buffer and can only clear bits.
//! - NORD/FRD wrap to address 0 past the end of the array.
//!
//! Every completed window is recorded as a [`Transaction`] so tests can
//! check exact transport call sequences.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;

use is25lp_core::chip;
use is25lp_core::error::{Error, Result};
use is25lp_core::geometry::Geometry;
use is25lp_core::spi::opcodes::{self, Instruction};
use is25lp_core::spi::{address, FunctionRegister, StatusRegister};
use is25lp_core::transport::Transport;


/// Value clocked out when the chip is not driving SO
const IDLE_BYTE: u8 = 0xFF;

/// Configuration for the dummy flash
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Manufacturer ID returned by RDMDID/RDJDID
    pub manufacturer_id: u8,
    /// Device ID returned by RDMDID
    pub device_id: u8,
    /// Memory type and capacity bytes returned by RDJDID
    pub jedec_device_id: u16,
    /// Flash size in bytes
    pub size: usize,
    /// Number of status reads that report WIP after a program/erase
    pub busy_polls: u32,
    /// Report WIP forever once a program/erase starts
    pub stuck_busy: bool,
    /// Factory unique ID returned by RDUID
    pub unique_id: [u8; 16],
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            manufacturer_id: opcodes::MANUFACTURER_ID, // ISSI
            device_id: 0x12,                           // IS25LP040E
            jedec_device_id: 0x4013,
            size: 512 * 1024,
            busy_polls: 2,
            stuck_busy: false,
            unique_id: [
                0x49, 0x53, 0x53, 0x49, 0x2D, 0x44, 0x55, 0x4D, 0x4D, 0x59, 0x00, 0x01, 0x02, 0x03,
                0x04, 0x05,
            ],
        }
    }
}

impl DummyConfig {
    /// Configuration for a device ID from the variant table
    ///
    /// Unknown IDs still answer with that ID but keep a 64 KiB array so the
    /// emulator stays usable.
    pub fn for_device(device_id: u8) -> Self {
        let size = chip::lookup(device_id).map_or(64 * 1024, |v| v.capacity as usize);
        Self {
            device_id,
            size,
            ..Default::default()
        }
    }

    /// Set the number of busy status polls after each program/erase
    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Set the manufacturer ID
    pub fn with_manufacturer_id(mut self, id: u8) -> Self {
        self.manufacturer_id = id;
        self
    }
}

/// One completed select..deselect window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Bytes sent by the host
    pub mosi: Vec<u8>,
    /// Bytes returned by the chip, one per host byte
    pub miso: Vec<u8>,
}

impl Transaction {
    /// The opcode byte, if anything was sent
    pub fn opcode(&self) -> Option<u8> {
        self.mosi.first().copied()
    }

    /// The 24-bit address following the opcode, if one was sent
    pub fn address(&self) -> Option<u32> {
        if self.mosi.len() < 1 + address::ADDRESS_BYTES {
            return None;
        }
        Some(address::decode([self.mosi[1], self.mosi[2], self.mosi[3]]))
    }

    /// Bytes sent after the opcode and address
    pub fn payload(&self) -> &[u8] {
        self.mosi.get(1 + address::ADDRESS_BYTES..).unwrap_or(&[])
    }

    /// Returns true if this window carried the given instruction
    pub fn is(&self, instruction: Instruction) -> bool {
        self.opcode() == Some(instruction.opcode())
    }
}

/// Dummy flash transport
///
/// Emulates an IS25LP chip in memory for testing purposes.
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    status: StatusRegister,
    function_reg: FunctionRegister,
    busy_remaining: u32,
    reset_enabled: bool,
    selected: bool,
    mosi: Vec<u8>,
    miso: Vec<u8>,
    transactions: Vec<Transaction>,
    ignored_commands: usize,
    total_delay_us: u64,
}

impl DummyFlash {
    /// Create a new dummy flash with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let data = alloc::vec![0xFF; config.size];
        Self {
            config,
            data,
            status: StatusRegister::empty(),
            function_reg: FunctionRegister::empty(),
            busy_remaining: 0,
            reset_enabled: false,
            selected: false,
            mosi: Vec::new(),
            miso: Vec::new(),
            transactions: Vec::new(),
            ignored_commands: 0,
            total_delay_us: 0,
        }
    }

    /// Create a new dummy flash with default configuration (IS25LP040E)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy flash with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the flash data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Current status register, including WIP
    pub fn status(&self) -> StatusRegister {
        if self.is_busy() {
            self.status | StatusRegister::WIP
        } else {
            self.status
        }
    }

    /// Make an in-progress or future program/erase never finish
    pub fn set_stuck_busy(&mut self, stuck: bool) {
        self.config.stuck_busy = stuck;
    }

    /// Completed transactions, oldest first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Drain the transaction log
    pub fn take_transactions(&mut self) -> Vec<Transaction> {
        core::mem::take(&mut self.transactions)
    }

    /// Number of commands dropped because WEL was clear or the chip was busy
    pub fn ignored_commands(&self) -> usize {
        self.ignored_commands
    }

    /// Sum of all delays requested by the host
    pub fn total_delay_us(&self) -> u64 {
        self.total_delay_us
    }

    /// Returns true while chip-select is asserted
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn is_busy(&self) -> bool {
        self.busy_remaining > 0 || (self.config.stuck_busy && self.status.contains(StatusRegister::WIP))
    }

    fn frame_address(&self) -> usize {
        let addr = address::decode([self.mosi[1], self.mosi[2], self.mosi[3]]) as usize;
        addr % self.data.len()
    }

    fn data_at(&self, start: usize, offset: usize) -> u8 {
        self.data[(start + offset) % self.data.len()]
    }

    /// Byte the chip drives on SO while the host clocks byte number `index`
    fn respond(&self, index: usize) -> u8 {
        if index == 0 {
            return IDLE_BYTE;
        }
        let opcode = self.mosi[0];

        if self.is_busy() && opcode != Instruction::Rdsr.opcode() {
            return IDLE_BYTE;
        }

        const ADDR_END: usize = 1 + address::ADDRESS_BYTES;

        match opcode {
            op if op == Instruction::Rdsr.opcode() => self.status().bits(),
            op if op == Instruction::Rdfr.opcode() => self.function_reg.bits(),
            op if op == Instruction::Rdmdid.opcode() && index >= ADDR_END => {
                // A0=1 swaps the order of the two ID bytes
                let swap = self.mosi[3] & 1;
                if (index - ADDR_END + swap as usize) % 2 == 0 {
                    self.config.manufacturer_id
                } else {
                    self.config.device_id
                }
            }
            op if op == Instruction::Rdjdid.opcode() => match index {
                1 => self.config.manufacturer_id,
                2 => (self.config.jedec_device_id >> 8) as u8,
                3 => self.config.jedec_device_id as u8,
                _ => IDLE_BYTE,
            },
            op if op == Instruction::Nord.opcode() && index >= ADDR_END => {
                self.data_at(self.frame_address(), index - ADDR_END)
            }
            op if op == Instruction::Frd.opcode() && index > ADDR_END => {
                self.data_at(self.frame_address(), index - ADDR_END - 1)
            }
            op if op == Instruction::Rduid.opcode() && index > ADDR_END => {
                let i = (index - ADDR_END - 1) % self.config.unique_id.len();
                self.config.unique_id[i]
            }
            _ => IDLE_BYTE,
        }
    }

    /// Act on a completed window, as the chip does on the rising edge of CS#
    fn execute(&mut self) {
        let Some(&opcode) = self.mosi.first() else {
            return;
        };

        if opcode == Instruction::Rdsr.opcode() {
            if self.busy_remaining > 0 {
                self.busy_remaining -= 1;
                if self.busy_remaining == 0 {
                    self.complete();
                }
            }
            return;
        }

        if self.is_busy() {
            log::debug!("dummy: ignoring opcode 0x{:02X} while busy", opcode);
            self.ignored_commands += 1;
            return;
        }

        let reset_enabled = core::mem::take(&mut self.reset_enabled);

        match opcode {
            op if op == Instruction::Wren.opcode() => self.status.insert(StatusRegister::WEL),
            op if op == Instruction::Wrdi.opcode() => self.status.remove(StatusRegister::WEL),
            op if op == Instruction::Rsten.opcode() => self.reset_enabled = true,
            op if op == Instruction::Rst.opcode() => {
                if reset_enabled {
                    log::debug!("dummy: software reset");
                    self.status.remove(StatusRegister::WEL | StatusRegister::WIP);
                    self.function_reg.remove(FunctionRegister::PSUS | FunctionRegister::ESUS);
                } else {
                    self.ignored_commands += 1;
                }
            }
            op if op == Instruction::Pp.opcode() => {
                if self.accept_mutation(opcode, true) {
                    self.program();
                    self.start_busy();
                }
            }
            op if op == Instruction::Ser.opcode() || op == opcodes::SER_ALT => {
                if self.accept_mutation(opcode, true) {
                    self.erase_region(Geometry::SECTOR_SIZE as usize);
                    self.start_busy();
                }
            }
            op if op == Instruction::Ber32.opcode() => {
                if self.accept_mutation(opcode, true) {
                    self.erase_region(Geometry::BLOCK32_SIZE as usize);
                    self.start_busy();
                }
            }
            op if op == Instruction::Ber64.opcode() => {
                if self.accept_mutation(opcode, true) {
                    self.erase_region(Geometry::BLOCK64_SIZE as usize);
                    self.start_busy();
                }
            }
            op if op == Instruction::Cer.opcode() || op == opcodes::CER_ALT => {
                if self.accept_mutation(opcode, false) {
                    self.data.fill(0xFF);
                    self.start_busy();
                }
            }
            _ => {}
        }
    }

    /// Check WEL (and the address phase) before a program/erase
    fn accept_mutation(&mut self, opcode: u8, needs_address: bool) -> bool {
        if !self.status.contains(StatusRegister::WEL) {
            log::debug!("dummy: opcode 0x{:02X} ignored, WEL not set", opcode);
            self.ignored_commands += 1;
            return false;
        }
        if needs_address && self.mosi.len() < 1 + address::ADDRESS_BYTES {
            log::debug!("dummy: opcode 0x{:02X} ignored, incomplete address", opcode);
            self.status.remove(StatusRegister::WEL);
            self.ignored_commands += 1;
            return false;
        }
        true
    }

    fn program(&mut self) {
        let page_size = Geometry::PAGE_SIZE as usize;
        let addr = self.frame_address();
        let page_base = addr - addr % page_size;
        let offset = addr % page_size;

        // The page buffer wraps; later bytes overwrite earlier ones
        let mut buffer = [0xFFu8; Geometry::PAGE_SIZE as usize];
        for (i, &byte) in self.mosi[1 + address::ADDRESS_BYTES..].iter().enumerate() {
            buffer[(offset + i) % page_size] = byte;
        }

        // Flash programming: can only change 1 -> 0
        for (i, &byte) in buffer.iter().enumerate() {
            if let Some(cell) = self.data.get_mut(page_base + i) {
                *cell &= byte;
            }
        }
    }

    fn erase_region(&mut self, erase_size: usize) {
        let addr = self.frame_address();
        let start = addr - addr % erase_size;
        let end = core::cmp::min(start + erase_size, self.data.len());
        self.data[start..end].fill(0xFF);
    }

    fn start_busy(&mut self) {
        self.status.insert(StatusRegister::WIP);
        self.busy_remaining = self.config.busy_polls;
        if self.busy_remaining == 0 && !self.config.stuck_busy {
            self.complete();
        }
    }

    fn complete(&mut self) {
        if self.config.stuck_busy {
            // Keep WIP so the next poll still reports busy
            self.busy_remaining = 1;
            return;
        }
        self.status.remove(StatusRegister::WIP | StatusRegister::WEL);
    }
}

impl Transport for DummyFlash {
    fn select(&mut self) -> Result<()> {
        if self.selected {
            return Err(Error::TransportFailed);
        }
        self.selected = true;
        self.mosi.clear();
        self.miso.clear();
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        if !self.selected {
            return Err(Error::TransportFailed);
        }
        self.selected = false;
        self.execute();
        log::trace!("dummy: {:02X?}", self.mosi);
        self.transactions.push(Transaction {
            mosi: core::mem::take(&mut self.mosi),
            miso: core::mem::take(&mut self.miso),
        });
        Ok(())
    }

    fn transfer(&mut self, byte: u8) -> Result<u8> {
        if !self.selected {
            return Err(Error::NotSelected);
        }
        let index = self.mosi.len();
        self.mosi.push(byte);
        let response = self.respond(index);
        self.miso.push(response);
        Ok(response)
    }

    fn delay_us(&mut self, us: u32) {
        // No real delay needed for in-memory operations
        self.total_delay_us += us as u64;
    }
}
