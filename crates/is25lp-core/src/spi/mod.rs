//! SPI-level definitions
//!
//! This module provides the IS25LP instruction set, the 24-bit address
//! encoding and the register bit layouts.

pub mod address;
pub mod opcodes;
mod registers;

pub use address::{ADDRESS_BYTES, ADDRESS_MASK};
pub use opcodes::{Instruction, DUMMY_BYTE, MANUFACTURER_ID};
pub use registers::{FunctionRegister, StatusRegister};
