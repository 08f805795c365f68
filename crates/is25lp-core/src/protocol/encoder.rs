//! Command encoder
//!
//! Unframed bus primitives: these write inside a select window the caller
//! has already opened and never touch chip-select themselves.

use crate::error::Result;
use crate::spi::{address, Instruction, DUMMY_BYTE};
use crate::transport::Transport;
use maybe_async::maybe_async;

/// Send an opcode followed by a 24-bit big-endian address
///
/// The three address bytes are always sent, whatever the instruction's
/// actual address width. Bits above 23 are dropped.
#[maybe_async]
pub async fn send_command<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
    addr: u32,
) -> Result<()> {
    transport.transfer(instruction.opcode()).await?;
    for byte in address::encode(addr) {
        transport.transfer(byte).await?;
    }
    Ok(())
}

/// Send an opcode with no address phase
#[maybe_async]
pub async fn send_command_only<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
) -> Result<()> {
    transport.transfer(instruction.opcode()).await?;
    Ok(())
}

/// Send one payload byte, discarding whatever the chip clocks back
#[maybe_async]
pub async fn send_data<T: Transport + ?Sized>(transport: &mut T, data: u8) -> Result<()> {
    transport.transfer(data).await?;
    Ok(())
}

/// Receive one byte by clocking out a dummy byte
#[maybe_async]
pub async fn receive_data<T: Transport + ?Sized>(transport: &mut T) -> Result<u8> {
    transport.transfer(DUMMY_BYTE).await
}

/// De-assert chip-select after a transaction body, keeping the body's error first
///
/// Deselect is always attempted so a failed transfer never leaves CS# low.
#[maybe_async]
pub async fn end_transaction<T: Transport + ?Sized, R>(
    transport: &mut T,
    result: Result<R>,
) -> Result<R> {
    let deselected = transport.deselect().await;
    let value = result?;
    deselected?;
    Ok(value)
}
