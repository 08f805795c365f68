//! IS25LP command sequences
//!
//! Each function here is one or more complete bus transactions, each
//! bracketed by select/deselect. Mutating sequences always issue WREN in
//! its own transaction first; the chip clears WEL after every program or
//! erase, so it has to be set again every time.
//!
//! Program and erase start on deselect and run asynchronously inside the
//! chip. The functions in this module return as soon as the command has
//! been clocked in; use [`wait_ready`] to learn when it has finished.

use super::encoder::{end_transaction, receive_data, send_command, send_command_only, send_data};
use super::wait::WaitPolicy;
use crate::error::{Error, Result};
use crate::spi::{FunctionRegister, Instruction, StatusRegister, DUMMY_BYTE};
use crate::transport::Transport;
use maybe_async::maybe_async;

/// Send an opcode-only instruction in its own transaction
#[maybe_async]
pub async fn simple<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
) -> Result<()> {
    transport.select().await?;
    let result = send_command_only(transport, instruction).await;
    end_transaction(transport, result).await
}

/// Send the Write Enable command
#[maybe_async]
pub async fn write_enable<T: Transport + ?Sized>(transport: &mut T) -> Result<()> {
    simple(transport, Instruction::Wren).await
}

/// Send the Write Disable command
#[maybe_async]
pub async fn write_disable<T: Transport + ?Sized>(transport: &mut T) -> Result<()> {
    simple(transport, Instruction::Wrdi).await
}

#[maybe_async]
async fn read_register_body<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
) -> Result<u8> {
    send_command_only(transport, instruction).await?;
    receive_data(transport).await
}

/// Read a one-byte register (RDSR, RDFR)
#[maybe_async]
pub async fn read_register<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
) -> Result<u8> {
    transport.select().await?;
    let result = read_register_body(transport, instruction).await;
    end_transaction(transport, result).await
}

/// Read the status register
#[maybe_async]
pub async fn read_status<T: Transport + ?Sized>(transport: &mut T) -> Result<StatusRegister> {
    let bits = read_register(transport, Instruction::Rdsr).await?;
    Ok(StatusRegister::from_bits_retain(bits))
}

/// Read the function register
#[maybe_async]
pub async fn read_function_register<T: Transport + ?Sized>(
    transport: &mut T,
) -> Result<FunctionRegister> {
    let bits = read_register(transport, Instruction::Rdfr).await?;
    Ok(FunctionRegister::from_bits_retain(bits))
}

/// Check if a write or erase operation is in progress
#[maybe_async]
pub async fn is_busy<T: Transport + ?Sized>(transport: &mut T) -> Result<bool> {
    Ok(read_status(transport).await?.is_busy())
}

/// Check if the Write Enable Latch is set
#[maybe_async]
pub async fn check_wel<T: Transport + ?Sized>(transport: &mut T) -> Result<bool> {
    Ok(read_status(transport).await?.is_write_enabled())
}

/// Wait for the WIP (Write In Progress) bit to clear
///
/// Every poll is a fresh RDSR transaction. Between polls the transport is
/// asked to sleep for `policy.poll_delay_us`. Returns [`Error::Timeout`]
/// once the policy's poll budget is spent with WIP still set.
#[maybe_async]
pub async fn wait_ready<T: Transport + ?Sized>(transport: &mut T, policy: WaitPolicy) -> Result<()> {
    let max_polls = policy.max_polls();
    let mut polls: u32 = 0;

    loop {
        let status = read_status(transport).await?;
        polls = polls.saturating_add(1);

        if !status.is_busy() {
            log::trace!("WIP cleared after {} status poll(s)", polls);
            return Ok(());
        }

        if let Some(max) = max_polls {
            if polls >= max {
                log::warn!(
                    "Chip still busy after {} polls (status 0x{:02X})",
                    polls,
                    status.bits()
                );
                return Err(Error::Timeout);
            }
        }

        if policy.poll_delay_us > 0 {
            transport.delay_us(policy.poll_delay_us).await;
        }
    }
}

#[maybe_async]
async fn read_manufacturer_id_body<T: Transport + ?Sized>(transport: &mut T) -> Result<u16> {
    send_command(transport, Instruction::Rdmdid, 0x000000).await?;
    let manufacturer = receive_data(transport).await?;
    let device = receive_data(transport).await?;
    Ok(((manufacturer as u16) << 8) | device as u16)
}

/// Read the manufacturer and device ID (RDMDID with a zero address)
///
/// Returns the manufacturer ID in the high byte and the device ID in the
/// low byte.
#[maybe_async]
pub async fn read_manufacturer_id<T: Transport + ?Sized>(transport: &mut T) -> Result<u16> {
    transport.select().await?;
    let result = read_manufacturer_id_body(transport).await;
    end_transaction(transport, result).await
}

#[maybe_async]
async fn read_jedec_id_body<T: Transport + ?Sized>(transport: &mut T) -> Result<(u8, u16)> {
    send_command_only(transport, Instruction::Rdjdid).await?;
    let manufacturer = receive_data(transport).await?;
    let memory_type = receive_data(transport).await?;
    let capacity = receive_data(transport).await?;
    Ok((manufacturer, ((memory_type as u16) << 8) | capacity as u16))
}

/// Read the JEDEC ID
///
/// Returns (manufacturer_id, device_id) where device_id is memory type in
/// the high byte and capacity code in the low byte.
#[maybe_async]
pub async fn read_jedec_id<T: Transport + ?Sized>(transport: &mut T) -> Result<(u8, u16)> {
    transport.select().await?;
    let result = read_jedec_id_body(transport).await;
    end_transaction(transport, result).await
}

#[maybe_async]
async fn read_body<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
    addr: u32,
    dummy_bytes: usize,
    buf: &mut [u8],
) -> Result<()> {
    send_command(transport, instruction, addr).await?;
    for _ in 0..dummy_bytes {
        send_data(transport, DUMMY_BYTE).await?;
    }
    for byte in buf.iter_mut() {
        *byte = receive_data(transport).await?;
    }
    Ok(())
}

/// Read `buf.len()` bytes starting at `addr` in one continuous session
///
/// The chip advances its address pointer every byte and wraps to zero past
/// the top of the array. The wrap is not detected here.
#[maybe_async]
pub async fn read<T: Transport + ?Sized>(transport: &mut T, addr: u32, buf: &mut [u8]) -> Result<()> {
    transport.select().await?;
    let result = read_body(transport, Instruction::Nord, addr, 0, buf).await;
    end_transaction(transport, result).await
}

/// Read using FRD (one dummy byte between address and data)
#[maybe_async]
pub async fn fast_read<T: Transport + ?Sized>(
    transport: &mut T,
    addr: u32,
    buf: &mut [u8],
) -> Result<()> {
    transport.select().await?;
    let result = read_body(transport, Instruction::Frd, addr, 1, buf).await;
    end_transaction(transport, result).await
}

/// Read the factory-programmed unique ID
///
/// RDUID takes three dummy address bytes and one dummy byte.
#[maybe_async]
pub async fn read_unique_id<T: Transport + ?Sized>(transport: &mut T, buf: &mut [u8]) -> Result<()> {
    transport.select().await?;
    let result = read_body(transport, Instruction::Rduid, 0x000000, 1, buf).await;
    end_transaction(transport, result).await
}

#[maybe_async]
async fn program_body<T: Transport + ?Sized>(
    transport: &mut T,
    addr: u32,
    data: &[u8],
) -> Result<()> {
    send_command(transport, Instruction::Pp, addr).await?;
    for &byte in data {
        send_data(transport, byte).await?;
    }
    Ok(())
}

/// Issue WREN + PP for `data` at `addr` without waiting for completion
///
/// The chip's page buffer wraps at the boundary of the page containing
/// `addr`: bytes past the end of that page land at its start, overwriting
/// bytes sent earlier in the same command.
#[maybe_async]
pub async fn program_page<T: Transport + ?Sized>(
    transport: &mut T,
    addr: u32,
    data: &[u8],
) -> Result<()> {
    write_enable(transport).await?;

    transport.select().await?;
    let result = program_body(transport, addr, data).await;
    // Programming starts here, on deselect
    end_transaction(transport, result).await
}

#[maybe_async]
async fn erase_body<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
    addr: Option<u32>,
) -> Result<()> {
    match addr {
        Some(addr) => send_command(transport, instruction, addr).await,
        None => send_command_only(transport, instruction).await,
    }
}

/// Issue WREN + an erase instruction without waiting for completion
///
/// `addr` is `None` for chip erase, which has no address phase. Any other
/// instruction, or an address phase that does not match it, is rejected
/// with [`Error::InvalidParameter`] before anything is sent.
#[maybe_async]
pub async fn erase<T: Transport + ?Sized>(
    transport: &mut T,
    instruction: Instruction,
    addr: Option<u32>,
) -> Result<()> {
    let valid = match instruction {
        Instruction::Ser | Instruction::Ber32 | Instruction::Ber64 => addr.is_some(),
        Instruction::Cer => addr.is_none(),
        _ => false,
    };
    if !valid {
        return Err(Error::InvalidParameter);
    }

    write_enable(transport).await?;

    transport.select().await?;
    let result = erase_body(transport, instruction, addr).await;
    // Erase starts here, on deselect
    end_transaction(transport, result).await
}

/// Send software reset sequence (RSTEN then RST, in separate transactions)
#[maybe_async]
pub async fn software_reset<T: Transport + ?Sized>(transport: &mut T) -> Result<()> {
    simple(transport, Instruction::Rsten).await?;
    simple(transport, Instruction::Rst).await?;
    transport.delay_us(100).await;
    Ok(())
}
