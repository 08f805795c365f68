//! is25lp-core - Driver core for ISSI IS25LP/IS25WP serial NOR flash
//!
//! This crate implements the command/response protocol of the IS25LP family
//! on top of a byte-level serial bus, together with the chip's write/erase
//! state machine: write-enable handshake, page programming with in-page
//! wrap, sector/block/chip erase and busy polling. It is designed to be
//! `no_std` compatible for use in embedded environments.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable boxed transports
//! - `is_sync` - Compile the driver as blocking code instead of `async`
//!
//! # Example
//!
//! ```ignore
//! use is25lp_core::{flash::Is25lp, transport::Transport};
//!
//! fn dump_first_page<T: Transport>(transport: T) -> is25lp_core::Result<()> {
//!     let mut flash = Is25lp::new(transport);
//!     if !flash.initialize()? {
//!         return Err(is25lp_core::Error::ChipNotFound);
//!     }
//!     let mut page = [0u8; 256];
//!     flash.read_bytes(0, &mut page)?;
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
// Allow async fn in traits - we use maybe-async for dual sync/async support
#![allow(async_fn_in_trait)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod chip;
pub mod error;
pub mod flash;
pub mod geometry;
pub mod protocol;
pub mod spi;
pub mod transport;

pub use error::{Error, Result};
pub use flash::Is25lp;
pub use geometry::Geometry;
