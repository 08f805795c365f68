//! Transport traits and abstractions
//!
//! This module defines the bus interface that concrete transports must
//! implement to carry IS25LP instructions.

pub mod bitbang;
mod traits;

pub use bitbang::BitbangSpiMaster;
pub use traits::*;
