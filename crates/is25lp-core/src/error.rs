//! Error types for is25lp-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.
//!
//! The IS25LP protocol itself has no acknowledgement channel: a command the
//! chip ignores (for example a program without a preceding WREN) is not
//! observable here. The errors below therefore only cover what the host can
//! actually see: a transport failing, or the busy bit never clearing.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Bus errors
    /// The bus transport reported a failure
    TransportFailed,
    /// A byte was clocked while chip-select was not asserted
    NotSelected,

    // Chip errors
    /// The busy bit did not clear within the wait policy
    Timeout,
    /// No IS25LP device answered (manufacturer ID mismatch)
    ChipNotFound,

    // Caller errors
    /// A parameter was rejected before touching the bus
    InvalidParameter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFailed => write!(f, "bus transport failed"),
            Self::NotSelected => write!(f, "transfer outside of a chip-select window"),
            Self::Timeout => write!(f, "timed out waiting for write-in-progress to clear"),
            Self::ChipNotFound => write!(f, "IS25LP flash chip not found"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
