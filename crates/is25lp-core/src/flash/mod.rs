//! High-level flash driver
//!
//! This module provides the `Is25lp` driver struct and its configuration.

mod config;
mod driver;

pub use config::{DriverConfig, Timeouts};
pub use driver::Is25lp;
