//! Protocol implementation
//!
//! This module contains the command encoder and the IS25LP command
//! sequences built on it.
//!
//! Uses `maybe_async` to support both sync and async modes:
//! - With `is_sync` feature: blocking/synchronous
//! - Without `is_sync` feature: async

mod commands;
mod encoder;
mod wait;

pub use commands::*;
pub use encoder::*;
pub use wait::WaitPolicy;
