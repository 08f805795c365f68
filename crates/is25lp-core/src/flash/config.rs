//! Driver configuration

use crate::protocol::WaitPolicy;

/// Wait policies used by the synchronous program/erase operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// After a page program
    pub page_program: WaitPolicy,
    /// After a 4 KiB sector erase
    pub sector_erase: WaitPolicy,
    /// After a 32 KiB or 64 KiB block erase
    pub block_erase: WaitPolicy,
    /// After a chip erase, and for [`Is25lp::wait_ready`](super::Is25lp::wait_ready)
    pub chip_erase: WaitPolicy,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            page_program: WaitPolicy::PAGE_PROGRAM,
            sector_erase: WaitPolicy::SECTOR_ERASE,
            block_erase: WaitPolicy::BLOCK_ERASE,
            chip_erase: WaitPolicy::CHIP_ERASE,
        }
    }
}

impl Timeouts {
    /// Poll forever after every operation
    pub const fn unbounded(poll_delay_us: u32) -> Self {
        let policy = WaitPolicy::unbounded(poll_delay_us);
        Self {
            page_program: policy,
            sector_erase: policy,
            block_erase: policy,
            chip_erase: policy,
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverConfig {
    /// Busy-wait policies
    pub timeouts: Timeouts,
}

impl DriverConfig {
    /// Replace the busy-wait policies
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}
