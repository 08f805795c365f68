//! Busy/completion polling policy

/// How long to keep polling WIP before giving up
///
/// The chip has no hardware timeout: a faulty or wrong device can report
/// busy forever. A bounded policy turns that into [`Error::Timeout`];
/// [`WaitPolicy::unbounded`] spins until WIP clears, as the bare protocol
/// would.
///
/// [`Error::Timeout`]: crate::Error::Timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay in microseconds between status register polls
    pub poll_delay_us: u32,
    /// Give up after this many microseconds, or never if `None`
    pub timeout_us: Option<u32>,
}

impl WaitPolicy {
    /// Page program: poll every 10us, timeout after 10ms (typical is 0.2-0.8ms)
    pub const PAGE_PROGRAM: Self = Self::new(10, 10_000);
    /// 4KB sector erase: poll every 10ms, timeout after 1s (typical 45-300ms)
    pub const SECTOR_ERASE: Self = Self::new(10_000, 1_000_000);
    /// 32KB/64KB block erase: poll every 100ms, timeout after 4s
    pub const BLOCK_ERASE: Self = Self::new(100_000, 4_000_000);
    /// Chip erase: poll every 1s, timeout after 200s
    pub const CHIP_ERASE: Self = Self::new(1_000_000, 200_000_000);

    /// A bounded policy
    pub const fn new(poll_delay_us: u32, timeout_us: u32) -> Self {
        Self {
            poll_delay_us,
            timeout_us: Some(timeout_us),
        }
    }

    /// Poll until WIP clears, however long that takes
    pub const fn unbounded(poll_delay_us: u32) -> Self {
        Self {
            poll_delay_us,
            timeout_us: None,
        }
    }

    /// Maximum number of status reads, or `None` when unbounded
    ///
    /// At least one read is always made so an idle chip never times out.
    pub const fn max_polls(&self) -> Option<u32> {
        match self.timeout_us {
            None => None,
            Some(timeout_us) => {
                let polls = if self.poll_delay_us > 0 {
                    timeout_us / self.poll_delay_us
                } else {
                    timeout_us // Fall back to polling once per microsecond
                };
                if polls == 0 {
                    Some(1)
                } else {
                    Some(polls)
                }
            }
        }
    }
}
