//! CLI command implementations
//!
//! Every command works on an [`Is25lp`] driver over any [`Transport`], so
//! the same code runs against the emulator in tests and against real
//! hardware from the binary.

pub mod demo;
pub mod erase;
mod list;
pub mod probe;
pub mod read;
pub mod status;
pub mod write;

pub use list::{list_chips, list_programmers};

use crate::transports;
use indicatif::{ProgressBar, ProgressStyle};
use is25lp_core::transport::Transport;
use is25lp_core::{Error, Is25lp};

/// Driver over whichever transport the user selected
pub type Flash = Is25lp<Box<dyn Transport + Send>>;

/// Open a transport and wrap it in a driver, without touching the chip
pub fn open(programmer: &str) -> Result<Flash, Box<dyn std::error::Error>> {
    let transport = transports::open_transport(programmer)?;
    Ok(Is25lp::new(transport))
}

/// Open a transport and identify the chip
///
/// Fails with [`Error::ChipNotFound`] if the manufacturer ID is not ISSI's.
pub fn open_initialized(programmer: &str) -> Result<Flash, Box<dyn std::error::Error>> {
    let mut flash = open(programmer)?;
    require_chip(&mut flash)?;
    Ok(flash)
}

/// Identify the chip, print what was found and reject foreign parts
pub fn require_chip<T: Transport>(flash: &mut Is25lp<T>) -> Result<(), Box<dyn std::error::Error>> {
    if !flash.initialize()? {
        return Err(Box::new(Error::ChipNotFound));
    }

    let id = flash.identify()?;
    match id.variant {
        Some(variant) => println!(
            "Found: {} ({})",
            variant.name,
            format_size(variant.capacity)
        ),
        None => println!(
            "Found: unknown ISSI device 0x{:02X} (capacity unknown)",
            id.device_id
        ),
    }
    Ok(())
}

/// Byte progress bar in the style used by every command
pub fn progress_bar(total: u64, phase: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                phase
            ))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Human-readable size
pub fn format_size(bytes: u32) -> String {
    if bytes >= 1024 * 1024 && bytes % (1024 * 1024) == 0 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(all(test, feature = "dummy"))]
pub(crate) mod test_util {
    use is25lp_core::Is25lp;
    use is25lp_dummy::{DummyConfig, DummyFlash};
    use std::path::PathBuf;

    /// Driver over a fresh emulator
    pub fn dummy_flash(config: DummyConfig) -> Is25lp<DummyFlash> {
        Is25lp::new(DummyFlash::new(config))
    }

    /// Per-test scratch file under the system temp directory
    pub fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("is25lp-{}-{}", std::process::id(), name))
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::test_util::dummy_flash;
    use super::*;
    use is25lp_dummy::DummyConfig;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512 * 1024), "512 KiB");
        assert_eq!(format_size(2 * 1024 * 1024), "2 MiB");
        assert_eq!(format_size(100), "100 B");
    }

    #[test]
    fn test_require_chip_rejects_other_vendor() {
        let mut flash = dummy_flash(DummyConfig::default().with_manufacturer_id(0xEF));
        let err = require_chip(&mut flash).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::ChipNotFound));
    }

    #[test]
    fn test_require_chip_accepts_unknown_device() {
        let mut flash = dummy_flash(DummyConfig::for_device(0x42));
        require_chip(&mut flash).unwrap();
        assert_eq!(flash.geometry().memory_size(), 0);
    }
}
