//! is25lp-linux-gpio - Linux GPIO bitbang transport
//!
//! This crate drives an IS25LP chip from plain GPIO lines using the Linux
//! character device GPIO interface (gpiocdev), so no SPI controller is
//! needed. It is slow but works on any board that exposes
//! `/dev/gpiochipN`, such as a Raspberry Pi.
//!
//! # Example
//!
//! ```no_run
//! use is25lp_core::Is25lp;
//! use is25lp_linux_gpio::{LinuxGpioSpi, LinuxGpioSpiConfig};
//!
//! let config = LinuxGpioSpiConfig::new("/dev/gpiochip0", 25, 11, 10, 9);
//! //                                    device          CS  SCK MOSI MISO
//! let transport = LinuxGpioSpi::open(&config)?;
//!
//! let mut flash = Is25lp::new(transport);
//! if flash.initialize()? {
//!     println!("{} bytes", flash.geometry().memory_size());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the is25lp CLI
//!
//! ```bash
//! is25lp probe -p linux_gpio:dev=/dev/gpiochip0,cs=25,sck=11,mosi=10,miso=9
//! is25lp read -p linux_gpio:gpiochip=0,cs=25,sck=11,mosi=10,miso=9,spispeed=500 -o flash.bin
//! ```
//!
//! # Wiring
//!
//! | Flash Pin | GPIO Function | Description |
//! |-----------|---------------|-------------|
//! | CE#       | CS (output)   | Chip Enable |
//! | SCK       | SCK (output)  | Serial Clock |
//! | SI        | MOSI (output) | Serial Data In |
//! | SO        | MISO (input)  | Serial Data Out |
//! | WP#       | 3.3V          | Write Protect (tie high) |
//! | HOLD#     | 3.3V          | Hold (tie high) |

pub mod device;
pub mod error;

pub use device::{parse_options, LinuxGpioSpi, LinuxGpioSpiConfig};
pub use error::{LinuxGpioError, Result};

/// Open a Linux GPIO transport and return it boxed
///
/// This is a convenience function for the CLI transport dispatch; see
/// [`parse_options`] for the accepted keys.
pub fn open_linux_gpio(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn is25lp_core::transport::Transport + Send>, Box<dyn std::error::Error>>
{
    let config = parse_options(options)?;
    let transport = LinuxGpioSpi::open(&config)?;
    Ok(Box::new(transport))
}
