//! Linux GPIO bitbang transport
//!
//! `LinuxGpioSpi` drives CS#, SCK and SI from GPIO outputs and samples SO
//! from a GPIO input, using the character device interface (gpiocdev).
//! Only single-bit SPI mode 0 is generated.

use std::cell::Cell;
use std::time::Duration;

use crate::error::{LinuxGpioError, Result};

use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

use is25lp_core::error::{Error as CoreError, Result as CoreResult};
use is25lp_core::transport::bitbang::{self, BitbangSpiMaster};
use is25lp_core::transport::Transport;

/// GPIO line indices
#[derive(Debug, Clone, Copy)]
enum Line {
    Cs = 0,
    Sck = 1,
    Mosi = 2,
    Miso = 3,
}

const LINE_COUNT: usize = 4;

/// Default half-period delay in nanoseconds (for ~100 kHz SPI clock)
const DEFAULT_HALF_PERIOD_NS: u64 = 5000;

/// Configuration for opening a Linux GPIO SPI transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxGpioSpiConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// CS# GPIO line offset
    pub cs: Offset,
    /// SCK GPIO line offset
    pub sck: Offset,
    /// SI (host MOSI) GPIO line offset
    pub mosi: Offset,
    /// SO (host MISO) GPIO line offset
    pub miso: Offset,
    /// Half-period delay in nanoseconds
    pub half_period_ns: u64,
}

impl Default for LinuxGpioSpiConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            cs: 0,
            sck: 0,
            mosi: 0,
            miso: 0,
            half_period_ns: DEFAULT_HALF_PERIOD_NS,
        }
    }
}

impl LinuxGpioSpiConfig {
    /// Create a new configuration with the given device path and pins
    pub fn new(
        device: impl Into<String>,
        cs: Offset,
        sck: Offset,
        mosi: Offset,
        miso: Offset,
    ) -> Self {
        Self {
            device: device.into(),
            cs,
            sck,
            mosi,
            miso,
            ..Default::default()
        }
    }

    /// Set the half-period delay in nanoseconds
    pub fn with_half_period_ns(mut self, ns: u64) -> Self {
        self.half_period_ns = ns;
        self
    }

    /// Set SPI speed in Hz (approximate, via half-period calculation)
    pub fn with_speed_hz(mut self, hz: u32) -> Self {
        // half_period = 1_000_000_000 / (2 * frequency) in nanoseconds
        if hz > 0 {
            self.half_period_ns = 500_000_000 / hz as u64;
        }
        self
    }

    fn offsets(&self) -> [Offset; LINE_COUNT] {
        let mut offsets = [0; LINE_COUNT];
        offsets[Line::Cs as usize] = self.cs;
        offsets[Line::Sck as usize] = self.sck;
        offsets[Line::Mosi as usize] = self.mosi;
        offsets[Line::Miso as usize] = self.miso;
        offsets
    }

    fn check_distinct_lines(&self) -> Result<()> {
        let offsets = self.offsets();
        for (i, a) in offsets.iter().enumerate() {
            if offsets[i + 1..].contains(a) {
                return Err(LinuxGpioError::DuplicateLine(*a));
            }
        }
        Ok(())
    }
}

/// IS25LP transport over bitbanged Linux GPIO lines
///
/// GPIO writes cannot report failure through [`BitbangSpiMaster`], so a
/// failing line is logged and remembered; the next [`Transport`] call
/// returns [`CoreError::TransportFailed`].
pub struct LinuxGpioSpi {
    request: Request,
    offsets: [Offset; LINE_COUNT],
    half_period_ns: u64,
    fault: Cell<bool>,
}

impl LinuxGpioSpi {
    /// Open the GPIO lines described by `config`
    ///
    /// CS# starts high (deselected) and SCK starts low, so the chip sees
    /// mode-0 idle from the first edge.
    pub fn open(config: &LinuxGpioSpiConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }
        config.check_distinct_lines()?;

        log::debug!("linux_gpio: Opening device {}", config.device);

        let mut req_config = Config::default();
        req_config.with_line(config.cs).as_output(Value::Active); // CS# high
        req_config.with_line(config.sck).as_output(Value::Inactive);
        req_config.with_line(config.mosi).as_output(Value::Inactive);
        req_config.with_line(config.miso).as_input();

        let request = Request::from_config(req_config)
            .on_chip(&config.device)
            .with_consumer("is25lp")
            .request()
            .map_err(|source| LinuxGpioError::LineRequestFailed {
                path: config.device.clone(),
                source,
            })?;

        log::info!(
            "linux_gpio: Opened {} (cs={}, sck={}, mosi={}, miso={}, half period {} ns)",
            config.device,
            config.cs,
            config.sck,
            config.mosi,
            config.miso,
            config.half_period_ns
        );

        Ok(Self {
            request,
            offsets: config.offsets(),
            half_period_ns: config.half_period_ns,
            fault: Cell::new(false),
        })
    }

    fn set_line(&self, line: Line, high: bool) {
        let value = if high { Value::Active } else { Value::Inactive };
        if let Err(e) = self.request.set_value(self.offsets[line as usize], value) {
            log::error!("Failed to set {:?}: {}", line, e);
            self.fault.set(true);
        }
    }

    fn check_fault(&self) -> CoreResult<()> {
        if self.fault.replace(false) {
            Err(CoreError::TransportFailed)
        } else {
            Ok(())
        }
    }
}

impl BitbangSpiMaster for LinuxGpioSpi {
    fn set_cs(&mut self, active: bool) {
        // CS is active low
        self.set_line(Line::Cs, !active);
    }

    fn set_sck(&mut self, high: bool) {
        self.set_line(Line::Sck, high);
    }

    fn set_mosi(&mut self, high: bool) {
        self.set_line(Line::Mosi, high);
    }

    fn get_miso(&self) -> bool {
        match self.request.value(self.offsets[Line::Miso as usize]) {
            Ok(Value::Active) => true,
            Ok(Value::Inactive) => false,
            Err(e) => {
                log::error!("Failed to get MISO: {}", e);
                self.fault.set(true);
                false
            }
        }
    }

    fn half_period_delay(&self) {
        if self.half_period_ns > 0 {
            std::thread::sleep(Duration::from_nanos(self.half_period_ns));
        }
    }
}

impl Transport for LinuxGpioSpi {
    fn select(&mut self) -> CoreResult<()> {
        bitbang::begin(self);
        self.check_fault()
    }

    fn deselect(&mut self) -> CoreResult<()> {
        bitbang::end(self);
        self.check_fault()
    }

    fn transfer(&mut self, byte: u8) -> CoreResult<u8> {
        let received = bitbang::transfer_byte(self, byte);
        self.check_fault()?;
        Ok(received)
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }
}

fn parse_offset(name: &'static str, value: &str) -> Result<Offset> {
    value.parse().map_err(|_| LinuxGpioError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Parse transport options from a list of key-value pairs
///
/// # Supported Options
///
/// - `dev=/dev/gpiochipN` - GPIO chip device path (or use gpiochip)
/// - `gpiochip=N` - GPIO chip number (alternative to dev)
/// - `cs=N` - CS# GPIO line offset (required)
/// - `sck=N` - SCK GPIO line offset (required)
/// - `mosi=N` - SI GPIO line offset (required)
/// - `miso=N` - SO GPIO line offset (required)
/// - `spispeed=N` - SPI speed in kHz (optional, default ~100 kHz)
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxGpioSpiConfig> {
    let mut config = LinuxGpioSpiConfig::default();
    let mut cs = None;
    let mut sck = None;
    let mut mosi = None;
    let mut miso = None;
    let mut gpiochip: Option<u32> = None;

    for &(key, value) in options {
        match key {
            "dev" => config.device = value.to_string(),
            "gpiochip" => gpiochip = Some(parse_offset("gpiochip", value)?),
            "cs" => cs = Some(parse_offset("cs", value)?),
            "sck" => sck = Some(parse_offset("sck", value)?),
            "mosi" => mosi = Some(parse_offset("mosi", value)?),
            "miso" => miso = Some(parse_offset("miso", value)?),
            "spispeed" => {
                let speed_khz: u32 = value.parse().map_err(|_| LinuxGpioError::InvalidValue {
                    name: "spispeed",
                    value: value.to_string(),
                })?;
                config = config.with_speed_hz(speed_khz.saturating_mul(1000));
            }
            _ => {
                log::warn!("linux_gpio: Unknown option: {}={}", key, value);
            }
        }
    }

    match (config.device.is_empty(), gpiochip) {
        (true, Some(n)) => config.device = format!("/dev/gpiochip{}", n),
        (true, None) => return Err(LinuxGpioError::NoDevice),
        (false, Some(_)) => return Err(LinuxGpioError::ConflictingDevice),
        (false, None) => {}
    }

    config.cs = cs.ok_or(LinuxGpioError::MissingParameter("cs"))?;
    config.sck = sck.ok_or(LinuxGpioError::MissingParameter("sck"))?;
    config.mosi = mosi.ok_or(LinuxGpioError::MissingParameter("mosi"))?;
    config.miso = miso.ok_or(LinuxGpioError::MissingParameter("miso"))?;
    config.check_distinct_lines()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_dev() {
        let config = parse_options(&[
            ("dev", "/dev/gpiochip0"),
            ("cs", "25"),
            ("sck", "11"),
            ("mosi", "10"),
            ("miso", "9"),
        ])
        .unwrap();

        assert_eq!(
            config,
            LinuxGpioSpiConfig::new("/dev/gpiochip0", 25, 11, 10, 9)
        );
        assert_eq!(config.half_period_ns, DEFAULT_HALF_PERIOD_NS);
    }

    #[test]
    fn test_parse_options_gpiochip_and_speed() {
        let config = parse_options(&[
            ("gpiochip", "1"),
            ("cs", "8"),
            ("sck", "11"),
            ("mosi", "10"),
            ("miso", "9"),
            ("spispeed", "500"),
        ])
        .unwrap();

        assert_eq!(config.device, "/dev/gpiochip1");
        // 500 kHz -> 1000 ns half period
        assert_eq!(config.half_period_ns, 1000);
    }

    #[test]
    fn test_parse_options_no_device() {
        let err = parse_options(&[("cs", "1"), ("sck", "2"), ("mosi", "3"), ("miso", "4")])
            .unwrap_err();
        assert!(matches!(err, LinuxGpioError::NoDevice));
    }

    #[test]
    fn test_parse_options_conflicting_device() {
        let err = parse_options(&[
            ("dev", "/dev/gpiochip0"),
            ("gpiochip", "0"),
            ("cs", "1"),
            ("sck", "2"),
            ("mosi", "3"),
            ("miso", "4"),
        ])
        .unwrap_err();
        assert!(matches!(err, LinuxGpioError::ConflictingDevice));
    }

    #[test]
    fn test_parse_options_missing_pin() {
        let err = parse_options(&[("gpiochip", "0"), ("cs", "1"), ("sck", "2"), ("mosi", "3")])
            .unwrap_err();
        assert!(matches!(err, LinuxGpioError::MissingParameter("miso")));
    }

    #[test]
    fn test_parse_options_invalid_number() {
        let err = parse_options(&[("gpiochip", "0"), ("cs", "abc")]).unwrap_err();
        assert!(matches!(err, LinuxGpioError::InvalidValue { name: "cs", .. }));
    }

    #[test]
    fn test_parse_options_duplicate_line() {
        let err = parse_options(&[
            ("gpiochip", "0"),
            ("cs", "4"),
            ("sck", "11"),
            ("mosi", "4"),
            ("miso", "9"),
        ])
        .unwrap_err();
        assert!(matches!(err, LinuxGpioError::DuplicateLine(4)));
    }

    #[test]
    fn test_speed_hz() {
        let config = LinuxGpioSpiConfig::default().with_speed_hz(1_000_000);
        assert_eq!(config.half_period_ns, 500);
        // Zero keeps the previous value
        let config = config.with_speed_hz(0);
        assert_eq!(config.half_period_ns, 500);
    }
}
