//! Transport registration and dispatch
//!
//! This module lists the transports compiled into the binary and opens
//! them from a `name[:key=value,...]` string.

use is25lp_core::transport::{Transport, TransportInfo};
use thiserror::Error;

/// Errors from parsing a transport string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// An option was not in `key=value` form
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidParameter(String),

    /// An option value could not be parsed
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// No transport with this name is compiled in
    #[error("Unknown transport: '{0}' (available: {1})")]
    Unknown(String, String),
}

/// A parsed `name[:key=value,...]` transport string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSpec {
    /// Transport name
    pub name: String,
    /// Options in the order given
    pub params: Vec<(String, String)>,
}

impl TransportSpec {
    /// Options as borrowed pairs, for the transport crates' parsers
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Get information about all available transports (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_transports() -> Vec<TransportInfo> {
    let mut transports = Vec::new();

    #[cfg(feature = "dummy")]
    transports.push(TransportInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory IS25LP emulator (device=<id>,manufacturer=<id>,busy=<polls>)",
    });

    #[cfg(feature = "linux-gpio")]
    transports.push(TransportInfo {
        name: "linux_gpio",
        aliases: &["linux-gpio", "linux_gpio_spi"],
        description: "Linux GPIO bitbang (dev=/dev/gpiochipN,cs=,sck=,mosi=,miso=,spispeed=<kHz>)",
    });

    transports
}

/// Generate a short list of transport names for CLI help
pub fn transport_names_short() -> String {
    let transports = available_transports();
    let names: Vec<&str> = transports.iter().map(|t| t.name).collect();
    names.join(", ")
}

/// Resolve a name or alias to the primary transport name
pub fn find_transport(name: &str) -> Option<&'static str> {
    available_transports()
        .into_iter()
        .find(|t| t.name == name || t.aliases.contains(&name))
        .map(|t| t.name)
}

/// Parse a transport string into name and options
pub fn parse_transport_spec(s: &str) -> Result<TransportSpec, TransportError> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = Vec::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            match opt.split_once('=') {
                Some((key, value)) => params.push((key.to_string(), value.to_string())),
                None => return Err(TransportError::InvalidParameter(opt.to_string())),
            }
        }
    }

    Ok(TransportSpec {
        name: name.to_string(),
        params,
    })
}

/// Build the emulator configuration from `dummy:` options
#[cfg(feature = "dummy")]
pub fn parse_dummy_options(
    params: &[(&str, &str)],
) -> Result<is25lp_dummy::DummyConfig, TransportError> {
    use crate::cli::parse_hex_u32;

    let invalid = |key: &str, message: String| TransportError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let parse_u8 = |key: &str, value: &str| -> Result<u8, TransportError> {
        let n = parse_hex_u32(value).map_err(|e| invalid(key, e))?;
        u8::try_from(n).map_err(|_| invalid(key, format!("{} does not fit in a byte", value)))
    };

    let mut device = None;
    let mut manufacturer = None;
    let mut busy = None;
    for &(key, value) in params {
        match key {
            "device" => device = Some(parse_u8(key, value)?),
            "manufacturer" => manufacturer = Some(parse_u8(key, value)?),
            "busy" => busy = Some(parse_hex_u32(value).map_err(|e| invalid(key, e))?),
            _ => log::warn!("dummy: Unknown option: {}={}", key, value),
        }
    }

    let mut config = device.map_or_else(
        is25lp_dummy::DummyConfig::default,
        is25lp_dummy::DummyConfig::for_device,
    );
    if let Some(id) = manufacturer {
        config.manufacturer_id = id;
    }
    if let Some(polls) = busy {
        config.busy_polls = polls;
    }
    Ok(config)
}

/// Open a transport from a `name[:key=value,...]` string
pub fn open_transport(s: &str) -> Result<Box<dyn Transport + Send>, Box<dyn std::error::Error>> {
    let spec = parse_transport_spec(s)?;
    let name = find_transport(&spec.name)
        .ok_or_else(|| TransportError::Unknown(spec.name.clone(), transport_names_short()))?;

    log::debug!("Opening transport {} with {:?}", name, spec.params);

    #[allow(unused_variables)]
    let pairs = spec.pairs();
    match name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            let config = parse_dummy_options(&pairs)?;
            Ok(Box::new(is25lp_dummy::DummyFlash::new(config)))
        }
        #[cfg(feature = "linux-gpio")]
        "linux_gpio" => is25lp_linux_gpio::open_linux_gpio(&pairs),
        _ => Err(TransportError::Unknown(spec.name.clone(), transport_names_short()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_name_only() {
        let spec = parse_transport_spec("dummy").unwrap();
        assert_eq!(spec.name, "dummy");
        assert!(spec.params.is_empty());
    }

    #[test]
    fn test_parse_spec_with_params() {
        let spec = parse_transport_spec("linux_gpio:gpiochip=0,cs=25,sck=11").unwrap();
        assert_eq!(spec.name, "linux_gpio");
        assert_eq!(
            spec.pairs(),
            vec![("gpiochip", "0"), ("cs", "25"), ("sck", "11")]
        );
    }

    #[test]
    fn test_parse_spec_bad_param() {
        assert_eq!(
            parse_transport_spec("dummy:device"),
            Err(TransportError::InvalidParameter("device".to_string()))
        );
    }

    #[test]
    fn test_unknown_transport() {
        assert!(find_transport("ch341a").is_none());
        assert!(open_transport("ch341a").is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_dummy_options() {
        let config = parse_dummy_options(&[("device", "0x10"), ("busy", "5")]).unwrap();
        assert_eq!(config.device_id, 0x10);
        assert_eq!(config.size, 128 * 1024);
        assert_eq!(config.busy_polls, 5);
        assert_eq!(config.manufacturer_id, 0x9D);

        let config = parse_dummy_options(&[("manufacturer", "0xEF"), ("device", "0x02")]).unwrap();
        assert_eq!(config.manufacturer_id, 0xEF);
        assert_eq!(config.size, 32 * 1024);

        assert!(parse_dummy_options(&[("device", "0x100")]).is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy() {
        assert_eq!(find_transport("dummy"), Some("dummy"));

        let transport = open_transport("dummy:device=0x11").unwrap();
        let mut flash = is25lp_core::Is25lp::new(transport);
        assert!(flash.initialize().unwrap());
        assert_eq!(flash.geometry().memory_size(), 262_144);
    }

    #[cfg(feature = "linux-gpio")]
    #[test]
    fn test_linux_gpio_alias() {
        assert_eq!(find_transport("linux-gpio"), Some("linux_gpio"));
        assert_eq!(find_transport("linux_gpio_spi"), Some("linux_gpio"));
    }
}
