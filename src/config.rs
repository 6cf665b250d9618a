//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Command-line configuration. The argument validator that
//! restricts bind addresses to 127.0.1.0/24 is the one external-collaborator
//! concern this daemon calls out separately; it lives here, apart from the
//! routing engine, so the engine never has to know about the restriction.

use std::net::Ipv4Addr;
use std::time::Duration;

use clap::{App, Arg};
use ipnetwork::Ipv4Network;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: Ipv4Addr,
    pub period: Duration,
    pub startup_file: Option<String>,
}

/// The loopback-alias range used by the reference deployment.
fn allowed_range() -> Ipv4Network {
    Ipv4Network::new(Ipv4Addr::new(127, 0, 1, 0), 24).expect("literal /24 is valid")
}

/// Validates that `addr` is an IPv4 address within 127.0.1.0/24.
pub fn validate_bind_addr(addr: Ipv4Addr) -> Result<(), ConfigError> {
    if allowed_range().contains(addr) {
        Ok(())
    } else {
        Err(ConfigError::InvalidAddress(addr.to_string()))
    }
}

fn parse_period(raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| ConfigError::InvalidPeriod(raw.to_string()))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidPeriod(raw.to_string()));
    }
    Ok(Duration::from_secs_f64(secs))
}

pub fn parse_args<I, T>(args: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = App::new("udprip")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A virtual distance-vector routing daemon")
        .arg(
            Arg::with_name("addr")
                .long("addr")
                .value_name("ip")
                .required(true)
                .help("This router's own address, in 127.0.1.0/24"),
        )
        .arg(
            Arg::with_name("period")
                .long("period")
                .value_name("secs")
                .default_value("1.0")
                .help("Advertisement period P, in seconds"),
        )
        .arg(
            Arg::with_name("startup-file")
                .long("startup-file")
                .value_name("path")
                .help("File of operator commands to run once at startup"),
        )
        .get_matches_from(args);

    let addr_str = matches.value_of("addr").expect("required");
    let addr: Ipv4Addr = addr_str
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(addr_str.to_string()))?;
    validate_bind_addr(addr)?;

    let period = parse_period(matches.value_of("period").expect("has default"))?;
    let startup_file = matches.value_of("startup-file").map(str::to_string);

    Ok(Config {
        addr,
        period,
        startup_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_addresses_in_range() {
        assert!(validate_bind_addr(Ipv4Addr::new(127, 0, 1, 1)).is_ok());
        assert!(validate_bind_addr(Ipv4Addr::new(127, 0, 1, 254)).is_ok());
    }

    #[test]
    fn rejects_addresses_outside_range() {
        assert!(validate_bind_addr(Ipv4Addr::new(127, 0, 0, 1)).is_err());
        assert!(validate_bind_addr(Ipv4Addr::new(10, 0, 0, 1)).is_err());
    }

    #[test]
    fn rejects_non_positive_period() {
        assert!(parse_period("0").is_err());
        assert!(parse_period("-1.0").is_err());
        assert!(parse_period("nan").is_err());
    }

    #[test]
    fn parses_full_argument_set() {
        let cfg = parse_args([
            "udprip",
            "--addr",
            "127.0.1.2",
            "--period",
            "0.5",
            "--startup-file",
            "startup.txt",
        ])
        .unwrap();
        assert_eq!(cfg.addr, Ipv4Addr::new(127, 0, 1, 2));
        assert_eq!(cfg.period, Duration::from_secs_f64(0.5));
        assert_eq!(cfg.startup_file.as_deref(), Some("startup.txt"));
    }
}
