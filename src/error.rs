//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Error taxonomy: configuration errors fail fast at startup, protocol
//! errors are logged and discarded, command errors print a usage hint.

use std::net::SocketAddr;

use tracing::{error, warn};

/// Configuration errors: invalid IP, non-numeric weight, bind failure.
/// The caller prints these and exits non-zero; they never reach the
/// running daemon.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "invalid router address `{0}`: must be an IPv4 address in 127.0.1.0/24"
    )]
    InvalidAddress(String),

    #[error("invalid advertisement period `{0}`: must be a positive number of seconds")]
    InvalidPeriod(String),

    #[error("failed to bind UDP socket on {0}: {1}")]
    BindFailed(SocketAddr, #[source] std::io::Error),

    #[error("failed to read startup file `{0}`: {1}")]
    StartupFileUnreadable(String, #[source] std::io::Error),
}

impl ConfigError {
    pub fn log(&self) {
        error!("{}", self);
    }
}

/// Protocol errors: malformed JSON, unknown `type`, missing fields,
/// update from a non-neighbor. Logged and discarded; the session continues.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed datagram from {src}: {source}")]
    Decode {
        src: SocketAddr,
        #[source]
        source: serde_json::Error,
    },

    #[error("update from non-neighbor {0}")]
    NotANeighbor(std::net::Ipv4Addr),

    #[error("failed to send datagram to {dst}: {source}")]
    Send {
        dst: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl ProtocolError {
    pub fn log(&self) {
        warn!("{}", self);
    }
}

/// Operator command errors: bad verb or syntax. Printed as a
/// usage hint; the command loop continues.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("usage: add <ip> <weight>")]
    AddUsage,

    #[error("usage: del <ip>")]
    DelUsage,

    #[error("usage: trace <ip>")]
    TraceUsage,

    #[error("invalid IPv4 address: `{0}`")]
    InvalidAddress(String),

    #[error("weight must be a positive integer")]
    InvalidWeight,

    #[error("unknown command `{0}` (available: add, del, trace, quit)")]
    Unknown(String),
}
