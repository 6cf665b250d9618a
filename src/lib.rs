//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! UDPRIP — a virtual distance-vector routing daemon.
//!
//! One process represents one router, identified by an IPv4 address and
//! bound to a well-known UDP port. A cluster of instances cooperates over
//! UDP, exchanging distance-vector advertisements and carrying application
//! data and trace messages across the resulting overlay.

pub mod cli;
pub mod config;
pub mod debug;
pub mod error;
pub mod message;
pub mod neighbor;
pub mod router;
pub mod state;
pub mod table;
pub mod task;

pub use error::{CommandError, ConfigError, ProtocolError};
pub use router::Router;

/// Fixed UDP port every UDPRIP instance binds to and sends to.
pub const PORT: u16 = 55151;
