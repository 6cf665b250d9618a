//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Structured debug-level logging events, in the style of a small enum with
//! a `log()` method rather than scattered `debug!` call sites.

use std::net::Ipv4Addr;

use tracing::debug;

#[derive(Debug)]
pub enum Debug<'a> {
    RouteInstall {
        dest: &'a Ipv4Addr,
        distance: u32,
        next_hop: &'a Ipv4Addr,
    },
    RouteWithdraw {
        dest: &'a Ipv4Addr,
        next_hop: &'a Ipv4Addr,
    },
    NbrCreate(&'a Ipv4Addr),
    NbrRemove(&'a Ipv4Addr),
    NbrTimeout(&'a Ipv4Addr),
    AdvertiseSent {
        neighbor: &'a Ipv4Addr,
        entries: usize,
    },
    AdvertiseTriggered,
    TraceHop {
        source: &'a Ipv4Addr,
        destination: &'a Ipv4Addr,
    },
    ForwardMiss(&'a Ipv4Addr),
}

impl Debug<'_> {
    pub fn log(&self) {
        match self {
            Debug::RouteInstall {
                dest,
                distance,
                next_hop,
            } => {
                debug!(%dest, distance, %next_hop, "route installed");
            }
            Debug::RouteWithdraw { dest, next_hop } => {
                debug!(%dest, %next_hop, "route withdrawn");
            }
            Debug::NbrCreate(addr) => {
                debug!(%addr, "neighbor added");
            }
            Debug::NbrRemove(addr) => {
                debug!(%addr, "neighbor removed");
            }
            Debug::NbrTimeout(addr) => {
                debug!(%addr, "neighbor timed out, routes evicted");
            }
            Debug::AdvertiseSent { neighbor, entries } => {
                debug!(%neighbor, entries, "advertisement sent");
            }
            Debug::AdvertiseTriggered => {
                debug!("table changed, triggering event-driven advertisement");
            }
            Debug::TraceHop {
                source,
                destination,
            } => {
                debug!(%source, %destination, "trace hop appended");
            }
            Debug::ForwardMiss(dest) => {
                debug!(%dest, "no route, dropping message");
            }
        }
    }
}
