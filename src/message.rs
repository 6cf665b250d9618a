//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! The three wire message kinds: one JSON object per UDP datagram.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// A UDPRIP protocol message, tagged by its `type` field.
///
/// Unknown `type` values and messages missing required fields fail to
/// deserialize and are treated as protocol errors by the caller:
/// logged and discarded, never propagated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "update")]
    Update {
        source: Ipv4Addr,
        destination: Ipv4Addr,
        distances: BTreeMap<Ipv4Addr, u32>,
    },
    #[serde(rename = "data")]
    Data {
        source: Ipv4Addr,
        destination: Ipv4Addr,
        payload: String,
    },
    #[serde(rename = "trace")]
    Trace {
        source: Ipv4Addr,
        destination: Ipv4Addr,
        routers: Vec<Ipv4Addr>,
    },
}

impl Message {
    /// The destination carried by every message kind, used for forwarding.
    pub fn destination(&self) -> Ipv4Addr {
        match self {
            Message::Update { destination, .. }
            | Message::Data { destination, .. }
            | Message::Trace { destination, .. } => *destination,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Constructed from our own well-formed values; only caller-supplied
        // bytes ever fail to decode.
        serde_json::to_vec(self).expect("message always serializes")
    }

    pub fn from_bytes(buf: &[u8]) -> serde_json::Result<Message> {
        serde_json::from_slice(buf)
    }
}
