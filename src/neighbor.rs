//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! A neighbor: a router with a configured direct link.

use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    /// Administrative cost of the direct link, a strictly positive integer.
    pub weight: u32,
    /// Set on every accepted advertisement from this neighbor; cleared
    /// whenever the neighbor is (re-)added or times out. Absent exactly
    /// when no advertisement has been heard since the neighbor was last
    /// added.
    pub last_heard: Option<DateTime<Utc>>,
}

impl Neighbor {
    pub fn new(weight: u32) -> Self {
        Neighbor {
            weight,
            last_heard: None,
        }
    }
}
