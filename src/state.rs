//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! The single logical resource guarded by one mutex: the neighbor set,
//! the routing table, and the last-heard map. Every mutation, and every
//! multi-read sequence that must be internally consistent, happens entirely
//! within one call into this module while the router's mutex is held.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};

use crate::debug::Debug;
use crate::neighbor::Neighbor;
use crate::table::{Route, RoutingTable};

pub struct State {
    self_addr: Ipv4Addr,
    table: RoutingTable,
    neighbors: BTreeMap<Ipv4Addr, Neighbor>,
}

impl State {
    pub fn new(self_addr: Ipv4Addr) -> Self {
        State {
            self_addr,
            table: RoutingTable::new(self_addr),
            neighbors: BTreeMap::new(),
        }
    }

    pub fn self_addr(&self) -> Ipv4Addr {
        self.self_addr
    }

    pub fn lookup(&self, dest: Ipv4Addr) -> Option<Route> {
        self.table.lookup(dest)
    }

    pub fn is_neighbor(&self, addr: Ipv4Addr) -> bool {
        self.neighbors.contains_key(&addr)
    }

    pub fn neighbor_addrs(&self) -> Vec<Ipv4Addr> {
        self.neighbors.keys().copied().collect()
    }

    pub fn snapshot_for_neighbor(&self, n: Ipv4Addr) -> Vec<(Ipv4Addr, u32)> {
        self.table.snapshot_for_neighbor(n)
    }

    /// `add <ip> <weight>` : upserts the neighbor's weight and, if no
    /// shorter route exists, installs `(ip, weight, ip)`. Returns whether
    /// the table changed.
    pub fn add_neighbor(&mut self, addr: Ipv4Addr, weight: u32) -> bool {
        // A fresh `add` means no advertisement has been heard since *this*
        // add, regardless of whether the neighbor already existed.
        self.neighbors.insert(addr, Neighbor::new(weight));
        Debug::NbrCreate(&addr).log();

        let install = match self.table.lookup(addr) {
            None => true,
            Some(cur) => cur.distance > weight,
        };
        if install {
            self.table.insert_or_replace(addr, weight, addr);
            Debug::RouteInstall {
                dest: &addr,
                distance: weight,
                next_hop: &addr,
            }
            .log();
        }
        install
    }

    /// `del <ip>` : removes the neighbor, its last-heard timestamp
    /// (implicit in removing the `Neighbor`), and every route whose
    /// next-hop is that neighbor except self. Returns `false` if no such
    /// neighbor was configured.
    pub fn del_neighbor(&mut self, addr: Ipv4Addr) -> bool {
        if self.neighbors.remove(&addr).is_none() {
            return false;
        }
        Debug::NbrRemove(&addr).log();
        let removed = self
            .table
            .remove_if(self.self_addr, |_, route| route.next_hop == addr);
        for dest in &removed {
            Debug::RouteWithdraw {
                dest,
                next_hop: &addr,
            }
            .log();
        }
        true
    }

    /// Advertisement intake . Returns `Ok(dirty)` on acceptance, or
    /// `Err(())` if `source` is not a current neighbor (the message must be
    /// silently dropped by the caller).
    pub fn apply_update(
        &mut self,
        source: Ipv4Addr,
        distances: &BTreeMap<Ipv4Addr, u32>,
    ) -> Result<bool, ()> {
        let weight = match self.neighbors.get_mut(&source) {
            Some(nbr) => {
                nbr.last_heard = Some(Utc::now());
                nbr.weight
            }
            None => return Err(()),
        };

        let mut dirty = false;
        for (&dest, &d) in distances {
            if dest == self.self_addr {
                continue;
            }
            let candidate = d.saturating_add(weight);
            if self.consider_route(dest, candidate, source) {
                dirty = true;
            }
        }
        Ok(dirty)
    }

    /// The route-selection rule : prefer a strictly shorter route, or
    /// accept a (possibly worse) update from the next-hop we already route
    /// through, since that neighbor "owns" the destination until something
    /// cheaper appears. This is what lets cost increases and withdrawals
    /// propagate without numerically bounding the metric.
    fn consider_route(&mut self, dest: Ipv4Addr, candidate: u32, source: Ipv4Addr) -> bool {
        match self.table.lookup(dest) {
            None => {
                self.table.insert_or_replace(dest, candidate, source);
                Debug::RouteInstall {
                    dest: &dest,
                    distance: candidate,
                    next_hop: &source,
                }
                .log();
                true
            }
            Some(cur) if cur.distance > candidate => {
                self.table.insert_or_replace(dest, candidate, source);
                Debug::RouteInstall {
                    dest: &dest,
                    distance: candidate,
                    next_hop: &source,
                }
                .log();
                true
            }
            Some(cur) if cur.next_hop == source && cur.distance != candidate => {
                self.table.insert_or_replace(dest, candidate, source);
                Debug::RouteInstall {
                    dest: &dest,
                    distance: candidate,
                    next_hop: &source,
                }
                .log();
                true
            }
            _ => false,
        }
    }

    /// Liveness monitor : evicts routes through any neighbor silent
    /// for more than `window`, forgetting its last-heard timestamp. The
    /// link itself is kept. Returns the neighbors that were evicted.
    pub fn evict_expired(&mut self, now: DateTime<Utc>, window: chrono::Duration) -> Vec<Ipv4Addr> {
        let expired: Vec<Ipv4Addr> = self
            .neighbors
            .iter()
            .filter_map(|(&addr, nbr)| {
                let last = nbr.last_heard?;
                (now - last > window).then_some(addr)
            })
            .collect();

        for &addr in &expired {
            let removed = self
                .table
                .remove_if(self.self_addr, |_, route| route.next_hop == addr);
            for dest in &removed {
                Debug::RouteWithdraw {
                    dest,
                    next_hop: &addr,
                }
                .log();
            }
            if let Some(nbr) = self.neighbors.get_mut(&addr) {
                nbr.last_heard = None;
            }
            Debug::NbrTimeout(&addr).log();
        }
        expired
    }
}
