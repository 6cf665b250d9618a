//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! The router: one UDP socket, a dispatcher for the three message kinds,
//! and three independent background loops — the inbound receiver, the
//! periodic advertiser, and the liveness monitor. The operator command
//! loop is driven by `main`, not by this module, since it blocks on line
//! input rather than on the socket or a timer.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::net::UdpSocket;

use crate::cli::Command;
use crate::debug::Debug;
use crate::error::{ConfigError, ProtocolError};
use crate::message::Message;
use crate::state::State;
use crate::table::Route;
use crate::task::Task;

/// Receive buffer size ("≥ 4096 octets"), matching the size used by the
/// reference implementation this protocol was distilled from.
const RECV_BUF_SIZE: usize = 4096;

pub struct Router {
    self_addr: Ipv4Addr,
    period: Duration,
    socket: UdpSocket,
    state: Mutex<State>,
}

/// Handles for the router's background tasks. Dropping this aborts all
/// three, which is this daemon's whole shutdown mechanism.
pub struct BackgroundTasks {
    _advertiser: Task<()>,
    _liveness: Task<()>,
    _receiver: Task<()>,
}

impl Router {
    pub async fn bind(self_addr: Ipv4Addr, period: Duration) -> Result<Arc<Router>, ConfigError> {
        let bind_addr = SocketAddr::from((self_addr, crate::PORT));
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|error| ConfigError::BindFailed(bind_addr, error))?;

        Ok(Arc::new(Router {
            self_addr,
            period,
            socket,
            state: Mutex::new(State::new(self_addr)),
        }))
    }

    pub fn self_addr(&self) -> Ipv4Addr {
        self.self_addr
    }

    /// Spawns the advertiser, liveness monitor, and receiver as independent
    /// tasks. None of them is expected to complete before shutdown.
    pub fn spawn_background(self: &Arc<Self>) -> BackgroundTasks {
        BackgroundTasks {
            _advertiser: Task::spawn(Arc::clone(self).advertiser_loop()),
            _liveness: Task::spawn(Arc::clone(self).liveness_loop()),
            _receiver: Task::spawn(Arc::clone(self).receive_loop()),
        }
    }

    // ===== operator surface =====

    pub fn add_neighbor(&self, addr: Ipv4Addr, weight: u32) {
        self.state.lock().unwrap().add_neighbor(addr, weight);
    }

    pub fn del_neighbor(&self, addr: Ipv4Addr) -> bool {
        self.state.lock().unwrap().del_neighbor(addr)
    }

    pub async fn originate_trace(&self, destination: Ipv4Addr) {
        // Equivalent to receiving a trace whose path so far is just us.
        let msg = Message::Trace {
            source: self.self_addr,
            destination,
            routers: vec![self.self_addr],
        };
        self.forward(msg).await;
    }

    pub async fn apply_command(&self, cmd: Command) {
        match cmd {
            Command::Add(addr, weight) => self.add_neighbor(addr, weight),
            Command::Del(addr) => {
                if !self.del_neighbor(addr) {
                    tracing::info!(%addr, "no link exists");
                }
            }
            Command::Trace(dest) => self.originate_trace(dest).await,
            Command::Quit => {}
        }
    }

    // ===== introspection, used by tests and would back a `show` command =====

    pub fn route(&self, dest: Ipv4Addr) -> Option<Route> {
        self.state.lock().unwrap().lookup(dest)
    }

    pub fn neighbor_addrs(&self) -> Vec<Ipv4Addr> {
        self.state.lock().unwrap().neighbor_addrs()
    }

    // ===== background tasks =====

    async fn advertiser_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.period);
        loop {
            ticker.tick().await;
            self.send_updates_all().await;
        }
    }

    async fn liveness_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.period);
        let window = chrono::Duration::from_std(self.period * 4)
            .expect("four advertisement periods fits in a chrono::Duration");
        loop {
            ticker.tick().await;
            self.state.lock().unwrap().evict_expired(Utc::now(), window);
        }
    }

    async fn receive_loop(self: Arc<Self>) {
        let mut buf = [0u8; RECV_BUF_SIZE];
        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((n, src)) => self.handle_datagram(&buf[..n], src).await,
                Err(error) => {
                    tracing::error!(%error, "socket recv error");
                }
            }
        }
    }

    // ===== message dispatch =====

    async fn handle_datagram(&self, buf: &[u8], src: SocketAddr) {
        let msg = match Message::from_bytes(buf) {
            Ok(msg) => msg,
            Err(error) => {
                ProtocolError::Decode { src, source: error }.log();
                return;
            }
        };

        match &msg {
            Message::Update {
                source, distances, ..
            } => {
                let source = *source;
                let distances = distances.clone();
                self.handle_update(source, distances).await;
            }
            Message::Data { destination, .. } => {
                let destination = *destination;
                self.handle_data(destination, msg).await;
            }
            Message::Trace { .. } => {
                self.handle_trace(msg).await;
            }
        }
    }

    async fn handle_update(&self, source: Ipv4Addr, distances: BTreeMap<Ipv4Addr, u32>) {
        let outcome = self.state.lock().unwrap().apply_update(source, &distances);
        match outcome {
            Ok(true) => {
                Debug::AdvertiseTriggered.log();
                self.send_updates_all().await;
            }
            Ok(false) => {}
            Err(()) => ProtocolError::NotANeighbor(source).log(),
        }
    }

    async fn handle_data(&self, destination: Ipv4Addr, msg: Message) {
        if destination == self.self_addr {
            if let Message::Data { payload, .. } = &msg {
                println!("{payload}");
            }
        } else {
            self.forward(msg).await;
        }
    }

    async fn handle_trace(&self, msg: Message) {
        let Message::Trace {
            source,
            destination,
            mut routers,
        } = msg
        else {
            return;
        };
        routers.push(self.self_addr);
        Debug::TraceHop {
            source: &source,
            destination: &destination,
        }
        .log();

        if destination == self.self_addr {
            let trace = Message::Trace {
                source,
                destination,
                routers,
            };
            let payload = serde_json::to_string(&trace).expect("trace message always serializes");
            let reply = Message::Data {
                source: self.self_addr,
                destination: source,
                payload,
            };
            self.forward(reply).await;
        } else {
            let trace = Message::Trace {
                source,
                destination,
                routers,
            };
            self.forward(trace).await;
        }
    }

    /// Forwarding : look up the next hop, send outside the lock,
    /// drop silently if there is none.
    async fn forward(&self, msg: Message) {
        let dest = msg.destination();
        let route = self.state.lock().unwrap().lookup(dest);
        match route {
            Some(route) => self.send_to(route.next_hop, &msg).await,
            None => Debug::ForwardMiss(&dest).log(),
        }
    }

    /// Builds every neighbor's split-horizon snapshot under the lock,
    /// releases it, then sends : sends never happen while the lock
    /// is held, and this path never recurses back into the lock while
    /// holding it.
    async fn send_updates_all(&self) {
        let snapshots: Vec<(Ipv4Addr, Vec<(Ipv4Addr, u32)>)> = {
            let state = self.state.lock().unwrap();
            state
                .neighbor_addrs()
                .into_iter()
                .map(|n| (n, state.snapshot_for_neighbor(n)))
                .collect()
        };

        for (neighbor, entries) in snapshots {
            let count = entries.len();
            let distances: BTreeMap<Ipv4Addr, u32> = entries.into_iter().collect();
            let msg = Message::Update {
                source: self.self_addr,
                destination: neighbor,
                distances,
            };
            self.send_to(neighbor, &msg).await;
            Debug::AdvertiseSent {
                neighbor: &neighbor,
                entries: count,
            }
            .log();
        }
    }

    async fn send_to(&self, dest: Ipv4Addr, msg: &Message) {
        let addr = SocketAddr::from((dest, crate::PORT));
        if let Err(error) = self.socket.send_to(&msg.to_bytes(), addr).await {
            ProtocolError::Send { dst: addr, source: error }.log();
        }
    }
}
