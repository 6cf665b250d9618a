//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! A handle for a long-lived background task (the receiver, the advertiser,
//! the liveness monitor), adapted from `holo_utils::task::Task`. Dropping
//! the handle aborts the task, so shutdown just means dropping the daemon.

use std::future::Future;

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Task<T> {
    handle: JoinHandle<T>,
}

impl<T> Task<T> {
    pub fn spawn<Fut>(future: Fut) -> Task<T>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        Task {
            handle: tokio::spawn(future),
        }
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
