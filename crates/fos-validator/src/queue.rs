//! Sequential async chains
//!
//! Each validation pass hands its async work to the queue as one chain.
//! A chain is an ordered list consumed by a single loop: item `i + 1` starts
//! only after item `i` has settled. Chains from different passes run
//! independently on one single-threaded executor.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;

use smol::{LocalExecutor, Task};

/// Single-threaded runner for sequential chains
pub struct AsyncQueue {
    executor: LocalExecutor<'static>,
    chains: RefCell<Vec<Task<()>>>,
}

impl Default for AsyncQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncQueue {
    pub fn new() -> Self {
        Self {
            executor: LocalExecutor::new(),
            chains: RefCell::new(Vec::new()),
        }
    }

    /// Start a chain over `items`, running `step` on each in order.
    /// Returns immediately; nothing runs until the executor is driven.
    pub fn enqueue<T, F, Fut>(&self, items: Vec<T>, step: F)
    where
        T: 'static,
        F: Fn(T) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        if items.is_empty() {
            return;
        }

        let len = items.len();
        let mut pending: VecDeque<T> = items.into();
        let task = self.executor.spawn(async move {
            while let Some(item) = pending.pop_front() {
                step(item).await;
            }
        });

        let mut chains = self.chains.borrow_mut();
        chains.retain(|t| !t.is_finished());
        chains.push(task);
        tracing::debug!("queued async chain of {} ({} in flight)", len, chains.len());
    }

    /// Run one ready task. Returns false if nothing was ready.
    pub fn tick(&self) -> bool {
        self.executor.try_tick()
    }

    /// Chains not yet finished
    pub fn pending(&self) -> usize {
        self.chains.borrow().iter().filter(|t| !t.is_finished()).count()
    }

    /// Drive the executor until every chain, including chains started
    /// while settling, has finished.
    pub async fn settle(&self) {
        loop {
            let chains = std::mem::take(&mut *self.chains.borrow_mut());
            if chains.is_empty() {
                break;
            }
            self.executor
                .run(async move {
                    for chain in chains {
                        chain.await;
                    }
                })
                .await;
        }
    }
}
