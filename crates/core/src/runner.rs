//! Bounded job runner shared by the batch and adaptive converters.
//!
//! Each item becomes one future; at most `concurrency` of them are polled at
//! a time. Results come back in completion order, which only matches
//! submission order when `concurrency` is 1.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Runs independent jobs with a concurrency limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRunner {
    concurrency: usize,
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::sequential()
    }
}

impl JobRunner {
    /// Runner with up to `concurrency` jobs in flight (at least one).
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// One job at a time, in submission order.
    pub fn sequential() -> Self {
        Self::new(1)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `f` over every item and collects the results in completion order.
    pub async fn run<I, F, Fut, T>(&self, items: I, f: F) -> Vec<T>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        self.run_with(items, f, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_complete` as each job finishes.
    pub async fn run_with<I, F, Fut, T, C>(&self, items: I, f: F, mut on_complete: C) -> Vec<T>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = T>,
        C: FnMut(&T),
    {
        let mut completed = stream::iter(items)
            .map(f)
            .buffer_unordered(self.concurrency);

        let mut results = Vec::new();
        while let Some(result) = completed.next().await {
            on_complete(&result);
            results.push(result);
        }
        results
    }
}
