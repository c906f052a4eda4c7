//! Background work with completions marshalled back onto the interaction context.
//!
//! The interaction context is whoever owns the [`InteractionLoop`] and the state `S`
//! it drains into. Workers never see `S`; they only post a [`Job`] through an
//! [`InteractionHandle`], and the owner runs it.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::mpsc;
use tracing::debug;

/// A unit of work that runs on the interaction context.
pub type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Create the queue linking workers to the interaction context.
pub fn interaction_queue<S>() -> (InteractionHandle<S>, InteractionLoop<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InteractionHandle { tx }, InteractionLoop { rx })
}

/// Sending side: any thread may post jobs.
pub struct InteractionHandle<S> {
    tx: mpsc::UnboundedSender<Job<S>>,
}

impl<S> Clone for InteractionHandle<S> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<S> std::fmt::Debug for InteractionHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionHandle").field("closed", &self.tx.is_closed()).finish()
    }
}

impl<S> InteractionHandle<S> {
    /// Returns `false` when the interaction loop is gone.
    pub fn post(&self, job: Job<S>) -> bool {
        self.tx.send(job).is_ok()
    }
}

/// Receiving side, owned by the interaction context.
pub struct InteractionLoop<S> {
    rx: mpsc::UnboundedReceiver<Job<S>>,
}

impl<S> InteractionLoop<S> {
    /// Wait for the next job. `None` once every handle is dropped.
    pub async fn next_job(&mut self) -> Option<Job<S>> {
        self.rx.recv().await
    }

    /// Wait for one job and run it against `target`.
    pub async fn run_next(&mut self, target: &mut S) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job(target);
                true
            }
            None => false,
        }
    }

    /// Run whatever is already queued without waiting.
    pub fn run_pending(&mut self, target: &mut S) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job(target);
            ran += 1;
        }
        ran
    }
}

/// Runs tasks on the tokio worker pool and hands each result back through the
/// interaction queue exactly once.
pub struct Dispatcher<S> {
    handle: InteractionHandle<S>,
    dispatched: Arc<AtomicU64>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self { handle: self.handle.clone(), dispatched: self.dispatched.clone() }
    }
}

impl<S> std::fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handle", &self.handle)
            .field("dispatched", &self.dispatched.load(Ordering::Relaxed))
            .finish()
    }
}

impl<S: 'static> Dispatcher<S> {
    pub fn new(handle: InteractionHandle<S>) -> Self {
        Self { handle, dispatched: Arc::new(AtomicU64::new(0)) }
    }

    /// Start `task` in the background and return immediately.
    ///
    /// `on_done` runs later, on the interaction context, with the task's output.
    /// Must be called from within a tokio runtime.
    pub fn run<T, F, C>(&self, task: F, on_done: C)
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
        C: FnOnce(&mut S, T) + Send + 'static,
    {
        let id = self.dispatched.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = self.handle.clone();

        debug!(task = id, "dispatching");
        tokio::spawn(async move {
            let result = task.await;
            if !handle.post(Box::new(move |target: &mut S| on_done(target, result))) {
                debug!(task = id, "interaction loop closed, dropping completion");
            }
        });
    }

    /// Number of `run` calls issued so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}
