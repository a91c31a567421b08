//! Worker-thread request dispatch with single-threaded completion delivery.
//!
//! Gateway calls run on their own threads; their results come back over a
//! channel and are applied by whoever owns the `Dispatcher`. `cancel_all`
//! bumps the generation so anything still in flight is dropped on arrival.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

struct Envelope<M> {
    generation: u64,
    terminal: bool,
    // `None` only for a terminal envelope whose job panicked.
    msg: Option<M>,
}

/// Lets a running job emit intermediate messages before it finishes.
pub struct Reporter<M> {
    generation: u64,
    tx: Sender<Envelope<M>>,
}

impl<M> Clone for Reporter<M> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            tx: self.tx.clone(),
        }
    }
}

impl<M: Send + 'static> Reporter<M> {
    pub fn report(&self, msg: M) {
        // The owner may be gone; late messages are dropped either way.
        let _ = self.tx.send(Envelope {
            generation: self.generation,
            terminal: false,
            msg: Some(msg),
        });
    }
}

pub struct Dispatcher<M> {
    tx: Sender<Envelope<M>>,
    rx: Receiver<Envelope<M>>,
    generation: u64,
    pending: usize,
}

impl<M: Send + 'static> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> Dispatcher<M> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            generation: 0,
            pending: 0,
        }
    }

    pub fn spawn<F>(&mut self, label: &str, job: F)
    where
        F: FnOnce(&Reporter<M>) -> M + Send + 'static,
    {
        let reporter = Reporter {
            generation: self.generation,
            tx: self.tx.clone(),
        };
        self.pending += 1;
        tracing::debug!(label, pending = self.pending, "dispatching request");
        let label = label.to_string();
        std::thread::spawn(move || {
            // A panicking job still finishes, so `pending` always drains.
            let msg = match panic::catch_unwind(AssertUnwindSafe(|| job(&reporter))) {
                Ok(msg) => Some(msg),
                Err(_) => {
                    tracing::error!(label = %label, "request worker panicked");
                    None
                }
            };
            let _ = reporter.tx.send(Envelope {
                generation: reporter.generation,
                terminal: true,
                msg,
            });
        });
    }

    /// Requests started in the current generation that have not completed.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Drops every in-flight request; their completions will be ignored.
    pub fn cancel_all(&mut self) {
        if self.pending > 0 {
            tracing::debug!(dropped = self.pending, "discarding pending completions");
        }
        self.generation += 1;
        self.pending = 0;
    }

    /// Next live message, without blocking.
    pub fn try_next(&mut self) -> Option<M> {
        while let Ok(env) = self.rx.try_recv() {
            if let Some(msg) = self.accept(env) {
                return Some(msg);
            }
        }
        None
    }

    /// Next live message, waiting up to `timeout` (forever when `None`).
    /// Returns `None` immediately when nothing is pending.
    pub fn next_blocking(&mut self, timeout: Option<Duration>) -> Option<M> {
        let deadline = timeout.map(|t| std::time::Instant::now() + t);
        while self.pending > 0 {
            let env = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(std::time::Instant::now());
                    match self.rx.recv_timeout(left) {
                        Ok(env) => env,
                        Err(RecvTimeoutError::Timeout) => return None,
                        Err(RecvTimeoutError::Disconnected) => return None,
                    }
                }
                None => match self.rx.recv() {
                    Ok(env) => env,
                    Err(_) => return None,
                },
            };
            if let Some(msg) = self.accept(env) {
                return Some(msg);
            }
        }
        None
    }

    fn accept(&mut self, env: Envelope<M>) -> Option<M> {
        if env.generation != self.generation {
            return None;
        }
        if env.terminal {
            self.pending = self.pending.saturating_sub(1);
        }
        env.msg
    }
}

#[cfg(test)]
#[path = "../tests/screen/dispatch_tests.rs"]
mod tests;
