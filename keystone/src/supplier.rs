//! # Supplier Module - Background quote production
//!
//! A [`QuoteSupplier`] keeps a timed session fed without blocking the input loop. Once started,
//! a single producer thread fetches quotes one at a time and pushes them into a bounded queue.
//! A full queue blocks the producer, not the session.
//!
//! The producer checks for cancellation before and after every fetch, and races every push and
//! every retry pause against it. When it exits, it drops its end of the queue, so a consumer
//! waiting on [`QuoteSupplier::next`] sees the queue close instead of hanging.
//!
//! Fetch failures in the background are logged and retried; they never end the producer.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, select};
use tracing::{debug, warn};
use web_time::Duration;

use crate::quote::{FetchError, Quote, QuoteSource};

/// Channel endpoints of a running producer
#[derive(Debug)]
struct Producer {
    quotes: Receiver<Quote>,
    /// Dropping this sender is the cancellation signal
    cancel: Option<Sender<()>>,
    /// Disconnects once the producer thread has exited
    done: Receiver<()>,
}

/// Fetches quotes from a [`QuoteSource`], synchronously or in the background
pub struct QuoteSupplier {
    source: Arc<dyn QuoteSource>,
    retry_delay: Duration,
    producer: Option<Producer>,
    stopped: bool,
}

impl std::fmt::Debug for QuoteSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteSupplier")
            .field("retry_delay", &self.retry_delay)
            .field("producer", &self.producer)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl QuoteSupplier {
    pub fn new(source: Arc<dyn QuoteSource>, retry_delay: Duration) -> Self {
        Self {
            source,
            retry_delay,
            producer: None,
            stopped: false,
        }
    }

    /// Fetches `count` quotes on the calling thread.
    ///
    /// The first failure is returned to the caller.
    pub fn fill(&self, count: usize) -> Result<Vec<Quote>, FetchError> {
        (0..count).map(|_| fetch(self.source.as_ref())).collect()
    }

    /// Starts the background producer with a queue holding up to `capacity` quotes.
    ///
    /// A supplier produces at most once: calling this again, or after [`Self::stop`], does
    /// nothing.
    pub fn start(&mut self, capacity: usize) {
        if self.producer.is_some() || self.stopped {
            debug!("quote supplier already started");
            return;
        }

        let (quote_tx, quote_rx) = bounded(capacity);
        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        let (done_tx, done_rx) = bounded::<()>(0);
        let source = Arc::clone(&self.source);
        let retry_delay = self.retry_delay;

        let spawned = thread::Builder::new()
            .name("typechan-quotes".to_string())
            .spawn(move || {
                produce(source.as_ref(), &quote_tx, &cancel_rx, retry_delay);
                debug!("quote producer exited");
                drop(done_tx);
            });

        match spawned {
            Ok(_) => {
                debug!(capacity, "quote producer started");
                self.producer = Some(Producer {
                    quotes: quote_rx,
                    cancel: Some(cancel_tx),
                    done: done_rx,
                });
            }
            Err(error) => warn!(%error, "failed to spawn quote producer"),
        }
    }

    /// Signals the producer to stop. The queue is closed from then on.
    pub fn stop(&mut self) {
        self.stopped = true;
        if let Some(producer) = &mut self.producer
            && producer.cancel.take().is_some()
        {
            debug!("quote producer cancelled");
        }
    }

    /// Waits for the next quote.
    ///
    /// Blocks until the producer delivers. Returns `None` if the supplier was never started, has
    /// been stopped, or its producer has exited.
    pub fn next(&self) -> Option<Quote> {
        if self.stopped {
            return None;
        }
        self.producer.as_ref()?.quotes.recv().ok()
    }

    /// Number of quotes waiting in the queue.
    pub fn queued(&self) -> usize {
        self.producer
            .as_ref()
            .map_or(0, |producer| producer.quotes.len())
    }

    /// Waits up to `timeout` for the producer thread to exit.
    ///
    /// Returns true if no producer is running anymore.
    pub fn wait_stopped(&self, timeout: Duration) -> bool {
        let Some(producer) = &self.producer else {
            return true;
        };

        matches!(
            producer.done.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    pub const fn is_running(&self) -> bool {
        self.producer.is_some() && !self.stopped
    }
}

impl Drop for QuoteSupplier {
    fn drop(&mut self) {
        self.stop();
    }
}

fn fetch(source: &dyn QuoteSource) -> Result<Quote, FetchError> {
    source.fetch_one().and_then(|raw| Quote::parse(&raw))
}

fn is_cancelled(cancel: &Receiver<()>) -> bool {
    matches!(cancel.try_recv(), Err(TryRecvError::Disconnected))
}

/// The producer loop. Returns once cancelled or once nobody listens anymore.
fn produce(
    source: &dyn QuoteSource,
    quotes: &Sender<Quote>,
    cancel: &Receiver<()>,
    retry_delay: Duration,
) {
    while !is_cancelled(cancel) {
        let quote = match fetch(source) {
            Ok(quote) => quote,
            Err(error) => {
                warn!(%error, "background quote fetch failed, retrying");
                select! {
                    recv(cancel) -> _ => return,
                    default(retry_delay) => continue,
                }
            }
        };

        if is_cancelled(cancel) {
            return;
        }

        select! {
            send(quotes, quote) -> sent => {
                if sent.is_err() {
                    return;
                }
            }
            recv(cancel) -> _ => return,
        }
    }
}
