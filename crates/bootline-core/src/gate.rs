//! One-shot aggregate completion signal.
//!
//! The gate settles at most once, to either the ordered list of resolved
//! extensions or the error that stopped loading. Waiters and subscribers
//! registered before or after settlement all observe the same outcome.

use std::future::IntoFuture;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error};

use bootline_protocols::error::ExtensionError;
use bootline_protocols::extension::Extension;

/// Resolved extensions in registration order; empty slots are `None`.
pub type ReadyExtensions = Vec<Option<Extension>>;

/// Terminal outcome of the gate.
pub type ReadyOutcome = Result<ReadyExtensions, ExtensionError>;

type ReadyCallback = Box<dyn FnOnce(&[Option<Extension>]) + Send>;
type FailureCallback = Box<dyn FnOnce(&ExtensionError) + Send>;

enum Subscriber {
    Ready(ReadyCallback),
    Failure(FailureCallback),
}

impl Subscriber {
    fn kind(&self) -> &'static str {
        match self {
            Self::Ready(_) => "on_ready",
            Self::Failure(_) => "on_failure",
        }
    }

    fn notify(self, outcome: &ReadyOutcome) {
        match (self, outcome) {
            (Self::Ready(callback), Ok(extensions)) => callback(extensions.as_slice()),
            (Self::Failure(callback), Err(err)) => callback(err),
            _ => {}
        }
    }
}

struct GateState {
    outcome: Option<ReadyOutcome>,
    subscribers: Vec<Subscriber>,
}

struct GateShared {
    state: Mutex<GateState>,
    published: watch::Sender<Option<ReadyOutcome>>,
}

/// The ready gate. Clones share the same gate.
///
/// Subscribers registered before settlement all run before any
/// [`ReadySignal`] observes the outcome.
#[derive(Clone)]
pub struct ReadyGate {
    shared: Arc<GateShared>,
}

impl ReadyGate {
    pub fn new() -> Self {
        let (published, _) = watch::channel(None);
        Self {
            shared: Arc::new(GateShared {
                state: Mutex::new(GateState {
                    outcome: None,
                    subscribers: Vec::new(),
                }),
                published,
            }),
        }
    }

    /// Settle to `Ready`. Returns `false` if the gate had already settled.
    pub fn resolve(&self, extensions: ReadyExtensions) -> bool {
        self.settle(Ok(extensions))
    }

    /// Settle to `Failed`. Returns `false` if the gate had already settled.
    pub fn reject(&self, err: ExtensionError) -> bool {
        self.settle(Err(err))
    }

    fn settle(&self, outcome: ReadyOutcome) -> bool {
        let subscribers = {
            let mut state = self.shared.state.lock();
            if state.outcome.is_some() {
                debug!("Ready gate already settled; ignoring outcome");
                return false;
            }
            state.outcome = Some(outcome.clone());
            std::mem::take(&mut state.subscribers)
        };

        for subscriber in subscribers {
            deliver(subscriber, &outcome);
        }
        self.shared.published.send_replace(Some(outcome));
        true
    }

    /// The settled outcome, if any.
    pub fn outcome(&self) -> Option<ReadyOutcome> {
        self.shared.state.lock().outcome.clone()
    }

    pub fn is_settled(&self) -> bool {
        self.shared.state.lock().outcome.is_some()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.shared.state.lock().outcome, Some(Ok(_)))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.shared.state.lock().outcome, Some(Err(_)))
    }

    /// Run `callback` once the gate is ready. Runs immediately if it already is.
    pub fn on_ready<F>(&self, callback: F)
    where
        F: FnOnce(&[Option<Extension>]) + Send + 'static,
    {
        self.subscribe(Subscriber::Ready(Box::new(callback)));
    }

    /// Run `callback` once the gate has failed. Runs immediately if it already has.
    pub fn on_failure<F>(&self, callback: F)
    where
        F: FnOnce(&ExtensionError) + Send + 'static,
    {
        self.subscribe(Subscriber::Failure(Box::new(callback)));
    }

    fn subscribe(&self, subscriber: Subscriber) {
        let mut state = self.shared.state.lock();
        match state.outcome.clone() {
            None => state.subscribers.push(subscriber),
            Some(outcome) => {
                drop(state);
                deliver(subscriber, &outcome);
            }
        }
    }

    /// A future-like handle resolving to the outcome.
    pub fn signal(&self) -> ReadySignal {
        ReadySignal {
            outcome: self.shared.published.subscribe(),
        }
    }
}

/// Run one subscriber. A panicking callback is logged and does not keep the
/// remaining subscribers from running.
fn deliver(subscriber: Subscriber, outcome: &ReadyOutcome) {
    let kind = subscriber.kind();
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| subscriber.notify(outcome))) {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "no details".to_string());
        error!(subscriber = kind, detail = %detail, "Ready gate subscriber panicked");
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaitable view of the ready gate.
///
/// ```ignore
/// let extensions = manager.init()?.await?;
/// ```
#[derive(Debug)]
pub struct ReadySignal {
    outcome: watch::Receiver<Option<ReadyOutcome>>,
}

impl ReadySignal {
    /// Wait for the gate to settle.
    pub async fn wait(mut self) -> ReadyOutcome {
        let settled = self
            .outcome
            .wait_for(Option::is_some)
            .await
            .map(|slot| (*slot).clone());

        match settled {
            Ok(Some(outcome)) => outcome,
            _ => Err(ExtensionError::unknown(
                "ready-gate",
                Some("gate dropped before settling".to_string()),
            )),
        }
    }
}

impl IntoFuture for ReadySignal {
    type Output = ReadyOutcome;
    type IntoFuture = BoxFuture<'static, ReadyOutcome>;

    fn into_future(self) -> Self::IntoFuture {
        self.wait().boxed()
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
