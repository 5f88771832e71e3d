use crate::error::TransportError;
use crate::notify::hub::HubRequest;
use crate::notify::{LinkState, Signal, Topic};
use tokio::sync::{mpsc, watch};

/// What the hub hands back for a new subscriber.
#[derive(Debug)]
pub(crate) struct SubscriptionParts {
    pub(crate) id: u64,
    pub(crate) topic: Topic,
    pub(crate) signals: mpsc::Receiver<Signal>,
    pub(crate) link: watch::Receiver<LinkState>,
}

/// A cancellable stream of change signals for one topic.
///
/// Every signal means "re-read what you display". Duplicates and spurious
/// signals are possible; the content of a signal is never a delta.
///
/// Dropping the subscription cancels it. Other subscribers are unaffected.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    topic: Topic,
    signals: mpsc::Receiver<Signal>,
    link: watch::Receiver<LinkState>,
    hub: mpsc::UnboundedSender<HubRequest>,
}

impl Subscription {
    pub(crate) fn new(parts: SubscriptionParts, hub: mpsc::UnboundedSender<HubRequest>) -> Self {
        Self {
            id: parts.id,
            topic: parts.topic,
            signals: parts.signals,
            link: parts.link,
            hub,
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Waits for the next signal.
    ///
    /// Fails once the stream has ended: either reconnecting gave up or the hub
    /// shut down.
    pub async fn recv(&mut self) -> Result<Signal, TransportError> {
        match self.signals.recv().await {
            Some(signal) => Ok(signal),
            None => Err(match *self.link.borrow() {
                LinkState::Failed { attempts } => TransportError::ReconnectExhausted { attempts },
                _ => TransportError::HubClosed,
            }),
        }
    }

    /// Returns a pending signal without waiting.
    pub fn try_recv(&mut self) -> Option<Signal> {
        self.signals.try_recv().ok()
    }

    pub fn link_state(&self) -> LinkState {
        *self.link.borrow()
    }

    /// A receiver that follows transport state changes.
    pub fn link_watch(&self) -> watch::Receiver<LinkState> {
        self.link.clone()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.hub.send(HubRequest::Cancel {
            topic: self.topic,
            id: self.id,
        });
    }
}
