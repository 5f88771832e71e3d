//! The notification hub actor.
//!
//! The hub keeps, per topic, the set of live subscribers and one relay task
//! holding the transport connection. The relay is started by the first
//! subscriber and aborted when the last one cancels, which drops the
//! connection.
//!
//! Each subscriber has a queue of one signal. Signals carry no payload, so
//! when the queue is already full the new signal is simply folded into the
//! pending one.

use crate::error::TransportError;
use crate::lifecycle::NotificationConfig;
use crate::notify::feed::ChangeFeed;
use crate::notify::subscription::{Subscription, SubscriptionParts};
use crate::notify::{LinkState, Signal, Topic};
use crate::repository::StoreChange;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub(crate) enum HubRequest {
    Subscribe {
        topic: Topic,
        respond_to: oneshot::Sender<SubscriptionParts>,
    },
    Cancel {
        topic: Topic,
        id: u64,
    },
    Publish {
        topic: Topic,
    },
}

/// Reports from relay tasks, tagged with the generation of the relay that
/// sent them so that late reports from an aborted relay are ignored.
enum RelayEvent {
    Signal {
        topic: Topic,
        generation: u64,
        signal: Signal,
    },
    Link {
        topic: Topic,
        generation: u64,
        state: LinkState,
    },
}

struct TopicState {
    subscribers: HashMap<u64, mpsc::Sender<Signal>>,
    link: watch::Sender<LinkState>,
    relay: JoinHandle<()>,
    generation: u64,
}

pub struct NotificationHub {
    requests: mpsc::UnboundedReceiver<HubRequest>,
    events: mpsc::UnboundedReceiver<RelayEvent>,
    events_tx: mpsc::UnboundedSender<RelayEvent>,
    feed: Arc<dyn ChangeFeed>,
    config: NotificationConfig,
    topics: HashMap<Topic, TopicState>,
    next_id: u64,
    next_generation: u64,
}

impl NotificationHub {
    pub fn new(feed: Arc<dyn ChangeFeed>, config: NotificationConfig) -> (Self, NotificationClient) {
        let (sender, requests) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();
        let hub = Self {
            requests,
            events,
            events_tx,
            feed,
            config,
            topics: HashMap::new(),
            next_id: 1,
            next_generation: 0,
        };
        (hub, NotificationClient { sender })
    }

    /// Runs until every client and subscription is dropped.
    pub async fn run(mut self) {
        info!("Notification hub started");

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => self.handle_request(request).await,
                    None => break,
                },
                Some(event) = self.events.recv() => self.handle_event(event),
            }
        }

        for (_, state) in self.topics.drain() {
            state.relay.abort();
        }
        info!("Shutdown");
    }

    async fn handle_request(&mut self, request: HubRequest) {
        match request {
            HubRequest::Subscribe { topic, respond_to } => {
                if !self.topics.contains_key(&topic) {
                    let state = self.open_topic(topic).await;
                    self.topics.insert(topic, state);
                }
                let Some(state) = self.topics.get_mut(&topic) else {
                    return;
                };

                let id = self.next_id;
                self.next_id += 1;
                let (signals_tx, signals) = mpsc::channel(1);
                state.subscribers.insert(id, signals_tx);
                debug!(topic = topic.name(), id, subscribers = state.subscribers.len(), "Subscribe");

                let parts = SubscriptionParts {
                    id,
                    topic,
                    signals,
                    link: state.link.subscribe(),
                };
                if respond_to.send(parts).is_err() {
                    self.cancel(topic, id);
                }
            }
            HubRequest::Cancel { topic, id } => self.cancel(topic, id),
            HubRequest::Publish { topic } => self.fan_out(topic, Signal::Changed),
        }
    }

    fn handle_event(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::Signal {
                topic,
                generation,
                signal,
            } => {
                if self.is_current(topic, generation) {
                    self.fan_out(topic, signal);
                }
            }
            RelayEvent::Link {
                topic,
                generation,
                state,
            } => {
                if !self.is_current(topic, generation) {
                    return;
                }
                if let Some(topic_state) = self.topics.get(&topic) {
                    topic_state.link.send_replace(state);
                }
                if let LinkState::Failed { attempts } = state {
                    // Dropping the senders ends every subscriber stream.
                    if let Some(topic_state) = self.topics.remove(&topic) {
                        error!(
                            topic = topic.name(),
                            attempts,
                            subscribers = topic_state.subscribers.len(),
                            "Change feed unavailable, closing subscriptions"
                        );
                    }
                }
            }
        }
    }

    fn is_current(&self, topic: Topic, generation: u64) -> bool {
        self.topics
            .get(&topic)
            .is_some_and(|state| state.generation == generation)
    }

    async fn open_topic(&mut self, topic: Topic) -> TopicState {
        self.next_generation += 1;
        let generation = self.next_generation;

        // The first connect happens before the subscriber gets its handle, so
        // nothing committed after `subscribe` returns can be missed.
        let initial = match self.feed.connect().await {
            Ok(receiver) => Some(receiver),
            Err(e) => {
                warn!(topic = topic.name(), error = %e, "Initial connect failed");
                None
            }
        };
        let state = if initial.is_some() {
            LinkState::Connected
        } else {
            LinkState::Disconnected { attempt: 0 }
        };
        let (link, _) = watch::channel(state);

        let relay = Relay {
            feed: self.feed.clone(),
            topic,
            generation,
            config: self.config.clone(),
            events: self.events_tx.clone(),
        };
        let relay = tokio::spawn(relay.run(initial));
        info!(topic = topic.name(), generation, "Topic opened");

        TopicState {
            subscribers: HashMap::new(),
            link,
            relay,
            generation,
        }
    }

    fn cancel(&mut self, topic: Topic, id: u64) {
        let Some(state) = self.topics.get_mut(&topic) else {
            return;
        };
        state.subscribers.remove(&id);
        debug!(topic = topic.name(), id, subscribers = state.subscribers.len(), "Cancel");

        if state.subscribers.is_empty() {
            if let Some(state) = self.topics.remove(&topic) {
                state.relay.abort();
                info!(topic = topic.name(), "Last subscriber gone, transport closed");
            }
        }
    }

    fn fan_out(&mut self, topic: Topic, signal: Signal) {
        let Some(state) = self.topics.get_mut(&topic) else {
            return;
        };
        state.subscribers.retain(|id, sender| match sender.try_send(signal) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Closed(_)) => {
                debug!(id, "Subscriber gone");
                false
            }
        });
    }
}

/// A cloneable handle to the notification hub.
#[derive(Clone)]
pub struct NotificationClient {
    sender: mpsc::UnboundedSender<HubRequest>,
}

impl NotificationClient {
    /// Opens a subscription. The transport is connected before this returns.
    pub async fn subscribe(&self, topic: Topic) -> Result<Subscription, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(HubRequest::Subscribe { topic, respond_to })
            .map_err(|_| TransportError::HubClosed)?;
        let parts = response.await.map_err(|_| TransportError::HubClosed)?;
        Ok(Subscription::new(parts, self.sender.clone()))
    }

    /// Signals every subscriber of `topic` without going through the feed.
    pub fn publish(&self, topic: Topic) -> Result<(), TransportError> {
        self.sender
            .send(HubRequest::Publish { topic })
            .map_err(|_| TransportError::HubClosed)
    }
}

/// Task holding one transport connection for one topic.
struct Relay {
    feed: Arc<dyn ChangeFeed>,
    topic: Topic,
    generation: u64,
    config: NotificationConfig,
    events: mpsc::UnboundedSender<RelayEvent>,
}

impl Relay {
    async fn run(self, initial: Option<broadcast::Receiver<StoreChange>>) {
        let mut receiver = initial;
        loop {
            if let Some(connection) = receiver.take() {
                self.listen(connection).await;
                if self.events.is_closed() {
                    return;
                }
                self.link(LinkState::Disconnected { attempt: 0 });
            }

            match self.reconnect().await {
                Some(connection) => receiver = Some(connection),
                None => return,
            }
        }
    }

    /// Forwards commits until the connection closes or the hub goes away.
    async fn listen(&self, mut connection: broadcast::Receiver<StoreChange>) {
        loop {
            let forwarded = match connection.recv().await {
                Ok(change) if self.topic.covers(&change) => self.signal(Signal::Changed),
                Ok(_) => true,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(topic = self.topic.name(), skipped, "Change feed lagged, resyncing");
                    self.signal(Signal::Resync)
                }
                Err(RecvError::Closed) => {
                    warn!(topic = self.topic.name(), "Change feed disconnected");
                    return;
                }
            };
            if !forwarded {
                return;
            }
        }
    }

    /// Retries with exponential backoff. On success every subscriber gets one
    /// resync signal to cover whatever happened during the outage.
    async fn reconnect(&self) -> Option<broadcast::Receiver<StoreChange>> {
        let max_attempts = self.config.max_reconnect_attempts;
        let mut attempt: u32 = 0;
        loop {
            if max_attempts > 0 && attempt >= max_attempts {
                self.link(LinkState::Failed { attempts: attempt });
                return None;
            }
            attempt += 1;
            tokio::time::sleep(self.config.backoff(attempt)).await;

            match self.feed.connect().await {
                Ok(connection) => {
                    info!(topic = self.topic.name(), attempt, "Change feed reconnected");
                    self.link(LinkState::Connected);
                    if !self.signal(Signal::Resync) {
                        return None;
                    }
                    return Some(connection);
                }
                Err(e) => {
                    warn!(topic = self.topic.name(), attempt, error = %e, "Reconnect failed");
                    self.link(LinkState::Disconnected { attempt });
                }
            }
        }
    }

    fn signal(&self, signal: Signal) -> bool {
        self.events
            .send(RelayEvent::Signal {
                topic: self.topic,
                generation: self.generation,
                signal,
            })
            .is_ok()
    }

    fn link(&self, state: LinkState) {
        let _ = self.events.send(RelayEvent::Link {
            topic: self.topic,
            generation: self.generation,
            state,
        });
    }
}
