use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{BusError, ControlBus, ControlMessage, MessageHandler, SubscriptionHandle, Topic};

/// Subscription data stored by the bus.
struct LocalSubscription {
    id: u64,
    topic: Topic,
    handler: MessageHandler,
}

#[derive(Default)]
struct Inner {
    subscriptions: RwLock<Vec<LocalSubscription>>,
    next_id: AtomicU64,
}

/// In-process control bus.
///
/// Delivers synchronously to every matching handler before `publish`
/// returns. Handlers are called outside the subscriber lock, so a handler
/// may spawn further publishes or tear down its own subscription. Clones
/// share the same subscriber set.
#[derive(Clone, Default)]
pub struct LocalBus {
    inner: Arc<Inner>,
}

impl LocalBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        match self.inner.subscriptions.read() {
            Ok(subscriptions) => subscriptions.iter().filter(|s| &s.topic == topic).count(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .filter(|s| &s.topic == topic)
                .count(),
        }
    }

    fn matching_handlers(&self, topic: &Topic) -> Result<Vec<MessageHandler>, BusError> {
        let subscriptions = self
            .inner
            .subscriptions
            .read()
            .map_err(|_| BusError::Lock { lock_type: "read" })?;

        Ok(subscriptions
            .iter()
            .filter(|subscription| &subscription.topic == topic)
            .map(|subscription| subscription.handler.clone())
            .collect())
    }
}

#[async_trait]
impl ControlBus for LocalBus {
    #[instrument(skip(self, message), fields(topic = %message.topic))]
    async fn publish(&self, message: ControlMessage) -> Result<(), BusError> {
        let handlers = self.matching_handlers(&message.topic)?;
        debug!(subscribers = handlers.len(), "publishing");

        for handler in handlers {
            handler(message.clone());
        }

        Ok(())
    }

    #[instrument(skip(self, handler))]
    async fn subscribe(
        &self,
        topic: Topic,
        handler: MessageHandler,
    ) -> Result<SubscriptionHandle, BusError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let mut subscriptions = self
            .inner
            .subscriptions
            .write()
            .map_err(|_| BusError::Lock { lock_type: "write" })?;

        subscriptions.push(LocalSubscription {
            id,
            topic: topic.clone(),
            handler,
        });

        debug!(id, "subscribed");
        Ok(SubscriptionHandle::new(id, topic))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), BusError> {
        let mut subscriptions = self
            .inner
            .subscriptions
            .write()
            .map_err(|_| BusError::Lock { lock_type: "write" })?;

        let position = subscriptions
            .iter()
            .position(|subscription| subscription.id == handle.id())
            .ok_or(BusError::UnknownSubscription { id: handle.id() })?;

        subscriptions.remove(position);
        debug!(id = handle.id(), topic = %handle.topic(), "unsubscribed");

        Ok(())
    }
}
