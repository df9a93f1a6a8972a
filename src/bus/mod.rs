//! Control bus between the CLI and the running dictation app.
//!
//! The bus is a one-way, best-effort publish/subscribe primitive: messages
//! published while nobody is subscribed to their topic are simply lost.
//! Fire-and-forget directives use it directly; request/response exchanges
//! such as the status query are composed on top of it by
//! [`RequestResponseClient`].

mod dbus;
mod error;
mod local;
mod message;
mod request;

use std::sync::Arc;

use async_trait::async_trait;

pub use dbus::{BusKind, DbusBus, INTERFACE, OBJECT_PATH};
pub use error::BusError;
pub use local::LocalBus;
pub use message::{
    ControlMessage, DictationMode, ParseModeError, Payload, PayloadValue, StatusResponse, Topic,
};
pub use request::{DEFAULT_STATUS_TIMEOUT, RequestError, RequestResponseClient};

/// Callback invoked for every message delivered to a subscription.
///
/// Handlers run on the bus's delivery path and must not block; anything that
/// needs to await should be spawned.
pub type MessageHandler = Arc<dyn Fn(ControlMessage) + Send + Sync>;

/// Identifies a live subscription.
///
/// Handles are not `Clone`: passing one to [`ControlBus::unsubscribe`]
/// consumes it, so each subscription is torn down exactly once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: u64,
    topic: Topic,
}

impl SubscriptionHandle {
    pub(crate) fn new(id: u64, topic: Topic) -> Self {
        Self { id, topic }
    }

    /// Bus-assigned subscription id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Topic the subscription listens on.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }
}

/// Host-local publish/subscribe transport.
#[async_trait]
pub trait ControlBus: Send + Sync {
    /// Broadcasts `message` to current subscribers of its topic.
    ///
    /// Succeeds whether or not anyone is listening; there is no
    /// acknowledgement and no queuing for later subscribers.
    ///
    /// # Errors
    /// Returns `BusError` only when the transport itself fails.
    async fn publish(&self, message: ControlMessage) -> Result<(), BusError>;

    /// Registers `handler` for every message published on `topic`, by this or
    /// any other process, until the returned handle is unsubscribed.
    ///
    /// The subscription is active when this returns, so a message published
    /// afterwards is guaranteed to reach it.
    ///
    /// # Errors
    /// Returns `BusError` if the subscription cannot be installed.
    async fn subscribe(
        &self,
        topic: Topic,
        handler: MessageHandler,
    ) -> Result<SubscriptionHandle, BusError>;

    /// Deactivates a subscription.
    ///
    /// Synchronous so that it can run from `Drop`. An invocation already in
    /// progress may finish, but no publish starting after this returns will
    /// reach the handler.
    ///
    /// # Errors
    /// Returns `BusError::UnknownSubscription` if the handle does not belong
    /// to this bus.
    fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), BusError>;
}
