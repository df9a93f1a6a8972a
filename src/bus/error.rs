use thiserror::Error;

/// Errors raised by control bus implementations.
///
/// Publishing with no listener is not an error; these cover failures of the
/// transport itself.
#[derive(Error, Debug)]
pub enum BusError {
    /// Could not connect to the message bus.
    #[error("failed to connect to the {bus} bus: {details}")]
    Connection {
        /// Which bus was being connected to
        bus: String,
        /// Connection error details
        details: String,
    },

    /// A message could not be sent.
    #[error("failed to publish '{topic}': {details}")]
    Publish {
        /// Topic of the message
        topic: String,
        /// Transport error details
        details: String,
    },

    /// A subscription could not be installed.
    #[error("failed to subscribe to '{topic}': {details}")]
    Subscribe {
        /// Topic being subscribed to
        topic: String,
        /// Transport error details
        details: String,
    },

    /// The handle does not belong to a live subscription on this bus.
    #[error("no active subscription with id {id}")]
    UnknownSubscription {
        /// Subscription id carried by the handle
        id: u64,
    },

    /// Subscriber bookkeeping was poisoned by a panicking thread.
    #[error("failed to acquire {lock_type} lock on subscriptions")]
    Lock {
        /// Type of lock that failed (read, write)
        lock_type: &'static str,
    },
}
