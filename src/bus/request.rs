use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use thiserror::Error;
use tokio::{sync::oneshot, time};
use tracing::{debug, instrument, warn};

use super::{
    BusError, ControlBus, ControlMessage, MessageHandler, StatusResponse, SubscriptionHandle,
    Topic,
};

/// How long `status` waits for the app before reporting it as not running.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome of a request that did not produce a reply.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Nobody answered before the deadline. This is the expected outcome
    /// when the app is not running.
    #[error("no response within {}ms", timeout.as_millis())]
    NoResponse {
        /// How long the request waited
        timeout: Duration,
    },

    /// The bus dropped the reply subscription before anything arrived.
    #[error("reply subscription on '{topic}' closed before a response arrived")]
    SubscriptionClosed {
        /// Topic the reply was expected on
        topic: String,
    },

    /// The transport failed.
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Synchronous-style requests over the one-way control bus.
///
/// Each request subscribes to the reply topic, publishes the request, waits
/// for the first reply or the deadline, then unsubscribes. Only the first
/// reply is honoured; anything arriving later is discarded.
pub struct RequestResponseClient {
    bus: Arc<dyn ControlBus>,
}

impl RequestResponseClient {
    /// Creates a client over `bus`.
    pub fn new(bus: Arc<dyn ControlBus>) -> Self {
        Self { bus }
    }

    /// Asks the app for its status.
    ///
    /// # Errors
    /// * `RequestError::NoResponse` - the app did not answer within `timeout`
    /// * `RequestError::Bus` - the bus could not be used
    pub async fn request_status(&self, timeout: Duration) -> Result<StatusResponse, RequestError> {
        let reply = self
            .request(
                ControlMessage::status_request(),
                Topic::status_response(),
                timeout,
            )
            .await?;

        Ok(StatusResponse::from(&reply))
    }

    /// Publishes `request` and waits for the first message on `reply_topic`.
    ///
    /// The reply subscription is installed before the request goes out, so a
    /// reply cannot slip past, and it is removed on every exit path,
    /// including cancellation of the returned future.
    ///
    /// # Errors
    /// See [`RequestError`].
    #[instrument(skip(self, request), fields(request = %request.topic))]
    pub async fn request(
        &self,
        request: ControlMessage,
        reply_topic: Topic,
        timeout: Duration,
    ) -> Result<ControlMessage, RequestError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let reply_slot = Arc::new(Mutex::new(Some(reply_tx)));

        let handler: MessageHandler = Arc::new(move |message| {
            let sender = reply_slot.lock().ok().and_then(|mut slot| slot.take());
            if let Some(sender) = sender {
                let _ = sender.send(message);
            }
        });

        let handle = self.bus.subscribe(reply_topic.clone(), handler).await?;
        let _subscription = SubscriptionGuard::new(self.bus.as_ref(), handle);

        self.bus.publish(request).await?;
        debug!(timeout_ms = timeout.as_millis() as u64, "awaiting reply");

        match time::timeout(timeout, reply_rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(RequestError::SubscriptionClosed {
                topic: reply_topic.to_string(),
            }),
            Err(_) => {
                debug!("no reply before deadline");
                Err(RequestError::NoResponse { timeout })
            }
        }
    }
}

/// Unsubscribes when dropped.
struct SubscriptionGuard<'a> {
    bus: &'a dyn ControlBus,
    handle: Option<SubscriptionHandle>,
}

impl<'a> SubscriptionGuard<'a> {
    fn new(bus: &'a dyn ControlBus, handle: SubscriptionHandle) -> Self {
        Self {
            bus,
            handle: Some(handle),
        }
    }
}

impl Drop for SubscriptionGuard<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.bus.unsubscribe(handle) {
                warn!(error = %e, "failed to remove reply subscription");
            }
        }
    }
}
