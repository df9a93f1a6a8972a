use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::{sync::OnceCell, task::JoinHandle};
use tracing::{debug, instrument, warn};
use zbus::{
    Connection, MatchRule, Message, MessageStream,
    names::BusName,
    zvariant::{OwnedValue, Value},
};

use super::{
    BusError, ControlBus, ControlMessage, MessageHandler, Payload, PayloadValue,
    SubscriptionHandle, Topic,
};

/// Object path control signals are emitted from.
pub const OBJECT_PATH: &str = "/io/dictctl/Control";

/// Interface control signals belong to. The signal member is the topic name.
pub const INTERFACE: &str = "io.dictctl.Control";

/// Which D-Bus message bus to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BusKind {
    /// The per-login session bus.
    #[default]
    Session,

    /// The machine-wide system bus.
    System,
}

impl BusKind {
    /// Lowercase name used in configuration and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusKind::Session => "session",
            BusKind::System => "system",
        }
    }
}

impl fmt::Display for BusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "session" => Ok(BusKind::Session),
            "system" => Ok(BusKind::System),
            other => Err(format!("unknown bus '{other}', expected session or system")),
        }
    }
}

/// Control bus carried by D-Bus broadcast signals.
///
/// Each control message becomes a signal on [`INTERFACE`] whose member is the
/// topic and whose single `a{sv}` argument is the payload. Signals without a
/// destination reach every connection with a matching rule, which gives the
/// same lossy fan-out as a notification center.
///
/// The connection is opened lazily on first publish or subscribe, so
/// commands that never touch the bus work without a running bus daemon.
pub struct DbusBus {
    kind: BusKind,
    connection: OnceCell<Connection>,
    listeners: Mutex<HashMap<u64, JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl DbusBus {
    /// Creates a bus that will connect to `kind` when first used.
    pub fn new(kind: BusKind) -> Self {
        Self {
            kind,
            connection: OnceCell::new(),
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    async fn connection(&self) -> Result<&Connection, BusError> {
        self.connection
            .get_or_try_init(|| async {
                debug!(bus = %self.kind, "connecting to message bus");

                let connection = match self.kind {
                    BusKind::Session => Connection::session().await,
                    BusKind::System => Connection::system().await,
                };

                connection.map_err(|e| BusError::Connection {
                    bus: self.kind.to_string(),
                    details: e.to_string(),
                })
            })
            .await
    }

    fn match_rule(topic: &Topic) -> zbus::Result<MatchRule<'_>> {
        Ok(MatchRule::builder()
            .msg_type(zbus::message::Type::Signal)
            .path(OBJECT_PATH)?
            .interface(INTERFACE)?
            .member(topic.as_str())?
            .build())
    }
}

#[async_trait]
impl ControlBus for DbusBus {
    #[instrument(skip(self, message), fields(topic = %message.topic))]
    async fn publish(&self, message: ControlMessage) -> Result<(), BusError> {
        let connection = self.connection().await?;
        let body: HashMap<String, Value<'_>> = message
            .payload
            .iter()
            .map(|(key, value)| (key.clone(), to_variant(value)))
            .collect();

        connection
            .emit_signal(
                None::<BusName<'_>>,
                OBJECT_PATH,
                INTERFACE,
                message.topic.as_str(),
                &body,
            )
            .await
            .map_err(|e| BusError::Publish {
                topic: message.topic.to_string(),
                details: e.to_string(),
            })?;

        debug!("signal emitted");
        Ok(())
    }

    #[instrument(skip(self, handler))]
    async fn subscribe(
        &self,
        topic: Topic,
        handler: MessageHandler,
    ) -> Result<SubscriptionHandle, BusError> {
        let subscribe_error = |e: zbus::Error| BusError::Subscribe {
            topic: topic.to_string(),
            details: e.to_string(),
        };

        let connection = self.connection().await?;
        let rule = Self::match_rule(&topic).map_err(subscribe_error)?;

        // Resolves only after the bus daemon has installed the match rule.
        let mut stream = MessageStream::for_match_rule(rule, connection, None)
            .await
            .map_err(subscribe_error)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let listener_topic = topic.clone();

        let listener = tokio::spawn(async move {
            while let Some(received) = stream.next().await {
                let message = match received {
                    Ok(message) => message,
                    Err(e) => {
                        warn!(topic = %listener_topic, error = %e, "dropping unreadable signal");
                        continue;
                    }
                };

                match decode_payload(&message) {
                    Ok(payload) => handler(ControlMessage {
                        topic: listener_topic.clone(),
                        payload,
                    }),
                    Err(e) => {
                        debug!(topic = %listener_topic, error = %e, "ignoring malformed signal body");
                    }
                }
            }
        });

        let mut listeners = self
            .listeners
            .lock()
            .map_err(|_| BusError::Lock { lock_type: "write" })?;
        listeners.insert(id, listener);

        debug!(id, "subscribed");
        Ok(SubscriptionHandle::new(id, topic))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), BusError> {
        let listener = self
            .listeners
            .lock()
            .map_err(|_| BusError::Lock { lock_type: "write" })?
            .remove(&handle.id())
            .ok_or(BusError::UnknownSubscription { id: handle.id() })?;

        // Dropping the stream inside the task removes the match rule.
        listener.abort();
        debug!(id = handle.id(), topic = %handle.topic(), "unsubscribed");

        Ok(())
    }
}

impl Drop for DbusBus {
    fn drop(&mut self) {
        let listeners = match self.listeners.get_mut() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };

        for (_, listener) in listeners.drain() {
            listener.abort();
        }
    }
}

fn to_variant(value: &PayloadValue) -> Value<'_> {
    match value {
        PayloadValue::Text(text) => Value::from(text.as_str()),
        PayloadValue::Flag(flag) => Value::from(*flag),
    }
}

/// Decodes the `a{sv}` signal body, keeping only string and boolean entries.
fn decode_payload(message: &Message) -> zbus::Result<Payload> {
    let body = message.body();
    let raw: HashMap<String, OwnedValue> = body.deserialize()?;

    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match &*value {
                Value::Str(text) => PayloadValue::Text(text.as_str().to_string()),
                Value::Bool(flag) => PayloadValue::Flag(*flag),
                _ => return None,
            };
            Some((key, value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_kind_parses_case_insensitively() {
        assert_eq!("session".parse::<BusKind>(), Ok(BusKind::Session));
        assert_eq!("SYSTEM".parse::<BusKind>(), Ok(BusKind::System));
        assert!("starship".parse::<BusKind>().is_err());
    }

    #[test]
    fn match_rule_targets_topic_member() {
        let topic = Topic::status_response();
        let rule = DbusBus::match_rule(&topic).map(|rule| rule.to_string());

        let rule = rule.unwrap_or_default();
        assert!(rule.contains("type='signal'"));
        assert!(rule.contains("interface='io.dictctl.Control'"));
        assert!(rule.contains("member='statusResponse'"));
        assert!(rule.contains("path='/io/dictctl/Control'"));
    }

    #[test]
    fn payload_values_map_to_matching_variants() {
        let text = PayloadValue::from("on");
        let flag = PayloadValue::from(true);

        assert_eq!(to_variant(&text), Value::from("on"));
        assert_eq!(to_variant(&flag), Value::from(true));
    }

    #[test]
    fn new_bus_does_not_connect() {
        let bus = DbusBus::new(BusKind::System);

        assert!(bus.connection.get().is_none());
    }
}
