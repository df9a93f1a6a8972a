//! Integration tests for the control protocol over the in-process bus.
//!
//! A fake app subscribes to the request topics the way the real dictation
//! app does and answers through the same bus.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use dictctl::{
    bus::{
        ControlBus, ControlMessage, DictationMode, LocalBus, MessageHandler, PayloadValue,
        RequestError, RequestResponseClient, StatusResponse, Topic,
    },
    cli::{CliService, Dispatch, EXIT_NO_RESPONSE},
    settings::{MaskPolicy, MemoryBackend, SettingsSchema, SettingsStore},
};

/// Minimal stand-in for the dictation app.
struct FakeApp {
    mode: Arc<Mutex<String>>,
}

impl FakeApp {
    async fn start(bus: &LocalBus) -> Self {
        let mode = Arc::new(Mutex::new("off".to_string()));

        let current = mode.clone();
        let on_set_mode: MessageHandler = Arc::new(move |message: ControlMessage| {
            if let Some(PayloadValue::Text(next)) = message.get("mode") {
                *current.lock().unwrap() = next.clone();
            }
        });
        bus.subscribe(Topic::set_mode(), on_set_mode).await.unwrap();

        let current = mode.clone();
        let reply_bus = bus.clone();
        let on_get_status: MessageHandler = Arc::new(move |_| {
            let reply = StatusResponse {
                mode: Some(current.lock().unwrap().clone()),
                connected: Some(true),
                provider: Some("deepgram".to_string()),
                transcript: None,
            }
            .to_message();
            let reply_bus = reply_bus.clone();
            tokio::spawn(async move {
                let _ = reply_bus.publish(reply).await;
            });
        });
        bus.subscribe(Topic::get_status(), on_get_status).await.unwrap();

        Self { mode }
    }

    fn mode(&self) -> String {
        self.mode.lock().unwrap().clone()
    }
}

fn service(bus: &LocalBus, timeout: Duration) -> CliService {
    let settings = SettingsStore::new(
        SettingsSchema::builtin(),
        Box::new(MemoryBackend::new()),
        MaskPolicy::default(),
    );

    CliService::new(Arc::new(settings), Arc::new(bus.clone()), timeout)
}

fn args(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

#[tokio::test]
async fn mode_then_status_reflects_new_mode() {
    let bus = LocalBus::new();
    let app = FakeApp::start(&bus).await;
    let cli = service(&bus, Duration::from_secs(1));

    cli.dispatch(&args(&["mode", "on"])).await.unwrap();
    let status = cli.dispatch(&args(&["status"])).await.unwrap();

    assert_eq!(app.mode(), "on");
    assert_eq!(
        status,
        Dispatch::Output("Mode: on\nConnected: yes\nProvider: deepgram".to_string())
    );
}

#[tokio::test]
async fn status_reply_arrives_well_before_timeout() {
    let bus = LocalBus::new();
    let _app = FakeApp::start(&bus).await;
    let client = RequestResponseClient::new(Arc::new(bus.clone()));
    let timeout = Duration::from_secs(2);

    let started = Instant::now();
    let status = client.request_status(timeout).await.unwrap();

    assert!(started.elapsed() < timeout);
    assert_eq!(status.mode.as_deref(), Some("off"));
    assert_eq!(status.connected, Some(true));
}

#[tokio::test]
async fn status_times_out_within_bounds_without_app() {
    let bus = LocalBus::new();
    let client = RequestResponseClient::new(Arc::new(bus.clone()));
    let timeout = Duration::from_millis(200);

    let started = Instant::now();
    let result = client.request_status(timeout).await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(RequestError::NoResponse { .. })));
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + Duration::from_secs(1));
    assert_eq!(bus.subscriber_count(&Topic::status_response()), 0);
}

#[tokio::test]
async fn no_response_maps_to_distinct_exit_code() {
    let bus = LocalBus::new();
    let cli = service(&bus, Duration::from_millis(50));

    let error = cli.dispatch(&args(&["status"])).await.unwrap_err();

    assert_eq!(error.exit_code(), EXIT_NO_RESPONSE);
    assert!(error.to_string().contains("not running or not responding"));
}

#[tokio::test]
async fn reply_subscription_is_gone_after_success() {
    let bus = LocalBus::new();
    let _app = FakeApp::start(&bus).await;
    let cli = service(&bus, Duration::from_secs(1));

    cli.dispatch(&args(&["status"])).await.unwrap();

    assert_eq!(bus.subscriber_count(&Topic::status_response()), 0);
}

#[test]
fn set_mode_payload_matches_wire_contract() {
    let message = ControlMessage::set_mode(DictationMode::Sleep);

    assert_eq!(message.topic.as_str(), "setMode");
    assert_eq!(
        message.get("mode"),
        Some(&PayloadValue::Text("sleep".to_string()))
    );
    assert_eq!(ControlMessage::status_request().topic.as_str(), "getStatus");
    assert!(ControlMessage::status_request().payload.is_empty());
}
