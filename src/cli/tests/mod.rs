//! Unit tests for the CLI module
//!
//! Exercise argument dispatch end to end over an in-memory settings backend
//! and the in-process bus.
#![allow(clippy::unwrap_used)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    bus::{
        ControlBus, ControlMessage, LocalBus, MessageHandler, StatusResponse, Topic,
    },
    cli::{
        CliError, CliService, CommandRegistry, Dispatch, EXIT_NO_RESPONSE, EXIT_USAGE_ERROR,
        formatting::Colors,
    },
    settings::{MaskPolicy, MemoryBackend, SettingsSchema, SettingsStore},
};

const SHORT_TIMEOUT: Duration = Duration::from_millis(100);

fn args(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

fn service_with(bus: &LocalBus) -> CliService {
    let settings = SettingsStore::new(
        SettingsSchema::builtin(),
        Box::new(MemoryBackend::new()),
        MaskPolicy::default(),
    );

    CliService::new(Arc::new(settings), Arc::new(bus.clone()), SHORT_TIMEOUT)
}

async fn output(service: &CliService, words: &[&str]) -> String {
    match service.dispatch(&args(words)).await.unwrap() {
        Dispatch::Output(text) => text,
        Dispatch::PassThrough => panic!("expected output for {words:?}"),
    }
}

#[tokio::test]
async fn empty_arguments_show_help() {
    let service = service_with(&LocalBus::new());

    let help = output(&service, &[]).await;

    assert!(help.contains("config set <key> <value>"));
    assert!(help.contains("mode <on|off|sleep>"));
    assert!(help.contains("status [--json]"));
}

#[tokio::test]
async fn help_aliases_agree() {
    let service = service_with(&LocalBus::new());

    let plain = output(&service, &["help"]).await;

    assert_eq!(output(&service, &["-h"]).await, plain);
    assert_eq!(output(&service, &["--help"]).await, plain);
}

#[tokio::test]
async fn help_lists_settings_in_schema_order() {
    let service = service_with(&LocalBus::new());

    let help = output(&service, &["help"]).await;
    let provider = help.find("dictation_provider").unwrap();
    let sounds = help.find("play_sounds").unwrap();

    assert!(provider < sounds);
    assert!(help.contains("sleep_timer_minutes"));
}

#[tokio::test]
async fn version_flags_print_package_version() {
    let service = service_with(&LocalBus::new());

    let version = output(&service, &["--version"]).await;

    assert_eq!(version, output(&service, &["-v"]).await);
    assert!(version.ends_with(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn unrecognized_dash_token_passes_through() {
    let service = service_with(&LocalBus::new());

    let result = service.dispatch(&args(&["-psn_0_12345"])).await.unwrap();

    assert_eq!(result, Dispatch::PassThrough);
}

#[tokio::test]
async fn unknown_command_exits_with_usage_code() {
    let service = service_with(&LocalBus::new());

    let error = service.dispatch(&args(&["frobnicate"])).await.unwrap_err();

    assert!(matches!(error, CliError::UnknownCommand { .. }));
    assert_eq!(error.exit_code(), EXIT_USAGE_ERROR);
    assert!(error.to_string().contains("dictctl help"));
}

#[tokio::test]
async fn unknown_config_subcommand_is_unknown() {
    let service = service_with(&LocalBus::new());

    let error = service
        .dispatch(&args(&["config", "watch"]))
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::UnknownCommand { command } if command == "config watch"));
}

#[tokio::test]
async fn bare_category_reports_subcommands() {
    let service = service_with(&LocalBus::new());

    let error = service.dispatch(&args(&["config"])).await.unwrap_err();

    assert_eq!(error.exit_code(), EXIT_USAGE_ERROR);
    assert!(error.to_string().contains("dictctl config <get|list|set>"));
}

#[tokio::test]
async fn missing_arguments_report_usage() {
    let service = service_with(&LocalBus::new());

    let error = service
        .dispatch(&args(&["config", "set", "play_sounds"]))
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::Usage { .. }));
    assert!(error.to_string().contains("dictctl config set <key> <value>"));
}

#[tokio::test]
async fn extra_arguments_report_usage() {
    let service = service_with(&LocalBus::new());

    let error = service
        .dispatch(&args(&["mode", "on", "now"]))
        .await
        .unwrap_err();

    assert!(error.to_string().contains("dictctl mode <on|off|sleep>"));
}

#[tokio::test]
async fn config_set_then_get_round_trips() {
    let service = service_with(&LocalBus::new());

    let set = output(&service, &["config", "set", "live_dictation_enabled", "on"]).await;
    let get = output(&service, &["config", "get", "live_dictation_enabled"]).await;

    assert_eq!(set, "Set live_dictation_enabled = true");
    assert_eq!(get, "live_dictation_enabled: true");
}

#[tokio::test]
async fn config_get_reports_missing_value() {
    let service = service_with(&LocalBus::new());

    let get = output(&service, &["config", "get", "dictation_language"]).await;

    assert_eq!(get, "dictation_language: (not set)");
}

#[tokio::test]
async fn invalid_number_is_a_validation_error() {
    let service = service_with(&LocalBus::new());
    output(&service, &["config", "set", "sleep_timer_minutes", "15"]).await;

    let error = service
        .dispatch(&args(&["config", "set", "sleep_timer_minutes", "abc"]))
        .await
        .unwrap_err();

    assert_eq!(error.exit_code(), EXIT_USAGE_ERROR);
    assert_eq!(
        output(&service, &["config", "get", "sleep_timer_minutes"]).await,
        "sleep_timer_minutes: 15"
    );
}

#[tokio::test]
async fn config_list_masks_secrets_but_get_does_not() {
    let service = service_with(&LocalBus::new());
    output(&service, &["config", "set", "openai_api_key", "sk-abcdefghijklmnop"]).await;

    let list = output(&service, &["config", "list"]).await;
    let get = output(&service, &["config", "get", "openai_api_key"]).await;

    assert!(list.contains("sk-a...(19 chars)"));
    assert!(!list.contains("sk-abcdefghijklmnop"));
    assert_eq!(get, "openai_api_key: sk-abcdefghijklmnop");
}

#[tokio::test]
async fn mode_publishes_set_mode() {
    let bus = LocalBus::new();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let handler: MessageHandler = Arc::new(move |message| sink.lock().unwrap().push(message));
    bus.subscribe(Topic::set_mode(), handler).await.unwrap();
    let service = service_with(&bus);

    output(&service, &["mode", "Sleep"]).await;

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        ControlMessage::set_mode("sleep".parse().unwrap())
    );
}

#[tokio::test]
async fn mode_without_listener_still_succeeds() {
    let service = service_with(&LocalBus::new());

    let result = service.dispatch(&args(&["mode", "off"])).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn invalid_mode_is_a_usage_error() {
    let service = service_with(&LocalBus::new());

    let error = service
        .dispatch(&args(&["mode", "loud"]))
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::Usage { .. }));
    assert!(error.to_string().contains("invalid mode 'loud'"));
}

#[tokio::test]
async fn status_without_app_reports_no_response() {
    let bus = LocalBus::new();
    let service = service_with(&bus);

    let error = service.dispatch(&args(&["status"])).await.unwrap_err();

    assert!(matches!(error, CliError::NoResponse { .. }));
    assert_eq!(error.exit_code(), EXIT_NO_RESPONSE);
    assert_eq!(bus.subscriber_count(&Topic::status_response()), 0);
}

async fn answer_status(bus: &LocalBus, status: StatusResponse) {
    let reply_bus = bus.clone();
    let handler: MessageHandler = Arc::new(move |_| {
        let reply_bus = reply_bus.clone();
        let reply = status.to_message();
        tokio::spawn(async move {
            let _ = reply_bus.publish(reply).await;
        });
    });

    bus.subscribe(Topic::get_status(), handler).await.unwrap();
}

#[tokio::test]
async fn status_prints_reply() {
    let bus = LocalBus::new();
    answer_status(
        &bus,
        StatusResponse {
            mode: Some("on".to_string()),
            connected: Some(true),
            ..StatusResponse::default()
        },
    )
    .await;
    let service = service_with(&bus);

    let text = output(&service, &["status"]).await;

    assert_eq!(text, "Mode: on\nConnected: yes");
}

#[tokio::test]
async fn status_json_omits_missing_fields() {
    let bus = LocalBus::new();
    answer_status(
        &bus,
        StatusResponse {
            provider: Some("deepgram".to_string()),
            ..StatusResponse::default()
        },
    )
    .await;
    let service = service_with(&bus);

    let text = output(&service, &["status", "--json"]).await;
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json, serde_json::json!({ "provider": "deepgram" }));
}

#[tokio::test]
async fn status_rejects_unknown_flag() {
    let service = service_with(&LocalBus::new());

    let error = service
        .dispatch(&args(&["status", "--yaml"]))
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::Usage { .. }));
}

#[test]
fn registry_lists_top_level_before_categories() {
    let bus: Arc<dyn ControlBus> = Arc::new(LocalBus::new());
    let settings = Arc::new(SettingsStore::new(
        SettingsSchema::builtin(),
        Box::new(MemoryBackend::new()),
        MaskPolicy::default(),
    ));
    let mut registry = CommandRegistry::new();
    crate::cli::commands::config::register_commands(&mut registry, settings);
    crate::cli::commands::register_control_commands(&mut registry, bus, SHORT_TIMEOUT);

    let names: Vec<String> = registry
        .list_commands()
        .iter()
        .map(|metadata| metadata.invocation())
        .collect();

    assert_eq!(
        names,
        vec![
            "mode <on|off|sleep>",
            "status [--json]",
            "config get <key>",
            "config list",
            "config set <key> <value>",
        ]
    );
}

#[test]
fn help_is_colored() {
    let service = service_with(&LocalBus::new());

    assert!(service.help_text().contains(Colors::RESET));
}

#[tokio::test]
async fn help_for_command_shows_arguments_and_examples() {
    let service = service_with(&LocalBus::new());

    let help = output(&service, &["help", "config", "set"]).await;

    assert!(help.contains("dictctl config set <key> <value>"));
    assert!(help.contains("booleans accept true/1/yes/on"));
    assert!(help.contains("dictctl config set sleep_timer_minutes 15"));
    assert_eq!(output(&service, &["--help", "config", "set"]).await, help);
}

#[tokio::test]
async fn help_for_flag_argument_shows_its_description() {
    let service = service_with(&LocalBus::new());

    let help = output(&service, &["help", "status"]).await;

    assert!(help.contains("[--json]"));
    assert!(help.contains("Print the reply as JSON"));
}

#[tokio::test]
async fn help_for_unknown_command_is_an_error() {
    let service = service_with(&LocalBus::new());

    let error = service
        .dispatch(&args(&["help", "frobnicate"]))
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::UnknownCommand { .. }));
}
