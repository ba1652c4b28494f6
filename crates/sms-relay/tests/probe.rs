/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

// tests/probe.rs
// The probe wait loop on a paused clock, and the escalation path.

mod common;

use std::time::Duration;

use common::{RECEIVE_TOPIC, RecordingMailer, RecordingPublisher, SEND_TOPIC, ScriptedEvents};
use relaybus::{IncomingPublish, SessionError, SessionEvent};
use sms_relay::OutboundMessage;
use sms_relay::logging::LogCapture;
use sms_relay::probe::{PROBE_TICK, PROBE_TICKS, ProbeResponder, ProbeState, escalate, wait_for_echo};

const SERVER_NUMBER: &str = "+33600000000";
const PAYLOAD: &str = "Test from pi4 2026-10-16T08:00:00.000000";

fn create_test_responder() -> ProbeResponder {
    ProbeResponder::with_parts("Testpi4", PAYLOAD, SERVER_NUMBER, SEND_TOPIC)
}

fn echo(message: &str) -> SessionEvent {
    let payload = serde_json::json!({
        "number": SERVER_NUMBER,
        "date": "2026-10-16 08:00:03",
        "message": message,
    });
    SessionEvent::Message(IncomingPublish::new(
        RECEIVE_TOPIC,
        payload.to_string(),
        false,
    ))
}

#[tokio::test(start_paused = true)]
async fn test_echo_stops_the_wait() {
    let mut events = ScriptedEvents::new()
        .at(Duration::from_millis(100), SessionEvent::Subscribed)
        .at(Duration::from_millis(3500), echo(&format!("Testpi4 {PAYLOAD}")));
    let mut responder = create_test_responder();
    let publisher = RecordingPublisher::new();

    let report = wait_for_echo(&mut events, &mut responder, &publisher, PROBE_TICKS, PROBE_TICK).await;

    assert_eq!(report.state, ProbeState::Matched);
    assert_eq!(report.ticks_used, 4);
    assert!(report.matched());
    assert_eq!(
        publisher.messages(),
        vec![OutboundMessage::new(SERVER_NUMBER, format!("Testpi4 {PAYLOAD}"))]
    );
    assert_eq!(publisher.published()[0].topic, SEND_TOPIC);
}

#[tokio::test(start_paused = true)]
async fn test_silence_uses_every_tick() {
    let mut events = ScriptedEvents::new().at(Duration::ZERO, SessionEvent::Subscribed);
    let mut responder = create_test_responder();
    let publisher = RecordingPublisher::new();

    let start = tokio::time::Instant::now();
    let report = wait_for_echo(&mut events, &mut responder, &publisher, PROBE_TICKS, PROBE_TICK).await;

    assert_eq!(report.state, ProbeState::AwaitingEcho);
    assert_eq!(report.ticks_used, PROBE_TICKS);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(60));
    assert!(elapsed < Duration::from_secs(61));
}

#[tokio::test(start_paused = true)]
async fn test_wrong_echo_keeps_waiting() {
    let mut events = ScriptedEvents::new()
        .at(Duration::ZERO, SessionEvent::Subscribed)
        .at(Duration::from_secs(2), echo("Testpi4 Test from pi4 yesterday"))
        .at(Duration::from_secs(3), echo(&format!("testpi4 {PAYLOAD}")))
        .at(Duration::from_secs(4), echo(&format!("Testpi3 {PAYLOAD}")));
    let mut responder = create_test_responder();
    let publisher = RecordingPublisher::new();

    let report = wait_for_echo(&mut events, &mut responder, &publisher, PROBE_TICKS, PROBE_TICK).await;

    assert_eq!(report.state, ProbeState::AwaitingEcho);
    assert_eq!(report.ticks_used, PROBE_TICKS);
}

#[tokio::test(start_paused = true)]
async fn test_probe_is_resent_after_resubscribe() {
    let broken_pipe = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broker went away");
    let mut events = ScriptedEvents::new()
        .at(Duration::ZERO, SessionEvent::Subscribed)
        .error_at(
            Duration::from_millis(1200),
            SessionError::from(rumqttc::ConnectionError::Io(broken_pipe)),
        )
        .at(
            Duration::from_millis(2100),
            SessionEvent::Connected {
                session_present: false,
            },
        )
        .at(Duration::from_millis(2200), SessionEvent::Subscribed)
        .at(Duration::from_millis(9900), echo(&format!("Testpi4 {PAYLOAD}")));
    let mut responder = create_test_responder();
    let publisher = RecordingPublisher::new();

    let report = wait_for_echo(&mut events, &mut responder, &publisher, PROBE_TICKS, PROBE_TICK).await;

    assert_eq!(report.ticks_used, 10);
    assert!(report.matched());
    assert_eq!(publisher.published().len(), 2);
}

#[tokio::test]
async fn test_escalate_restarts_then_mails_the_log() {
    let mut server = mockito::Server::new_async().await;
    let restart = server
        .mock("GET", "/restart")
        .with_status(200)
        .with_body("restarting")
        .create_async()
        .await;
    let url = format!("{}/restart", server.url());

    let capture = LogCapture::new();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(capture.clone())
        .finish();
    let _default = tracing::subscriber::set_default(subscriber);
    tracing::error!("Waiting for 'a', received 'b' - Ignored!");

    let mailer = RecordingMailer::new();
    let log = escalate(&url, &reqwest::Client::new(), &mailer, "pi4", &capture)
        .await
        .unwrap();

    restart.assert_async().await;
    assert!(log.contains("Waiting for 'a', received 'b' - Ignored!"));
    assert!(log.contains("Restarting SMS server returned restarting"));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "pi4: SMS server not answering !!!");
    assert_eq!(sent[0].body, log);
    assert_eq!(sent[0].to, None);
}

#[tokio::test]
async fn test_escalate_logs_failed_restart() {
    let mut server = mockito::Server::new_async().await;
    let restart = server
        .mock("GET", "/restart")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let url = format!("{}/restart", server.url());

    let capture = LogCapture::new();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(capture.clone())
        .finish();
    let _default = tracing::subscriber::set_default(subscriber);

    let mailer = RecordingMailer::new();
    let log = escalate(&url, &reqwest::Client::new(), &mailer, "pi4", &capture)
        .await
        .unwrap();

    restart.assert_async().await;
    assert!(log.contains("Restart request returned error 500 boom"));
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_escalate_without_restart_url_only_mails() {
    let capture = LogCapture::new();
    let mailer = RecordingMailer::new();

    escalate("", &reqwest::Client::new(), &mailer, "pi4", &capture)
        .await
        .unwrap();

    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_escalate_reports_mail_failure() {
    let capture = LogCapture::new();
    let mailer = RecordingMailer::failing();

    let result = escalate("", &reqwest::Client::new(), &mailer, "pi4", &capture).await;
    assert!(result.is_err());
}
