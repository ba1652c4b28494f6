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

// src/probe.rs
// End-to-end check of the SMS server.
//
// The probe sends an SMS to the SMS server's own number through the
// broker and waits for it to come back on the receive topic. If it does
// not show up in time, the server is restarted (when a restart URL is
// configured) and the run's log is mailed to the sender address.

use std::time::Duration;

use chrono::Local;
use relaybus::{EventSource, Publisher, SessionEvent, SessionResult, publish_json};
use serde_json::Value;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, error, info, warn};

use crate::envelope::{MESSAGE_KEY, OutboundMessage, field_or_default};
use crate::errors::MailError;
use crate::logging::LogCapture;
use crate::mail::{MailMessage, Mailer};
use crate::restart::trigger_restart;

// PROBE_TICKS is how many ticks the probe waits for its echo.
pub const PROBE_TICKS: u32 = 60;
pub const PROBE_TICK: Duration = Duration::from_secs(1);

const PAYLOAD_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    AwaitingEcho,
    // Matched is terminal.
    Matched,
}

// ProbeResponder tracks one probe: what was sent and whether it came
// back.
#[derive(Debug, Clone)]
pub struct ProbeResponder {
    prefix: String,
    payload: String,
    number: String,
    send_topic: String,
    state: ProbeState,
}

impl ProbeResponder {
    pub fn new(host_name: &str, number: impl Into<String>, send_topic: impl Into<String>) -> Self {
        let payload = format!(
            "Test from {host_name} {}",
            Local::now().format(PAYLOAD_TIMESTAMP_FORMAT)
        );
        Self::with_parts(format!("Test{host_name}"), payload, number, send_topic)
    }

    pub fn with_parts(
        prefix: impl Into<String>,
        payload: impl Into<String>,
        number: impl Into<String>,
        send_topic: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            payload: payload.into(),
            number: number.into(),
            send_topic: send_topic.into(),
            state: ProbeState::AwaitingEcho,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    // probe_message is the SMS sent to the SMS server.
    pub fn probe_message(&self) -> OutboundMessage {
        OutboundMessage::new(&self.number, format!("{} {}", self.prefix, self.payload))
    }

    pub async fn send_probe(&self, publisher: &dyn Publisher) -> SessionResult<()> {
        let message = self.probe_message();
        info!(
            "Publish {{\"number\": \"{}\", \"message\": \"{}\"}} to {}",
            message.originator, message.text, self.send_topic
        );
        publish_json(publisher, &self.send_topic, &message, false).await
    }

    // observe checks one inbound payload against the probe.
    pub fn observe(&mut self, payload: &[u8]) -> ProbeState {
        if self.state == ProbeState::Matched {
            return self.state;
        }

        let text = String::from_utf8_lossy(payload);
        info!("Received >{text}<");
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                error!("Can't decode payload >{text}<: {e}");
                return self.state;
            }
        };

        let message = field_or_default(&value, MESSAGE_KEY, "");
        let message = message.trim();
        if message.is_empty() {
            error!("Can't find '{MESSAGE_KEY}' in {value}");
            return self.state;
        }

        let Some(rest) = message.strip_prefix(self.prefix.as_str()) else {
            info!("Ignoring {message}, not starting by {}", self.prefix);
            return self.state;
        };

        let rest = rest.trim();
        if rest == self.payload {
            info!("Correct message received - SMS server working properly");
            self.state = ProbeState::Matched;
        } else {
            error!("Waiting for '{}', received '{rest}' - Ignored!", self.payload);
        }
        self.state
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub state: ProbeState,
    pub ticks_used: u32,
}

impl ProbeReport {
    pub fn matched(&self) -> bool {
        self.state == ProbeState::Matched
    }
}

// wait_for_echo drives source for at most `ticks` ticks of `tick`,
// sending the probe on every subscription acknowledgment, and stops at
// the end of the first tick the echo arrives in.
pub async fn wait_for_echo<S>(
    source: &mut S,
    responder: &mut ProbeResponder,
    publisher: &dyn Publisher,
    ticks: u32,
    tick: Duration,
) -> ProbeReport
where
    S: EventSource + ?Sized,
{
    let mut ticks_used = 0;
    while ticks_used < ticks && responder.state() != ProbeState::Matched {
        ticks_used += 1;
        let deadline = Instant::now() + tick;

        loop {
            match timeout_at(deadline, source.next_event()).await {
                Err(_) => break,
                Ok(Ok(SessionEvent::Subscribed)) => {
                    if let Err(e) = responder.send_probe(publisher).await {
                        error!("Failed to publish probe: {e}");
                    }
                }
                Ok(Ok(SessionEvent::Message(message))) => {
                    if responder.observe(&message.payload) == ProbeState::Matched {
                        break;
                    }
                }
                Ok(Ok(SessionEvent::Connected { .. })) => debug!("Reconnected while probing"),
                Ok(Err(e)) => {
                    warn!("MQTT connection error while probing: {e}");
                    sleep_until(deadline).await;
                    break;
                }
            }
        }
    }

    ProbeReport {
        state: responder.state(),
        ticks_used,
    }
}

// escalate handles a probe that timed out: restart the SMS server if a
// restart URL is set, then print and mail everything this run logged.
// Returns the mailed log.
pub async fn escalate(
    restart_url: &str,
    http_client: &reqwest::Client,
    mailer: &dyn Mailer,
    host_name: &str,
    capture: &LogCapture,
) -> Result<String, MailError> {
    if !restart_url.is_empty() {
        match trigger_restart(http_client, restart_url).await {
            Ok(body) => info!("Restarting SMS server returned {body}"),
            Err(e) => error!("Error restarting SMS server: {e}"),
        }
    }

    let log = capture.contents();
    print!("{log}");

    mailer
        .send(MailMessage {
            subject: format!("{host_name}: SMS server not answering !!!"),
            body: log.clone(),
            to: None,
        })
        .await?;
    Ok(log)
}
