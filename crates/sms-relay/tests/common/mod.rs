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

// tests/common/mod.rs
// Recording fakes for the relay seams: broker publish, broker events,
// mail and shell.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use relaybus::{EventSource, Publisher, SessionError, SessionEvent, SessionResult};
use sms_relay::OutboundMessage;
use sms_relay::errors::MailError;
use sms_relay::exec::{CommandOutput, CommandRunner};
use sms_relay::mail::{MailMessage, Mailer};
use tokio::time::{Instant, sleep_until};

pub const RECEIVE_TOPIC: &str = "smsServer/received";
pub const SEND_TOPIC: &str = "smsServer/toSend";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub retain: bool,
}

#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<PublishedMessage>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }

    // messages decodes every publish as an outbound SMS envelope.
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.published()
            .iter()
            .map(|message| serde_json::from_slice(&message.payload).unwrap())
            .collect()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> SessionResult<()> {
        if self.fail {
            return Err(SessionError::Closed);
        }
        self.published.lock().unwrap().push(PublishedMessage {
            topic: topic.to_string(),
            payload,
            retain,
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    // sent lists every mail handed to the mailer, including failed ones.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        if self.fail {
            let error = "not an address".parse::<lettre::Address>().unwrap_err();
            return Err(MailError::Address(error));
        }
        Ok(())
    }
}

// ScriptedRunner answers every run with the same scripted result and
// records the scripts it was asked to run.
pub struct ScriptedRunner {
    result: ScriptedResult,
    scripts: Mutex<Vec<String>>,
}

enum ScriptedResult {
    Output(CommandOutput),
    Failure(String),
    OsError(i32),
}

impl ScriptedRunner {
    pub fn output(exit_code: i32, text: &str) -> Self {
        Self {
            result: ScriptedResult::Output(CommandOutput {
                exit_code,
                text: text.to_string(),
            }),
            scripts: Mutex::new(Vec::new()),
        }
    }

    pub fn system_error(message: &str) -> Self {
        Self {
            result: ScriptedResult::Failure(message.to_string()),
            scripts: Mutex::new(Vec::new()),
        }
    }

    // os_error fails every run the way a failed spawn does.
    pub fn os_error(code: i32) -> Self {
        Self {
            result: ScriptedResult::OsError(code),
            scripts: Mutex::new(Vec::new()),
        }
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, script: &str) -> std::io::Result<CommandOutput> {
        self.scripts.lock().unwrap().push(script.to_string());
        match &self.result {
            ScriptedResult::Output(output) => Ok(output.clone()),
            ScriptedResult::Failure(message) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                message.clone(),
            )),
            ScriptedResult::OsError(code) => Err(std::io::Error::from_raw_os_error(*code)),
        }
    }
}

// ScriptedEvents replays session events at fixed offsets from its
// creation. Once drained it either reports the session closed or never
// yields again.
pub struct ScriptedEvents {
    start: Instant,
    script: VecDeque<(Duration, SessionResult<SessionEvent>)>,
    close_when_drained: bool,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            script: VecDeque::new(),
            close_when_drained: false,
        }
    }

    pub fn at(mut self, offset: Duration, event: SessionEvent) -> Self {
        self.script.push_back((offset, Ok(event)));
        self
    }

    pub fn error_at(mut self, offset: Duration, error: SessionError) -> Self {
        self.script.push_back((offset, Err(error)));
        self
    }

    pub fn then_close(mut self) -> Self {
        self.close_when_drained = true;
        self
    }
}

#[async_trait]
impl EventSource for ScriptedEvents {
    async fn next_event(&mut self) -> SessionResult<SessionEvent> {
        let Some((offset, _)) = self.script.front() else {
            if self.close_when_drained {
                return Err(SessionError::Closed);
            }
            return std::future::pending().await;
        };

        // Only pop once the event is due, so a cancelled wait loses
        // nothing.
        sleep_until(self.start + *offset).await;
        match self.script.pop_front() {
            Some((_, step)) => step,
            None => Err(SessionError::Closed),
        }
    }
}

// inbound builds a raw inbound SMS envelope.
pub fn inbound(number: &str, message: &str) -> Vec<u8> {
    serde_json::json!({
        "number": number,
        "date": "2026-10-16 08:00:00",
        "message": message,
    })
    .to_string()
    .into_bytes()
}
