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

// src/client/options.rs
// Connection options for a relay session.

use chrono::Local;
use rumqttc::{LastWill, MqttOptions, QoS};
use tokio::time::Duration;

use crate::errors::SessionResult;
use crate::status::{START_DATE_FORMAT, SessionStatus};

// DEFAULT_KEEP_ALIVE matches the keepalive the broker-side tooling
// has always seen from these clients.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

// DEFAULT_MESSAGE_CHANNEL_CAPACITY is the number of requests the
// AsyncClient may queue before publish() starts waiting on the
// event loop.
pub const DEFAULT_MESSAGE_CHANNEL_CAPACITY: usize = 10;

// SESSION_QOS is used for subscriptions and publishes alike. Delivery
// is fire-and-forget.
pub const SESSION_QOS: QoS = QoS::AtMostOnce;

// SessionOptions describes one broker session. Only the broker address
// and client id are required.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    // credentials are passed through to the broker as-is.
    pub credentials: Option<ClientCredentials>,
    // status, when set, registers the retained "down" last will and
    // publishes the retained "up" birth message after each CONNACK.
    pub status: Option<StatusAnnouncement>,
    // subscriptions are (re)established after each CONNACK.
    pub subscriptions: Vec<String>,
}

impl SessionOptions {
    pub fn new(host: impl Into<String>, port: u16, client_id: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: client_id.into(),
            credentials: None,
            status: None,
            subscriptions: Vec::new(),
        }
    }

    // with_credentials sets username/password. An empty username means
    // an anonymous session, so no credentials are sent at all.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let username = username.into();
        self.credentials = if username.is_empty() {
            None
        } else {
            Some(ClientCredentials {
                username,
                password: password.into(),
            })
        };
        self
    }

    pub fn with_status(mut self, status: StatusAnnouncement) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_subscription(mut self, topic: impl Into<String>) -> Self {
        self.subscriptions.push(topic.into());
        self
    }

    // to_mqtt_options builds the rumqttc options, including the last
    // will when a status topic is configured.
    pub fn to_mqtt_options(&self) -> SessionResult<MqttOptions> {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(DEFAULT_KEEP_ALIVE);

        if let Some(credentials) = &self.credentials {
            options.set_credentials(&credentials.username, &credentials.password);
        }

        if let Some(status) = &self.status {
            options.set_last_will(LastWill::new(
                &status.topic,
                SessionStatus::down().to_payload()?,
                SESSION_QOS,
                true,
            ));
        }

        Ok(options)
    }
}

// ClientCredentials are the username and password handed to the broker.
#[derive(Clone, Debug)]
pub struct ClientCredentials {
    pub username: String,
    pub password: String,
}

// StatusAnnouncement is where and how a session announces liveness.
// start_date is fixed when the announcement is built so a reconnect
// re-publishes the process start, not the reconnect time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusAnnouncement {
    pub topic: String,
    pub version: String,
    pub start_date: String,
}

impl StatusAnnouncement {
    pub fn new(topic: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            version: version.into(),
            start_date: Local::now().format(START_DATE_FORMAT).to_string(),
        }
    }

    // birth is the retained "up" status published after each CONNACK.
    pub fn birth(&self) -> SessionStatus {
        SessionStatus::Up {
            version: self.version.clone(),
            start_date: self.start_date.clone(),
        }
    }
}
