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

// src/config.rs
// Relay configuration, loaded once at startup from a JSON file.
//
// The same parameter file is shared by all three relays; each one
// checks its own set of mandatory keys and reports every missing key
// before giving up, so a broken file can be fixed in one pass.

use std::collections::HashMap;
use std::path::Path;

use relaybus::{SessionOptions, StatusAnnouncement};
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::errors::ConfigError;

// DEFAULT_CONFIG_FILE is looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "smsServerParameters.json";

const BROKER_KEYS: &[&str] = &[
    "mqttServer",
    "mqttPort",
    "mqttUser",
    "mqttPassword",
    "mqttReceiveTopic",
    "mqttSendTopic",
];

// Variant selects which relay is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Echo,
    Shell,
    Probe,
}

impl Variant {
    // stem names the log file and prefixes the broker client id.
    pub fn stem(&self) -> &'static str {
        match self {
            Self::Echo => "readSms",
            Self::Shell => "smsHandler",
            Self::Probe => "smsServerTest",
        }
    }

    pub fn mandatory_keys(&self) -> Vec<&'static str> {
        let extra: &[&str] = match self {
            Self::Echo => &["mqttLwtTopic"],
            Self::Shell => &["mqttLwtTopic", "mailSender", "mailServer"],
            Self::Probe => &[
                "mailSender",
                "mailServer",
                "smsServerNumber",
                "smsServerRestartUrl",
            ],
        };
        BROKER_KEYS.iter().chain(extra).copied().collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    pub mqtt_server: String,
    pub mqtt_port: u16,
    #[serde(default)]
    pub mqtt_user: String,
    #[serde(default)]
    pub mqtt_password: String,
    pub mqtt_receive_topic: String,
    pub mqtt_send_topic: String,
    // mqtt_lwt_topic is the base of the status topic; the instance
    // (or host) name is appended.
    #[serde(default)]
    pub mqtt_lwt_topic: Option<String>,

    #[serde(default)]
    pub instance_name: Option<String>,

    #[serde(default)]
    pub mail_sender: Option<String>,
    // mail_server is "host" or "host:port".
    #[serde(default)]
    pub mail_server: Option<String>,

    #[serde(default)]
    pub shell_name: Option<String>,
    #[serde(default)]
    pub shell_init_command: Option<String>,
    #[serde(default)]
    pub shell_error_remove: Option<String>,
    // mail_receivers maps an originator to the address that gets the
    // command output. A null address means "the sender address".
    // Originators not listed here may not run commands.
    #[serde(default)]
    pub mail_receivers: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    pub reply_on_system_error: bool,

    #[serde(default)]
    pub sms_server_number: Option<String>,
    #[serde(default)]
    pub sms_server_restart_url: Option<String>,
}

impl RelayConfig {
    pub fn load(path: &Path, variant: Variant) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, variant)
    }

    pub fn from_json(text: &str, variant: Variant) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text).map_err(ConfigError::Parse)?;

        let missing = missing_keys(&value, &variant.mandatory_keys());
        if !missing.is_empty() {
            for key in &missing {
                error!("Mandatory parameter {key} not present in configuration");
            }
            return Err(ConfigError::MissingKeys(missing));
        }

        serde_json::from_value(value).map_err(ConfigError::Invalid)
    }

    // instance_name is the node identity used as the command prefix,
    // the host name unless configured otherwise.
    pub fn instance_name(&self, host_name: &str) -> String {
        self.instance_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(host_name)
            .to_string()
    }

    // status_topic is "<mqttLwtTopic>/<id>", if a status base is set.
    pub fn status_topic(&self, id: &str) -> Option<String> {
        self.mqtt_lwt_topic
            .as_deref()
            .map(|base| format!("{}/{id}", base.trim_end_matches('/')))
    }

    pub fn mail_sender(&self) -> &str {
        self.mail_sender.as_deref().unwrap_or_default()
    }

    pub fn mail_server(&self) -> &str {
        self.mail_server.as_deref().unwrap_or_default()
    }

    pub fn restart_url(&self) -> &str {
        self.sms_server_restart_url.as_deref().unwrap_or_default()
    }

    // session_options builds the broker session for this relay. The
    // status announcement is only attached when status_id is given.
    pub fn session_options(
        &self,
        client_id: impl Into<String>,
        status_id: Option<&str>,
        version: &str,
    ) -> SessionOptions {
        let mut options = SessionOptions::new(&self.mqtt_server, self.mqtt_port, client_id)
            .with_credentials(&self.mqtt_user, &self.mqtt_password)
            .with_subscription(&self.mqtt_receive_topic);

        if let Some(topic) = status_id.and_then(|id| self.status_topic(id)) {
            options = options.with_status(StatusAnnouncement::new(topic, version));
        }
        options
    }
}

// missing_keys lists every key absent (or null) from the document,
// in the order they were asked for.
fn missing_keys(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter(|key| value.get(**key).is_none_or(Value::is_null))
        .map(|key| key.to_string())
        .collect()
}
