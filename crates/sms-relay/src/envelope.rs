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

// src/envelope.rs
// JSON envelopes exchanged with the SMS server.
//
//   inbound:  {"number": "<originator>", "date": "<timestamp>", "message": "<text>"}
//   outbound: {"number": "<originator>", "message": "<text>"}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EnvelopeError;

pub const NUMBER_KEY: &str = "number";
pub const DATE_KEY: &str = "date";
pub const MESSAGE_KEY: &str = "message";

// field_or_default returns value[key] as text, or default when the key
// is missing or explicitly null. Strings come back unchanged, numbers
// and booleans are rendered as text (some modems report the originator
// as a bare number). Arrays, objects and non-object documents yield
// default.
pub fn field_or_default(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        None | Some(Value::Null | Value::Array(_) | Value::Object(_)) => default.to_string(),
    }
}

// decode_json parses a payload that must be valid UTF-8 JSON.
pub fn decode_json(payload: &[u8]) -> Result<Value, EnvelopeError> {
    let text = std::str::from_utf8(payload)?;
    Ok(serde_json::from_str(text)?)
}

// InboundMessage is a received SMS. Every field is trimmed and
// non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub originator: String,
    pub timestamp: String,
    pub text: String,
}

impl InboundMessage {
    pub fn from_payload(payload: &[u8]) -> Result<Self, EnvelopeError> {
        Self::from_value(&decode_json(payload)?)
    }

    pub fn from_value(value: &Value) -> Result<Self, EnvelopeError> {
        let originator = field_or_default(value, NUMBER_KEY, "").trim().to_string();
        let timestamp = field_or_default(value, DATE_KEY, "").trim().to_string();
        let text = field_or_default(value, MESSAGE_KEY, "").trim().to_string();

        let missing: Vec<&'static str> = [
            (NUMBER_KEY, &originator),
            (DATE_KEY, &timestamp),
            (MESSAGE_KEY, &text),
        ]
        .into_iter()
        .filter(|(_, field)| field.is_empty())
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            return Err(EnvelopeError::MissingFields(missing));
        }

        Ok(Self {
            originator,
            timestamp,
            text,
        })
    }
}

// OutboundMessage is an SMS to send, addressed to originator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutboundMessage {
    #[serde(rename = "number")]
    pub originator: String,
    #[serde(rename = "message")]
    pub text: String,
}

impl OutboundMessage {
    pub fn new(originator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            originator: originator.into(),
            text: text.into(),
        }
    }

    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
