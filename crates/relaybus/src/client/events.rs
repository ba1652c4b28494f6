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

// src/client/events.rs
// The narrowed event stream produced by RelaySession.
//
// rumqttc surfaces every packet in both directions; the relays only
// care about (re)connections, subscription acknowledgments and inbound
// publishes, so everything else is consumed inside the session.

use rumqttc::Publish;

// SessionEvent is one event of interest from the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    // Connected is emitted for every CONNACK after the initial one,
    // once the birth message and subscriptions have been re-queued.
    Connected { session_present: bool },
    // Subscribed is emitted for each SUBACK.
    Subscribed,
    // Message is an inbound PUBLISH.
    Message(IncomingPublish),
}

// IncomingPublish is the part of a PUBLISH packet a handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingPublish {
    pub topic: String,
    pub payload: Vec<u8>,
    // retained is set when the broker replays a stored message
    // rather than forwarding a live one.
    pub retained: bool,
}

impl IncomingPublish {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>, retained: bool) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            retained,
        }
    }
}

impl From<Publish> for IncomingPublish {
    fn from(publish: Publish) -> Self {
        Self {
            topic: publish.topic,
            payload: publish.payload.to_vec(),
            retained: publish.retain,
        }
    }
}
