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

// src/handler.rs
// Inbound message handling shared by the echo and shell relays.
//
// Every inbound PUBLISH goes through the same steps:
//   1. skip retained replays,
//   2. decode the JSON envelope and require number/date/message,
//   3. hand the message to the relay's action,
//   4. publish the action's reply, if any, on the outbound topic.
//
// Nothing here returns an error: a bad message is logged and dropped,
// and the Disposition says what happened.

use std::sync::Arc;

use async_trait::async_trait;
use relaybus::Publisher;
use tracing::{debug, error, info};

use crate::envelope::{InboundMessage, OutboundMessage};
use crate::errors::EnvelopeError;

// ActionOutcome is what a relay action decided to do with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    // Reply publishes the message on the outbound topic.
    Reply(OutboundMessage),
    // Ignored means the message was not for this action.
    Ignored(String),
    // Silent means the action ran but has nothing to publish.
    Silent,
}

// RelayAction is the variant-specific step of a relay.
#[async_trait]
pub trait RelayAction: Send + Sync {
    async fn act(&self, inbound: InboundMessage) -> ActionOutcome;
}

// Disposition is the final fate of one inbound payload.
#[derive(Debug)]
pub enum Disposition {
    SkippedRetained,
    Dropped(EnvelopeError),
    Ignored(String),
    Replied(OutboundMessage),
    ReplyFailed(String),
    Completed,
}

impl Disposition {
    pub fn reply(&self) -> Option<&OutboundMessage> {
        match self {
            Self::Replied(reply) => Some(reply),
            _ => None,
        }
    }
}

pub struct MessageHandler<A> {
    action: A,
    publisher: Arc<dyn Publisher>,
    outbound_topic: String,
}

impl<A: RelayAction> MessageHandler<A> {
    pub fn new(action: A, publisher: Arc<dyn Publisher>, outbound_topic: impl Into<String>) -> Self {
        Self {
            action,
            publisher,
            outbound_topic: outbound_topic.into(),
        }
    }

    pub async fn handle(&self, payload: &[u8], topic: &str, retained: bool) -> Disposition {
        if retained {
            debug!("Skipping retained message on {topic}");
            return Disposition::SkippedRetained;
        }

        info!("Received >{}< from {topic}", String::from_utf8_lossy(payload));

        let inbound = match InboundMessage::from_payload(payload) {
            Ok(inbound) => inbound,
            Err(e) => {
                error!("{e}");
                return Disposition::Dropped(e);
            }
        };

        match self.action.act(inbound).await {
            ActionOutcome::Reply(reply) => self.respond(reply).await,
            ActionOutcome::Ignored(reason) => {
                info!("{reason}");
                Disposition::Ignored(reason)
            }
            ActionOutcome::Silent => Disposition::Completed,
        }
    }

    async fn respond(&self, reply: OutboundMessage) -> Disposition {
        let payload = match reply.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                error!("Can't encode answer for {}: {e}", reply.originator);
                return Disposition::ReplyFailed(e.to_string());
            }
        };

        info!("Answer: >{}<", String::from_utf8_lossy(&payload));
        match self
            .publisher
            .publish(&self.outbound_topic, payload, false)
            .await
        {
            Ok(()) => Disposition::Replied(reply),
            Err(e) => {
                error!("Failed to publish answer to {}: {e}", self.outbound_topic);
                Disposition::ReplyFailed(e.to_string())
            }
        }
    }
}
