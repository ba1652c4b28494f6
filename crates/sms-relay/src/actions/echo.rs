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

// src/actions/echo.rs
// Echo relay: answers every SMS with its own text.
//
// Useless on its own, but the smallest end-to-end check that SMS
// reception, the broker and SMS sending all work.

use async_trait::async_trait;
use tracing::info;

use crate::envelope::{InboundMessage, OutboundMessage};
use crate::handler::{ActionOutcome, RelayAction};

pub const ECHO_PREFIX: &str = "Received: ";

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoRelay;

#[async_trait]
impl RelayAction for EchoRelay {
    async fn act(&self, inbound: InboundMessage) -> ActionOutcome {
        info!(
            "Received >{}< from {} on {}",
            inbound.text, inbound.originator, inbound.timestamp
        );
        ActionOutcome::Reply(OutboundMessage::new(
            inbound.originator,
            format!("{ECHO_PREFIX}{}", inbound.text),
        ))
    }
}
