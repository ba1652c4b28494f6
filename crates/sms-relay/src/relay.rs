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

// src/relay.rs
// The receive loop shared by the echo and shell relays.

use std::time::Duration;

use relaybus::{EventSource, SessionEvent, SessionResult};
use tracing::{debug, error, info, warn};

use crate::handler::{MessageHandler, RelayAction};

// RECONNECT_DELAY is how long the loop waits after a transport error
// before polling again. rumqttc reconnects on that next poll.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

// run_relay feeds every inbound message to handler, one at a time, and
// only returns once the session is gone for good.
pub async fn run_relay<S, A>(source: &mut S, handler: &MessageHandler<A>) -> SessionResult<()>
where
    S: EventSource + ?Sized,
    A: RelayAction,
{
    loop {
        match source.next_event().await {
            Ok(SessionEvent::Message(message)) => {
                let disposition = handler
                    .handle(&message.payload, &message.topic, message.retained)
                    .await;
                match disposition.reply() {
                    Some(reply) => debug!("Answered {} on {}", reply.originator, message.topic),
                    None => debug!("Message on {} handled: {disposition:?}", message.topic),
                }
            }
            Ok(SessionEvent::Connected { session_present }) => {
                info!("Session re-established (session_present={session_present})");
            }
            Ok(SessionEvent::Subscribed) => debug!("Subscribed"),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                if e.is_connection_error() {
                    warn!("MQTT connection error: {e}, retrying in {RECONNECT_DELAY:?}");
                } else {
                    error!("MQTT request failed: {e}, retrying in {RECONNECT_DELAY:?}");
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}
