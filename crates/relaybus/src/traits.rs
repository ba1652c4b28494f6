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

// src/traits.rs
// Seams between the session and the code that drives it.
//
// The relays only ever need two things from the broker: a way to publish
// a payload and a stream of session events. Keeping both behind traits
// lets handlers and wait loops run against scripted fakes.

use async_trait::async_trait;
use serde::Serialize;

use crate::client::SessionEvent;
use crate::errors::SessionResult;

// Publisher sends one payload to one topic. Implemented by
// SessionPublisher for the live broker.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> SessionResult<()>;
}

// EventSource yields the next session event, blocking until one is
// available. Implemented by RelaySession.
#[async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> SessionResult<SessionEvent>;
}

// publish_json serializes value as JSON and publishes it with the
// given retain flag.
pub async fn publish_json<P, T>(
    publisher: &P,
    topic: &str,
    value: &T,
    retain: bool,
) -> SessionResult<()>
where
    P: Publisher + ?Sized,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(value)?;
    publisher.publish(topic, payload, retain).await
}
