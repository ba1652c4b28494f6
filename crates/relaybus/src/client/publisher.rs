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

// src/client/publisher.rs
// Cloneable publishing handle for a relay session.

use std::sync::Arc;

use async_trait::async_trait;
use rumqttc::{AsyncClient, QoS};
use tracing::debug;

use crate::errors::SessionResult;
use crate::stats::SessionStatsTracker;
use crate::traits::Publisher;

// SessionPublisher queues publishes on the session's AsyncClient. It can
// be cloned and handed to handlers while the session itself keeps
// driving the event loop.
#[derive(Clone)]
pub struct SessionPublisher {
    client: AsyncClient,
    qos: QoS,
    stats: Arc<SessionStatsTracker>,
}

impl SessionPublisher {
    pub fn new(client: AsyncClient, qos: QoS, stats: Arc<SessionStatsTracker>) -> Self {
        Self { client, qos, stats }
    }

    pub fn stats(&self) -> Arc<SessionStatsTracker> {
        self.stats.clone()
    }
}

#[async_trait]
impl Publisher for SessionPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> SessionResult<()> {
        let size = payload.len();
        match self.client.publish(topic, self.qos, retain, payload).await {
            Ok(()) => {
                debug!("Queued {size} bytes for '{topic}' (retain={retain})");
                self.stats.increment_published(size);
                Ok(())
            }
            Err(e) => {
                self.stats.increment_failed();
                Err(e.into())
            }
        }
    }
}
