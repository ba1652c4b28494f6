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

// src/stats/session.rs
// Counters for traffic flowing through a relay session.
//
// Lock-free atomic counters, shared between the session (which counts
// inbound publishes and reconnects) and every SessionPublisher clone
// (which counts outbound publishes).

use std::sync::atomic::{AtomicUsize, Ordering};

// SessionStats stores a snapshot of session traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    // total_received is the count of PUBLISH packets delivered
    // by the broker, retained ones included.
    pub total_received: usize,
    // total_published is the count of messages handed to the
    // event loop for sending.
    pub total_published: usize,
    // total_failed is the count of publishes the client
    // refused to queue.
    pub total_failed: usize,
    // total_bytes_published is the payload size of all
    // successfully queued publishes.
    pub total_bytes_published: usize,
    // total_reconnects is the count of CONNACKs seen after
    // the initial one.
    pub total_reconnects: usize,
}

#[derive(Debug, Default)]
pub struct SessionStatsTracker {
    received_count: AtomicUsize,
    published_count: AtomicUsize,
    failed_count: AtomicUsize,
    published_bytes: AtomicUsize,
    reconnect_count: AtomicUsize,
}

impl SessionStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_received(&self) {
        self.received_count.fetch_add(1, Ordering::Relaxed);
    }

    // increment_published records a publish that was accepted by the
    // client. At QoS 0 this is as close to "sent" as we get.
    pub fn increment_published(&self, bytes: usize) {
        self.published_count.fetch_add(1, Ordering::Relaxed);
        self.published_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reconnects(&self) {
        self.reconnect_count.fetch_add(1, Ordering::Relaxed);
    }

    // to_stats takes an immutable snapshot of the current counters.
    pub fn to_stats(&self) -> SessionStats {
        SessionStats {
            total_received: self.received_count.load(Ordering::Relaxed),
            total_published: self.published_count.load(Ordering::Relaxed),
            total_failed: self.failed_count.load(Ordering::Relaxed),
            total_bytes_published: self.published_bytes.load(Ordering::Relaxed),
            total_reconnects: self.reconnect_count.load(Ordering::Relaxed),
        }
    }
}
