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

// src/lib.rs
// Broker session library for the SMS relay tools.
//
// Wraps a single rumqttc connection: last will and birth status
// messages, re-subscription after reconnects, and a narrowed event
// stream that only surfaces what the relays act on.

pub mod client;
pub mod errors;
pub mod stats;
pub mod status;
pub mod traits;

// Export some things for convenience.
pub use client::{
    ClientCredentials, IncomingPublish, RelaySession, SessionEvent, SessionOptions,
    SessionPublisher, StatusAnnouncement,
};
pub use errors::{SessionError, SessionResult};
pub use rumqttc::QoS;
pub use stats::{SessionStats, SessionStatsTracker};
pub use status::SessionStatus;
pub use traits::{EventSource, Publisher, publish_json};
