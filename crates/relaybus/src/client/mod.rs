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

// src/client/mod.rs
// Client module exports.
//
// Re-exports the session and its supporting types while keeping the
// internal module layout private.

mod events;
mod options;
mod publisher;
mod session;

pub use events::{IncomingPublish, SessionEvent};
pub use options::{
    ClientCredentials, DEFAULT_KEEP_ALIVE, DEFAULT_MESSAGE_CHANNEL_CAPACITY, SESSION_QOS,
    SessionOptions, StatusAnnouncement,
};
pub use publisher::SessionPublisher;
pub use session::RelaySession;
