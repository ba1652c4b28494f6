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

// src/status.rs
// Liveness status published retained under the status topic.
//
// "up" is published by the session after every CONNACK, "down" is
// registered as the last will so the broker announces an unclean drop
// on our behalf.

use serde::{Deserialize, Serialize};

use crate::errors::SessionResult;

// START_DATE_FORMAT renders timestamps the way the downstream
// dashboards already parse them (e.g. "2025-03-01 08:15:42.123456").
pub const START_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// SessionStatus is the retained status envelope, tagged by "state".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionStatus {
    Up {
        version: String,
        #[serde(rename = "startDate")]
        start_date: String,
    },
    Down,
}

impl SessionStatus {
    pub fn down() -> Self {
        Self::Down
    }

    // to_payload serializes the status into the JSON bytes
    // published on the wire.
    pub fn to_payload(&self) -> SessionResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
