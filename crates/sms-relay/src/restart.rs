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

// src/restart.rs
// Best-effort restart of the SMS server through its HTTP endpoint.

use tracing::debug;

use crate::errors::RestartError;

// trigger_restart issues a GET on url and returns the response body.
// Anything but a 200 is an error carrying the status and body.
pub async fn trigger_restart(client: &reqwest::Client, url: &str) -> Result<String, RestartError> {
    debug!("Requesting SMS server restart at {url}");
    let response = client.get(url).send().await?;

    let status_code = response.status();
    let response_text = response.text().await?;

    if status_code != reqwest::StatusCode::OK {
        return Err(RestartError::Status {
            status: status_code.as_u16(),
            body: response_text,
        });
    }

    Ok(response_text)
}
