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

// src/errors.rs
// Error types for the relay crate.
//
// Handler-level problems (bad envelopes) never leave the handler; they
// are logged and the message is dropped. Only configuration and
// collaborator failures are surfaced as errors.

use std::path::PathBuf;

use thiserror::Error;

// CONFIG_EXIT_CODE is the process exit status for any configuration
// problem.
pub const CONFIG_EXIT_CODE: u8 = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error opening {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error decoding configuration: {0}")]
    Parse(serde_json::Error),

    #[error("Mandatory parameters not present: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Invalid configuration: {0}")]
    Invalid(serde_json::Error),
}

impl ConfigError {
    pub fn exit_code(&self) -> u8 {
        CONFIG_EXIT_CODE
    }
}

// EnvelopeError is why an inbound payload could not become an
// InboundMessage.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Can't decode payload as UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Can't decode payload as JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Can't find {}", quoted(.0))]
    MissingFields(Vec<&'static str>),
}

fn quoted(fields: &[&'static str]) -> String {
    fields
        .iter()
        .map(|field| format!("'{field}'"))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build mail: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Error, Debug)]
pub enum RestartError {
    #[error("Restart request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Restart request returned error {status} {body}")]
    Status { status: u16, body: String },
}
