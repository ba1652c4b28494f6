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
// SMS relay over MQTT.
//
// Three small relays share one shape: receive a JSON SMS envelope from
// the broker, validate it, act, and publish a reply envelope.
//
//   echo  -> reply "Received: <text>" to the sender.
//   shell -> run "<instance> <command>" SMS as a shell command, mail the
//            output and reply with a short summary.
//   probe -> send a test SMS through the SMS server and wait for it to
//            come back, restarting the server and mailing an alert if not.

pub mod actions;
pub mod commands;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod exec;
pub mod handler;
pub mod logging;
pub mod mail;
pub mod probe;
pub mod relay;
pub mod restart;

pub use config::{RelayConfig, Variant};
pub use envelope::{InboundMessage, OutboundMessage, field_or_default};
pub use handler::{ActionOutcome, Disposition, MessageHandler, RelayAction};

// VERSION is announced in the retained "up" status and the start banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// host_name returns this machine's name, falling back to "localhost"
// when the OS will not tell us.
pub fn host_name() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "localhost".to_string())
}

// client_id builds a broker client id unique enough to let several
// relays share a broker: "<stem>_<random hex>".
pub fn client_id(stem: &str) -> String {
    format!("{stem}_{:x}", rand::random::<u16>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_shape() {
        let id = client_id("smsHandler");
        let suffix = id.strip_prefix("smsHandler_").unwrap();
        assert!(!suffix.is_empty());
        assert!(u16::from_str_radix(suffix, 16).is_ok());
    }

    #[test]
    fn test_host_name_is_never_empty() {
        assert!(!host_name().is_empty());
    }
}
