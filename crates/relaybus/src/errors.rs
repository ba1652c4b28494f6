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
// Error type for broker session operations.

use rumqttc::{ClientError, ConnectReturnCode, ConnectionError};
use thiserror::Error;

// SessionError covers everything that can go wrong between the relay
// and the broker: establishing the session, queueing requests on the
// client, and encoding the JSON bodies we publish.
#[derive(Error, Debug)]
pub enum SessionError {
    // Connection is a transport level failure from the event loop
    // (broker unreachable, socket reset, protocol error).
    #[error("MQTT connection error: {0}")]
    Connection(ConnectionError),

    // ConnectionRefused is a CONNACK with a non-success return code,
    // most commonly rejected credentials.
    #[error("MQTT broker refused the connection: {0:?}")]
    ConnectionRefused(ConnectReturnCode),

    // Client is a failure to hand a request (publish, subscribe,
    // disconnect) to the event loop.
    #[error("MQTT client request failed: {0}")]
    Client(#[from] ClientError),

    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),

    // Closed means every request sender is gone and the event loop
    // will never produce another event.
    #[error("MQTT session closed")]
    Closed,
}

impl From<ConnectionError> for SessionError {
    fn from(error: ConnectionError) -> Self {
        match error {
            ConnectionError::ConnectionRefused(code) => Self::ConnectionRefused(code),
            ConnectionError::RequestsDone => Self::Closed,
            other => Self::Connection(other),
        }
    }
}

impl SessionError {
    // is_connection_error reports whether this error came from the
    // broker connection itself rather than from a local request.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ConnectionRefused(_))
    }

    // is_fatal reports whether polling again can never succeed. Plain
    // transport errors are not fatal: rumqttc reconnects on the next poll.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

// SessionResult is a result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
