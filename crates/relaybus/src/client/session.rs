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

// src/client/session.rs
// RelaySession owns the single broker connection of a relay process.
//
// Lifecycle:
//   connect()     -> drive the event loop until the first CONNACK, then
//                    publish the birth status and subscribe.
//   next_event()  -> keep driving the event loop; on every later CONNACK
//                    re-publish the birth status and re-subscribe.
//   disconnect()  -> send DISCONNECT and flush it.
//
// rumqttc only talks to the network while poll() is being awaited, so
// whoever owns the session must keep calling next_event().

use std::sync::Arc;

use async_trait::async_trait;
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, Outgoing, Packet};
use tracing::{debug, info, trace};

use crate::client::events::{IncomingPublish, SessionEvent};
use crate::client::options::{DEFAULT_MESSAGE_CHANNEL_CAPACITY, SESSION_QOS, SessionOptions};
use crate::client::publisher::SessionPublisher;
use crate::errors::{SessionError, SessionResult};
use crate::stats::{SessionStats, SessionStatsTracker};
use crate::traits::{EventSource, Publisher};

pub struct RelaySession {
    client: AsyncClient,
    eventloop: EventLoop,
    options: SessionOptions,
    stats: Arc<SessionStatsTracker>,
}

impl RelaySession {
    // connect establishes the session, failing if the broker cannot be
    // reached or refuses us. There is no retry here; the caller is
    // expected to log and give up.
    pub async fn connect(options: SessionOptions) -> SessionResult<Self> {
        let mqtt_options = options.to_mqtt_options()?;
        let (client, mut eventloop) =
            AsyncClient::new(mqtt_options, DEFAULT_MESSAGE_CHANNEL_CAPACITY);

        info!(
            "Connecting to MQTT broker {}:{} as '{}'",
            options.host, options.port, options.client_id
        );

        loop {
            match eventloop.poll().await? {
                Event::Incoming(Packet::ConnAck(ack)) => {
                    if ack.code != ConnectReturnCode::Success {
                        return Err(SessionError::ConnectionRefused(ack.code));
                    }
                    info!("Connected to MQTT broker {}:{}", options.host, options.port);
                    break;
                }
                other => trace!("Waiting for CONNACK, got {other:?}"),
            }
        }

        let mut session = Self {
            client,
            eventloop,
            options,
            stats: Arc::new(SessionStatsTracker::new()),
        };
        session.on_connected().await?;
        Ok(session)
    }

    // publisher returns a handle that publishes at the session QoS and
    // reports into the session statistics.
    pub fn publisher(&self) -> SessionPublisher {
        SessionPublisher::new(self.client.clone(), SESSION_QOS, self.stats.clone())
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.to_stats()
    }

    // next_event drives the event loop until something a relay cares
    // about shows up.
    pub async fn next_event(&mut self) -> SessionResult<SessionEvent> {
        loop {
            match self.eventloop.poll().await? {
                Event::Incoming(Packet::ConnAck(ack)) => {
                    if ack.code != ConnectReturnCode::Success {
                        return Err(SessionError::ConnectionRefused(ack.code));
                    }
                    self.stats.increment_reconnects();
                    info!(
                        "Reconnected to MQTT broker (session_present={}): {:?}",
                        ack.session_present,
                        self.stats()
                    );
                    self.on_connected().await?;
                    return Ok(SessionEvent::Connected {
                        session_present: ack.session_present,
                    });
                }
                Event::Incoming(Packet::SubAck(suback)) => {
                    debug!("Subscription acknowledged: {:?}", suback.return_codes);
                    return Ok(SessionEvent::Subscribed);
                }
                Event::Incoming(Packet::Publish(publish)) => {
                    self.stats.increment_received();
                    return Ok(SessionEvent::Message(IncomingPublish::from(publish)));
                }
                other => trace!("Ignoring event {other:?}"),
            }
        }
    }

    // disconnect sends DISCONNECT and polls until it has been written.
    pub async fn disconnect(mut self) -> SessionResult<()> {
        self.client.disconnect().await?;
        loop {
            if let Event::Outgoing(Outgoing::Disconnect) = self.eventloop.poll().await? {
                info!("Disconnected from MQTT broker");
                return Ok(());
            }
        }
    }

    // on_connected queues the birth status and every subscription. Both
    // are only written once the event loop is polled again. Only owned
    // handles are held across awaits: the event loop is not Sync.
    async fn on_connected(&mut self) -> SessionResult<()> {
        let client = self.client.clone();
        let publisher = self.publisher();
        let status = self.options.status.clone();
        let subscriptions = self.options.subscriptions.clone();

        if let Some(status) = status {
            let payload = status.birth().to_payload()?;
            publisher.publish(&status.topic, payload, true).await?;
            debug!("Queued birth status on '{}'", status.topic);
        }
        for topic in subscriptions {
            client.subscribe(&topic, SESSION_QOS).await?;
            info!("Subscribing to '{topic}'");
        }
        Ok(())
    }
}

#[async_trait]
impl EventSource for RelaySession {
    async fn next_event(&mut self) -> SessionResult<SessionEvent> {
        RelaySession::next_event(self).await
    }
}
