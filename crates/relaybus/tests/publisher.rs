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

// tests/publisher.rs
// SessionPublisher against an unpolled rumqttc client.
//
// AsyncClient::publish only queues the request on the event loop
// channel, so these tests never touch the network.

use std::sync::Arc;

use relaybus::{Publisher, QoS, SessionPublisher, SessionStatsTracker, publish_json};
use rumqttc::{AsyncClient, MqttOptions};

fn create_test_client() -> (AsyncClient, rumqttc::EventLoop) {
    AsyncClient::new(MqttOptions::new("relay-test", "localhost", 1883), 10)
}

#[tokio::test]
async fn test_publish_counts_queued_bytes() {
    let (client, _eventloop) = create_test_client();
    let stats = Arc::new(SessionStatsTracker::new());
    let publisher = SessionPublisher::new(client, QoS::AtMostOnce, stats.clone());

    publisher
        .publish("smsServer/toSend", b"hello".to_vec(), false)
        .await
        .unwrap();

    let snapshot = stats.to_stats();
    assert_eq!(snapshot.total_published, 1);
    assert_eq!(snapshot.total_bytes_published, 5);
    assert_eq!(snapshot.total_failed, 0);
}

#[tokio::test]
async fn test_publish_json_serializes_value() {
    let (client, _eventloop) = create_test_client();
    let stats = Arc::new(SessionStatsTracker::new());
    let publisher = SessionPublisher::new(client, QoS::AtMostOnce, stats.clone());

    let body = serde_json::json!({"number": "+33600000000", "message": "hi"});
    publish_json(&publisher, "smsServer/toSend", &body, false)
        .await
        .unwrap();

    let expected = serde_json::to_vec(&body).unwrap().len();
    assert_eq!(stats.to_stats().total_bytes_published, expected);
}

#[test]
fn test_publish_fails_once_event_loop_is_gone() {
    let (client, eventloop) = create_test_client();
    drop(eventloop);
    let stats = Arc::new(SessionStatsTracker::new());
    let publisher = SessionPublisher::new(client, QoS::AtMostOnce, stats.clone());

    let result = tokio_test::block_on(publisher.publish("smsServer/toSend", b"x".to_vec(), false));

    assert!(result.is_err());
    assert_eq!(stats.to_stats().total_failed, 1);
    assert_eq!(stats.to_stats().total_published, 0);
}
