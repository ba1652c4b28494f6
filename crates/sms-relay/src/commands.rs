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

// src/commands.rs
// Entry points of the three relays, one per subcommand.

use std::sync::Arc;

use anyhow::{Context, Result};
use relaybus::RelaySession;
use tracing::{debug, error, info};

use crate::actions::{EchoRelay, ShellRelay, ShellRelaySettings};
use crate::config::{RelayConfig, Variant};
use crate::exec::ShellRunner;
use crate::handler::MessageHandler;
use crate::logging::LogCapture;
use crate::mail::SmtpMailer;
use crate::probe::{PROBE_TICK, PROBE_TICKS, ProbeReport, ProbeResponder, escalate, wait_for_echo};
use crate::relay::run_relay;
use crate::{VERSION, client_id};

// run_echo answers every SMS with "Received: <text>". Only returns on
// error.
pub async fn run_echo(config: &RelayConfig, host_name: &str) -> Result<()> {
    let options = config.session_options(client_id(Variant::Echo.stem()), Some(host_name), VERSION);
    let mut session = RelaySession::connect(options)
        .await
        .context("Failed to connect to MQTT broker")?;

    let handler = MessageHandler::new(
        EchoRelay,
        Arc::new(session.publisher()),
        &config.mqtt_send_topic,
    );
    run_relay(&mut session, &handler)
        .await
        .context("MQTT session ended")
}

// run_shell runs "<instance> <command>" SMS from known originators.
// Only returns on error.
pub async fn run_shell(config: &RelayConfig, host_name: &str) -> Result<()> {
    let settings = ShellRelaySettings::from_config(config, host_name);
    let instance_name = settings.instance_name.clone();
    info!("Answering commands prefixed by '{instance_name}'");

    let runner = ShellRunner::new(config.shell_name.as_deref());
    debug!(
        "Commands run with {} in {}",
        runner.shell(),
        runner.working_dir().display()
    );
    let mailer = SmtpMailer::new(config.mail_server(), config.mail_sender());
    let action = ShellRelay::new(settings, Arc::new(runner), Arc::new(mailer));

    let options = config.session_options(
        client_id(Variant::Shell.stem()),
        Some(&instance_name),
        VERSION,
    );
    let mut session = RelaySession::connect(options)
        .await
        .context("Failed to connect to MQTT broker")?;

    let handler = MessageHandler::new(action, Arc::new(session.publisher()), &config.mqtt_send_topic);
    run_relay(&mut session, &handler)
        .await
        .context("MQTT session ended")
}

// run_probe sends one test SMS through the SMS server and waits for it
// to come back. On timeout the server is restarted and the captured log
// is mailed. Both outcomes are a success for the caller.
pub async fn run_probe(
    config: &RelayConfig,
    host_name: &str,
    capture: &LogCapture,
) -> Result<ProbeReport> {
    let options = config.session_options(client_id(Variant::Probe.stem()), None, VERSION);
    let mut session = RelaySession::connect(options)
        .await
        .context("Failed to connect to MQTT broker")?;
    let publisher = session.publisher();

    let mut responder = ProbeResponder::new(
        host_name,
        config.sms_server_number.clone().unwrap_or_default(),
        &config.mqtt_send_topic,
    );
    info!(
        "Waiting up to {PROBE_TICKS} ticks for '{} {}'",
        responder.prefix(),
        responder.payload()
    );
    let report = wait_for_echo(
        &mut session,
        &mut responder,
        &publisher,
        PROBE_TICKS,
        PROBE_TICK,
    )
    .await;
    debug!("Probe finished after {} ticks: {:?}", report.ticks_used, report.state);
    info!("MQTT session statistics: {:?}", session.stats());

    if let Err(e) = session.disconnect().await {
        debug!("Ignoring disconnect error: {e}");
    }

    if report.matched() {
        println!("SMS server seems to work...");
    } else {
        let mailer = SmtpMailer::new(config.mail_server(), config.mail_sender());
        if let Err(e) = escalate(
            config.restart_url(),
            &reqwest::Client::new(),
            &mailer,
            host_name,
            capture,
        )
        .await
        {
            error!("Failed to send alert mail: {e}");
        }
    }

    Ok(report)
}
