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

// src/main.rs
// sms-relay: SMS relays over MQTT.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sms_relay::commands::{run_echo, run_probe, run_shell};
use sms_relay::config::DEFAULT_CONFIG_FILE;
use sms_relay::logging::{DEFAULT_LOG_LEVEL, LogCapture, LogSettings, init_logging};
use sms_relay::{RelayConfig, VERSION, Variant, host_name};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "sms-relay",
    about = "Relays SMS received over MQTT: echo, shell commands and SMS server probe",
    version
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "SMS_RELAY_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory for log files
    #[arg(long, global = true, default_value = ".")]
    log_dir: PathBuf,

    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Commands {
    /// Answer every SMS with "Received: <text>"
    Echo,
    /// Run "<instance name> <command>" SMS as shell commands
    Shell,
    /// Check that the SMS server echoes a test SMS, restart it otherwise
    Probe,
}

impl Commands {
    fn variant(self) -> Variant {
        match self {
            Commands::Echo => Variant::Echo,
            Commands::Shell => Variant::Shell,
            Commands::Probe => Variant::Probe,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let variant = cli.command.variant();
    let host_name = host_name();

    let log_settings = LogSettings::for_variant(variant, &host_name, &cli.log_dir, &cli.log_level);
    // Keep the guard alive
    let _guard = match init_logging(&log_settings) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    info!("----- Starting on {host_name}, version {VERSION} -----");

    let config = match RelayConfig::load(&cli.config, variant) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let capture = log_settings.capture.unwrap_or_default();
    match run(variant, &config, &host_name, &capture) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(variant: Variant, config: &RelayConfig, host_name: &str, capture: &LogCapture) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(async {
        match variant {
            Variant::Echo => run_echo(config, host_name).await,
            Variant::Shell => run_shell(config, host_name).await,
            Variant::Probe => run_probe(config, host_name, capture).await.map(|_| ()),
        }
    })
}
