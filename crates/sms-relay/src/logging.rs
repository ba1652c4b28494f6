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

// src/logging.rs
// Log setup for the relay binaries.
//
// Every run logs to the console and to a file under the log directory.
// echo and shell keep a weekly-rotated file per host; the probe starts
// a fresh file on every run and also buffers its events in memory, so
// a failed probe can mail exactly what it logged.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Variant;

pub const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_SUFFIX: &str = "log";

// LogCapture is an in-memory log sink. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    // contents returns everything written so far.
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log capture lock poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// LogSettings says where and how a run logs.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub log_dir: PathBuf,
    pub file_prefix: String,
    pub rotation: Rotation,
    pub level: String,
    // fresh removes the previous log file before starting.
    pub fresh: bool,
    pub capture: Option<LogCapture>,
}

impl LogSettings {
    pub fn for_variant(variant: Variant, host_name: &str, log_dir: &Path, level: &str) -> Self {
        match variant {
            Variant::Echo | Variant::Shell => Self {
                log_dir: log_dir.to_path_buf(),
                file_prefix: format!("{}_{host_name}", variant.stem()),
                rotation: Rotation::WEEKLY,
                level: level.to_string(),
                fresh: false,
                capture: None,
            },
            Variant::Probe => Self {
                log_dir: log_dir.to_path_buf(),
                file_prefix: format!("{}Test{host_name}", variant.stem()),
                rotation: Rotation::NEVER,
                level: level.to_string(),
                fresh: true,
                capture: Some(LogCapture::new()),
            },
        }
    }

    // log_file is the path of the current (or only) log file. Rotated
    // files carry a date before the suffix.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir
            .join(format!("{}.{LOG_SUFFIX}", self.file_prefix))
    }

    fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::builder()
            .parse(&self.level)
            .with_context(|| format!("Invalid log level '{}'", self.level))
    }
}

// init_logging installs the global subscriber. The returned guard must
// be held until exit or buffered file output is lost.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&settings.log_dir).with_context(|| {
        format!(
            "Failed to create log directory: {}",
            settings.log_dir.display()
        )
    })?;

    if settings.fresh {
        let log_file = settings.log_file();
        if log_file.exists() {
            std::fs::remove_file(&log_file)
                .with_context(|| format!("Failed to remove {}", log_file.display()))?;
        }
    }

    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_target(false)
        .with_filter(settings.filter()?);

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(settings.rotation.clone())
        .filename_prefix(&settings.file_prefix)
        .filename_suffix(LOG_SUFFIX)
        .build(&settings.log_dir)
        .context("Failed to create file appender")?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking_writer)
        .with_filter(settings.filter()?);

    let capture_layer = settings.capture.clone().map(|capture| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(capture)
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(capture_layer.with_filter(settings.filter()?))
        .try_init()?;

    Ok(guard)
}
