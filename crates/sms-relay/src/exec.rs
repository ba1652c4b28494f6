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

// src/exec.rs
// Shell command execution for the shell relay.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use async_trait::async_trait;
use tracing::debug;

// DEFAULT_SHELL is used when no shellName is configured.
pub const DEFAULT_SHELL: &str = "/bin/sh";

// CommandOutput is what one shell invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    // exit_code is the process exit status, or -N when the process
    // was killed by signal N.
    pub exit_code: i32,
    // text is stdout and stderr interleaved as written, decoded as
    // UTF-8 (lossy) with trailing whitespace removed.
    pub text: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

// CommandRunner runs one shell script to completion. An Err means the
// process could not be run at all; a non-zero exit is an Ok.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, script: &str) -> std::io::Result<CommandOutput>;
}

// ShellRunner runs scripts as `<shell> -c <script>` from a fixed
// working directory (the user's home by default).
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    working_dir: PathBuf,
}

impl ShellRunner {
    pub fn new(shell: Option<&str>) -> Self {
        Self {
            shell: shell
                .filter(|shell| !shell.is_empty())
                .unwrap_or(DEFAULT_SHELL)
                .to_string(),
            working_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, script: &str) -> std::io::Result<CommandOutput> {
        let shell = self.shell.clone();
        let working_dir = self.working_dir.clone();
        let script = script.to_string();
        debug!("Running '{script}' with {shell} in {}", working_dir.display());

        tokio::task::spawn_blocking(move || run_blocking(&shell, &working_dir, &script))
            .await
            .map_err(std::io::Error::other)?
    }
}

// run_blocking hands both stdout and stderr the write end of one pipe,
// so the capture keeps the order the command wrote in.
fn run_blocking(shell: &str, working_dir: &Path, script: &str) -> std::io::Result<CommandOutput> {
    let (mut reader, writer) = std::io::pipe()?;

    let mut command = Command::new(shell);
    command
        .arg("-c")
        .arg(script)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    let mut child = command.spawn()?;
    // The builder still holds write ends; reading would never see EOF.
    drop(command);

    let mut captured = Vec::new();
    reader.read_to_end(&mut captured)?;
    let status = child.wait()?;

    Ok(CommandOutput {
        exit_code: exit_code(status),
        text: String::from_utf8_lossy(&captured).trim_end().to_string(),
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
