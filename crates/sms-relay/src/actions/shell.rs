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

// src/actions/shell.rs
// Shell relay: runs "<instance name> <command>" SMS as shell commands.
//
// Only originators listed in mailReceivers may run commands. The full
// output is always mailed; the SMS reply carries either the output
// itself (when it fits) or a one-line status.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::RelayConfig;
use crate::envelope::{InboundMessage, OutboundMessage};
use crate::exec::{CommandOutput, CommandRunner};
use crate::handler::{ActionOutcome, RelayAction};
use crate::mail::{MailMessage, Mailer};

// SHORT_RESPONSE_LIMIT is the output length (in characters) below which
// the output itself is sent back by SMS.
pub const SHORT_RESPONSE_LIMIT: usize = 70;

pub const COMMAND_OK_RESPONSE: &str = "Command ok, see mail";

#[derive(Debug, Clone, Default)]
pub struct ShellRelaySettings {
    pub instance_name: String,
    pub shell_init_command: String,
    pub shell_error_remove: String,
    pub mail_receivers: Option<HashMap<String, Option<String>>>,
    pub reply_on_system_error: bool,
}

impl ShellRelaySettings {
    pub fn from_config(config: &RelayConfig, host_name: &str) -> Self {
        Self {
            instance_name: config.instance_name(host_name),
            shell_init_command: config.shell_init_command.clone().unwrap_or_default(),
            shell_error_remove: config.shell_error_remove.clone().unwrap_or_default(),
            mail_receivers: config.mail_receivers.clone(),
            reply_on_system_error: config.reply_on_system_error,
        }
    }

    // recipient resolves who gets the output mail for originator.
    // Err means the originator is not allowed to run commands.
    // Ok(None) means "mail the sender address".
    fn recipient(&self, originator: &str) -> Result<Option<String>, String> {
        let Some(receivers) = &self.mail_receivers else {
            return Err("'mailReceivers' don't exist in configuration file".to_string());
        };
        match receivers.get(originator) {
            Some(address) => Ok(address.clone().filter(|address| !address.is_empty())),
            None => Err(format!(
                "'{originator}' don't exist in 'mailReceivers' from configuration file"
            )),
        }
    }
}

pub struct ShellRelay {
    settings: ShellRelaySettings,
    runner: Arc<dyn CommandRunner>,
    mailer: Arc<dyn Mailer>,
}

impl ShellRelay {
    pub fn new(
        settings: ShellRelaySettings,
        runner: Arc<dyn CommandRunner>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            settings,
            runner,
            mailer,
        }
    }

    async fn send_mail(&self, command: &str, body: String, to: Option<String>) {
        let mail = MailMessage {
            subject: format!("{}: {command}", self.settings.instance_name),
            body,
            to,
        };
        if let Err(e) = self.mailer.send(mail).await {
            error!("Failed to mail output of '{command}': {e}");
        }
    }
}

#[async_trait]
impl RelayAction for ShellRelay {
    async fn act(&self, inbound: InboundMessage) -> ActionOutcome {
        let Some(rest) = strip_prefix_ignore_case(&inbound.text, &self.settings.instance_name)
        else {
            return ActionOutcome::Ignored(format!("Ignoring {}", inbound.text));
        };

        let recipient = match self.settings.recipient(&inbound.originator) {
            Ok(recipient) => recipient,
            Err(reason) => return ActionOutcome::Ignored(reason),
        };

        let command = rest.trim().to_string();
        info!("Command={command}");
        let script = format!("{}{command}", self.settings.shell_init_command);

        match self.runner.run(&script).await {
            Ok(output) => {
                let summary = summarize(&output, &self.settings.shell_error_remove);
                info!("Log={}", summary.log);
                info!("Response: {}", summary.response);
                self.send_mail(&command, summary.log, recipient).await;
                ActionOutcome::Reply(OutboundMessage::new(
                    inbound.originator,
                    summary.response,
                ))
            }
            Err(e) => {
                error!("Command execution failed with error {e}");
                let response = format!("Error: {}", system_error_text(&e));
                info!("Response: {response}");
                self.send_mail(&command, response.clone(), recipient).await;
                if self.settings.reply_on_system_error {
                    ActionOutcome::Reply(OutboundMessage::new(inbound.originator, response))
                } else {
                    warn!("Not answering {} after a system error", inbound.originator);
                    ActionOutcome::Silent
                }
            }
        }
    }
}

// CommandSummary is the mail body and SMS reply built from one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub log: String,
    pub response: String,
}

// summarize turns command output into the mailed log and the SMS
// response. error_remove is only stripped from failing output.
pub fn summarize(output: &CommandOutput, error_remove: &str) -> CommandSummary {
    let mut log = output.text.clone();
    let mut response = if output.success() {
        COMMAND_OK_RESPONSE.to_string()
    } else {
        if !error_remove.is_empty() {
            log = log.replace(error_remove, "");
        }
        format!("Error {} occurred! See mail", output.exit_code)
    };

    if log.chars().count() < SHORT_RESPONSE_LIMIT {
        response = log.clone();
    }

    CommandSummary { log, response }
}

// system_error_text is the OS error message without the
// " (os error N)" suffix std appends.
pub fn system_error_text(error: &std::io::Error) -> String {
    let text = error.to_string();
    match text.rfind(" (os error ") {
        Some(index) if text.ends_with(')') => text[..index].to_string(),
        _ => text,
    }
}

// strip_prefix_ignore_case returns what follows prefix in text when the
// first prefix-length characters of text match prefix, ignoring case.
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix_len = prefix.chars().count();
    let split = text
        .char_indices()
        .nth(prefix_len)
        .map_or(text.len(), |(index, _)| index);
    let (head, rest) = text.split_at(split);

    if head.chars().count() == prefix_len && head.to_lowercase() == prefix.to_lowercase() {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(strip_prefix_ignore_case("foo do-something", "Foo"), Some(" do-something"));
        assert_eq!(strip_prefix_ignore_case("FOO", "Foo"), Some(""));
        assert_eq!(strip_prefix_ignore_case("Fo do-something", "Foo"), None);
        assert_eq!(strip_prefix_ignore_case("Fo", "Foo"), None);
        assert_eq!(strip_prefix_ignore_case("Évier ls", "évier"), Some(" ls"));
    }

    #[test]
    fn test_system_error_text_drops_os_error_code() {
        let error = std::io::Error::from_raw_os_error(2);
        assert!(error.to_string().ends_with("(os error 2)"));
        assert_eq!(system_error_text(&error), "No such file or directory");

        let error = std::io::Error::other("runner task panicked");
        assert_eq!(system_error_text(&error), "runner task panicked");
    }

    #[test]
    fn test_recipient_resolution() {
        let settings = ShellRelaySettings {
            mail_receivers: Some(HashMap::from([
                ("+33611111111".to_string(), Some("me@home.lan".to_string())),
                ("+33622222222".to_string(), None),
                ("+33633333333".to_string(), Some(String::new())),
            ])),
            ..Default::default()
        };

        assert_eq!(
            settings.recipient("+33611111111"),
            Ok(Some("me@home.lan".to_string()))
        );
        assert_eq!(settings.recipient("+33622222222"), Ok(None));
        assert_eq!(settings.recipient("+33633333333"), Ok(None));
        assert!(settings.recipient("+33699999999").is_err());
    }

    #[test]
    fn test_no_receivers_table_rejects_everyone() {
        let settings = ShellRelaySettings::default();
        assert!(settings.recipient("+33611111111").is_err());
    }
}
