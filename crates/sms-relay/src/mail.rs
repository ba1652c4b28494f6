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

// src/mail.rs
// Plain-text mail delivery.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::errors::MailError;

// DEFAULT_SMTP_PORT is used when mailServer carries no ":port".
pub const DEFAULT_SMTP_PORT: u16 = 25;

// MailMessage is one outgoing mail. A missing (or empty) recipient
// sends the mail back to the configured sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    pub to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: MailMessage) -> Result<(), MailError>;
}

// SmtpMailer talks unauthenticated SMTP to a relay on the local
// network, which is what the SMS server setups use.
pub struct SmtpMailer {
    sender: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(server: &str, sender: impl Into<String>) -> Self {
        let (host, port) = split_server(server);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();
        Self {
            sender: sender.into(),
            transport,
        }
    }

    // recipient resolves the To address of mail.
    pub fn recipient<'a>(&'a self, mail: &'a MailMessage) -> &'a str {
        mail.to
            .as_deref()
            .filter(|to| !to.is_empty())
            .unwrap_or(&self.sender)
    }

    pub fn build_message(&self, mail: &MailMessage) -> Result<Message, MailError> {
        let from: Mailbox = self.sender.parse()?;
        let to: Mailbox = self.recipient(mail).parse()?;
        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .date_now()
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: MailMessage) -> Result<(), MailError> {
        let message = self.build_message(&mail)?;
        info!("Sending mail to {}", self.recipient(&mail));
        self.transport.send(message).await?;
        Ok(())
    }
}

// split_server splits "host[:port]", defaulting to DEFAULT_SMTP_PORT.
fn split_server(server: &str) -> (&str, u16) {
    match server.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (server, DEFAULT_SMTP_PORT),
        },
        None => (server, DEFAULT_SMTP_PORT),
    }
}
