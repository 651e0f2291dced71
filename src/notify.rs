//! Emails the finished PDF report.
//!
//! Notification is optional: a missing or incomplete credentials file skips it without raising an
//! error. Once configured, a single message is sent over an implicit-TLS SMTP session.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::{info, warn};
use serde::Deserialize;

use crate::config::{SmtpSettings, DEFAULT_REPORT_FILE};
use crate::error::NotifyError;

pub const SUBJECT: &str = "Weekly Sales Report 📊";
pub const BODY: &str = "Dear Team,\n\nPlease find the attached latest Sales Report (PDF).\n\nRegards,\nSales Analytics System";

const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// Credentials and recipient read from the JSON config file.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub sender_email: String,
    pub app_password: String,
    pub receiver_email: String,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("sender_email", &self.sender_email)
            .field("app_password", &"<redacted>")
            .field("receiver_email", &self.receiver_email)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawEmailConfig {
    sender_email: Option<String>,
    app_password: Option<String>,
    receiver_email: Option<String>,
}

/// Why no email was sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The config file does not exist.
    MissingConfig(PathBuf),
    /// The config file exists but could not be read or parsed.
    InvalidConfig(String),
    /// One or more fields are missing or blank.
    IncompleteConfig(Vec<&'static str>),
    /// No PDF report was produced in this run.
    NoReport,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingConfig(path) => {
                write!(f, "email config {} not found", path.display())
            }
            SkipReason::InvalidConfig(reason) => write!(f, "email config unusable: {reason}"),
            SkipReason::IncompleteConfig(fields) => {
                write!(f, "email config is missing {}", fields.join(", "))
            }
            SkipReason::NoReport => write!(f, "no PDF report to attach"),
        }
    }
}

/// Reads the email config, or explains why notification should be skipped.
pub fn load_email_config(path: &Path) -> Result<EmailConfig, SkipReason> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(SkipReason::MissingConfig(path.to_path_buf()))
        }
        Err(err) => return Err(SkipReason::InvalidConfig(err.to_string())),
    };
    parse_email_config(&contents)
}

/// Parses the JSON config body. Blank strings count as missing.
pub fn parse_email_config(contents: &str) -> Result<EmailConfig, SkipReason> {
    let raw: RawEmailConfig = serde_json::from_str(contents)
        .map_err(|err| SkipReason::InvalidConfig(err.to_string()))?;

    let mut missing = Vec::new();
    let mut field = |value: Option<String>, name: &'static str| {
        let value = value.filter(|value| !value.trim().is_empty());
        if value.is_none() {
            missing.push(name);
        }
        value.unwrap_or_default()
    };
    let config = EmailConfig {
        sender_email: field(raw.sender_email, "sender_email"),
        app_password: field(raw.app_password, "app_password"),
        receiver_email: field(raw.receiver_email, "receiver_email"),
    };

    if missing.is_empty() {
        Ok(config)
    } else {
        Err(SkipReason::IncompleteConfig(missing))
    }
}

fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.trim().parse().map_err(|source| NotifyError::Address {
        address: address.to_owned(),
        source,
    })
}

/// Builds the notification message with the PDF attached as base64.
pub fn build_message(config: &EmailConfig, report_path: &Path) -> Result<Message, NotifyError> {
    let bytes = fs::read(report_path).map_err(|source| NotifyError::Attachment {
        path: report_path.to_path_buf(),
        source,
    })?;
    let file_name = report_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_REPORT_FILE.to_owned());

    let content_type =
        ContentType::parse(ATTACHMENT_CONTENT_TYPE).map_err(NotifyError::ContentType)?;
    let body = Body::new_with_encoding(bytes, ContentTransferEncoding::Base64)
        .unwrap_or_else(|bytes| Body::new(bytes));
    let attachment = Attachment::new(file_name).body(body, content_type);

    Message::builder()
        .from(mailbox(&config.sender_email)?)
        .to(mailbox(&config.receiver_email)?)
        .subject(SUBJECT)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(BODY.to_owned()))
                .singlepart(attachment),
        )
        .map_err(NotifyError::Message)
}

/// Sends the report once. There are no retries.
pub fn send_report(
    config: &EmailConfig,
    report_path: &Path,
    smtp: &SmtpSettings,
) -> Result<(), NotifyError> {
    let message = build_message(config, report_path)?;
    let smtp_error = |source| NotifyError::Smtp {
        host: smtp.host.clone(),
        source,
    };

    let mailer = SmtpTransport::relay(&smtp.host)
        .map_err(smtp_error)?
        .port(smtp.port)
        .credentials(Credentials::new(
            config.sender_email.clone(),
            config.app_password.clone(),
        ))
        .build();

    match mailer.send(&message) {
        Ok(response) => {
            info!(
                "Report emailed to {} ({})",
                config.receiver_email,
                response.code()
            );
            Ok(())
        }
        Err(source) => {
            warn!("SMTP delivery via {}:{} failed", smtp.host, smtp.port);
            Err(smtp_error(source))
        }
    }
}
