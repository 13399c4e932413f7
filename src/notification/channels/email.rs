//! 邮件渠道 - 通过 SMTP 发送多部分邮件（纯文本 + HTML）

use crate::config::Config;
use crate::html::build_email_html;
use crate::notification::channel::{Notification, NotificationChannel, SendResult};
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::{debug, info};

/// SMTP 连接超时
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// 邮件渠道
pub struct EmailChannel;

/// 从配置解析出的 SMTP 参数，五个必填项齐全才构造
struct SmtpSettings {
    host: String,
    user: String,
    password: String,
    from: String,
    recipients: Vec<String>,
    port: u16,
    use_ssl: bool,
}

impl SmtpSettings {
    /// 任一必填项缺失或为空返回 None（渠道未配置，不是错误）
    fn from_config(config: &Config) -> Result<Option<Self>> {
        let host = config.get_or("SMTP_HOST", "");
        let user = config.get_or("SMTP_USER", "");
        let password = config.get_or("SMTP_PASSWORD", "");
        let from = config.get_or("EMAIL_FROM", "");
        let to = config.get_or("EMAIL_TO", "");

        if host.is_empty()
            || user.is_empty()
            || password.is_empty()
            || from.is_empty()
            || to.is_empty()
        {
            return Ok(None);
        }

        let port: u16 = config
            .get_or("SMTP_PORT", "465")
            .parse()
            .context("SMTP_PORT is not a valid port number")?;
        let use_ssl = config.get_or("SMTP_USE_SSL", "true").to_lowercase() == "true";

        let recipients: Vec<String> = to
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        Ok(Some(Self {
            host,
            user,
            password,
            from,
            recipients,
            port,
            use_ssl,
        }))
    }
}

impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    fn send(&self, config: &Config, message: &Notification<'_>) -> Result<SendResult> {
        let Some(settings) = SmtpSettings::from_config(config)? else {
            debug!("SMTP settings incomplete, email channel not configured");
            return Ok(SendResult::Skipped("SMTP 配置不完整".to_string()));
        };

        let email = build_message(&settings, message)?;
        let mailer = build_transport(&settings)?;

        mailer
            .send(&email)
            .context("SMTP send failed")?;

        info!(
            host = %settings.host,
            recipients = settings.recipients.len(),
            "Email notification sent"
        );
        Ok(SendResult::Sent)
    }
}

/// 构建 multipart/alternative 邮件
///
/// 纯文本部分使用传入的 content，HTML 部分从完整载荷重新构建。
fn build_message(settings: &SmtpSettings, message: &Notification<'_>) -> Result<Message> {
    let from: Mailbox = settings
        .from
        .parse()
        .context("EMAIL_FROM is not a valid address")?;

    let mut builder = Message::builder().from(from).subject(message.title);
    for recipient in &settings.recipients {
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", recipient))?;
        builder = builder.to(to);
    }

    let html_content = build_email_html(message.title, message.source, message.payload);

    builder
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(message.content.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_content),
                ),
        )
        .context("Failed to build email message")
}

/// 构建 SMTP 传输
///
/// `SMTP_USE_SSL=true`（默认）走隐式 TLS，否则明文连接后 STARTTLS 升级。
fn build_transport(settings: &SmtpSettings) -> Result<SmtpTransport> {
    let tls_params = TlsParameters::new(settings.host.clone())
        .context("Failed to build TLS parameters")?;

    let tls = if settings.use_ssl {
        Tls::Wrapper(tls_params)
    } else {
        Tls::Required(tls_params)
    };

    let transport = SmtpTransport::builder_dangerous(&settings.host)
        .port(settings.port)
        .tls(tls)
        .credentials(Credentials::new(
            settings.user.clone(),
            settings.password.clone(),
        ))
        .timeout(Some(SMTP_TIMEOUT))
        .build();

    Ok(transport)
}
