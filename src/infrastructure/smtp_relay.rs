//! 邮件中继 - 基础设施层
//!
//! 通过 STARTTLS 加密的 SMTP 会话发送带附件的邮件

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use crate::services::notifier::{Notification, Notifier};

/// SMTP 邮件中继
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    timeout: Duration,
}

impl SmtpRelay {
    /// 根据配置创建中继（此时不建立连接）
    pub fn new(config: &SmtpConfig, timeout: Duration) -> AppResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(AppError::delivery_failed)?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        // 显示名称单独传入，逗号、引号等字符由 lettre 负责转义
        let address: Address = config
            .user
            .parse()
            .map_err(|e| AppError::Config(format!("发件人地址无效: {}", e)))?;
        let sender = Mailbox::new(Some(config.sender_name.clone()), address);

        Ok(Self {
            transport,
            sender,
            timeout,
        })
    }

    async fn build_message(&self, notification: &Notification) -> AppResult<Message> {
        let recipient: Mailbox = notification
            .recipient
            .parse()
            .map_err(|e| AppError::delivery_failed(format!("收件人地址无效: {}", e)))?;

        let file_data = tokio::fs::read(&notification.attachment)
            .await
            .map_err(|e| {
                AppError::delivery_failed(format!(
                    "无法读取附件 {}: {}",
                    notification.attachment.display(),
                    e
                ))
            })?;
        let file_name = notification
            .attachment
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "scores.csv".to_string());

        let content_type =
            ContentType::parse("application/octet-stream").map_err(AppError::delivery_failed)?;
        let attachment = Attachment::new(file_name).body(file_data, content_type);

        Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(notification.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(notification.body.clone()))
                    .singlepart(attachment),
            )
            .map_err(AppError::delivery_failed)
    }
}

#[async_trait]
impl Notifier for SmtpRelay {
    async fn send(&self, notification: &Notification) -> AppResult<()> {
        let message = self.build_message(notification).await?;

        debug!(
            "正在发送邮件: {} (附件: {})",
            notification.subject,
            notification.attachment.display()
        );

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_)) => {
                info!("📧 邮件已发送: {}", notification.subject);
                Ok(())
            }
            Ok(Err(e)) => Err(AppError::delivery_failed(e)),
            Err(_) => Err(AppError::delivery_failed(format!(
                "发送超时 ({} 秒)",
                self.timeout.as_secs()
            ))),
        }
    }
}
