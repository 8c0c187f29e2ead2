//! 通知服务 - 业务能力层
//!
//! 只负责"把导出文件发给接收人"这一能力。
//! 批次结束和全部完成共用同一个入口，只有正文不同。

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::RaterId;

/// 一次通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub recipient: String,
    pub attachment: PathBuf,
}

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// 一个批次完成
    Batch,
    /// 全部图片评分完成
    Final,
}

impl NotificationKind {
    fn tag(self) -> &'static str {
        match self {
            NotificationKind::Batch => "batch",
            NotificationKind::Final => "final",
        }
    }
}

impl Notification {
    /// 构建结果通知
    pub fn results(
        kind: NotificationKind,
        rater: &RaterId,
        recipient: impl Into<String>,
        attachment: &Path,
    ) -> Self {
        Self {
            subject: format!("gScorer Output Submitted by {}", rater),
            body: format!("Scores for {} ({}) are attached.", rater, kind.tag()),
            recipient: recipient.into(),
            attachment: attachment.to_path_buf(),
        }
    }
}

/// 通知发送能力
///
/// 发送失败只返回 `NotificationDeliveryFailure`，调用方负责把它展示为警告。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> AppResult<()>;
}

/// 未配置邮件中继时使用，所有发送都以"未配置"失败
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredNotifier;

#[async_trait]
impl Notifier for UnconfiguredNotifier {
    async fn send(&self, _notification: &Notification) -> AppResult<()> {
        Err(AppError::delivery_failed("邮件中继未配置"))
    }
}
