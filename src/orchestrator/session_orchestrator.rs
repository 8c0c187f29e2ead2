//! 会话编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **打开会话**：列出图片目录，发现缓存时给出恢复提议
//! 2. **处理评分人操作**：每个操作只触发一次状态迁移
//! 3. **边界检查点**：批次结束或全部完成时导出 + 通知，每次跨越边界只执行一次
//! 4. **界面数据**：`view()` 只读地计算当前界面，不产生任何副作用
//!
//! 导出和通知失败只作为警告返回，不会回滚已记录的评分。

use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{ImageCatalog, SmtpRelay};
use crate::models::{BatchOption, RaterId, Score, ScoreRecord};
use crate::services::{
    shuffle_planner, CachedSession, Notification, NotificationKind, Notifier, ResultExporter,
    SessionStore, ShufflePlanner, UnconfiguredNotifier,
};
use crate::utils::logging;
use crate::workflow::{Boundary, Phase, Session};

/// 评分人的一次操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaterAction {
    /// 选择批次大小
    ChooseBatch(usize),
    /// 为当前图片评分
    Score(Score),
    /// 批次结束后再来一批
    AnotherBatch,
    /// 批次结束后停止
    Stop,
}

/// 发现缓存时评分人的选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// 继续上次的会话
    Continue,
    /// 丢弃缓存，重新开始
    Discard,
}

/// 会话恢复提议
#[derive(Debug, Clone)]
pub struct RecoveryOffer {
    rater: RaterId,
    cached: CachedSession,
    catalog: Vec<String>,
}

impl RecoveryOffer {
    pub fn rater(&self) -> &RaterId {
        &self.rater
    }

    /// 缓存中已评分的数量
    pub fn scored(&self) -> usize {
        self.cached.cursor()
    }
}

/// 打开会话的结果
#[derive(Debug)]
pub enum Opening {
    /// 没有缓存，已创建全新会话
    Ready(Session),
    /// 发现缓存，等待评分人选择
    Recovery(RecoveryOffer),
}

/// 通知投递结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed(String),
    /// 未发送（例如导出失败、未配置接收人）
    Skipped(String),
}

/// 边界检查点的执行结果
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub kind: NotificationKind,
    pub export_path: Option<PathBuf>,
    pub delivery: Delivery,
}

impl Checkpoint {
    /// 需要展示给评分人的警告
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.export_path.is_none() {
            warnings.push(
                "Could not write the results file; your scores are kept in the session cache."
                    .to_string(),
            );
        }
        match &self.delivery {
            Delivery::Sent => {}
            Delivery::Failed(reason) | Delivery::Skipped(reason) => {
                warnings.push(format!("Failed to send email: {}", reason));
            }
        }
        warnings
    }
}

/// 一次操作的结果
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub recorded: Option<ScoreRecord>,
    pub checkpoint: Option<Checkpoint>,
}

/// 当前界面
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// 选择批次大小；`paused` 表示评分人刚选择了停止
    ChooseBatch { options: Vec<BatchOption>, paused: bool },
    /// 为图片评分
    Rate {
        image: String,
        image_path: PathBuf,
        guide_image: PathBuf,
        batch_end: usize,
    },
    /// 批次结束
    BatchClosed { batch_size: usize },
    /// 全部完成，展示评分表
    Complete { records: Vec<ScoreRecord> },
}

/// 界面数据
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub rater: String,
    pub scored: usize,
    pub total: usize,
    pub progress: f64,
    pub screen: Screen,
}

/// 会话编排器
pub struct SessionOrchestrator {
    catalog: ImageCatalog,
    store: SessionStore,
    exporter: ResultExporter,
    planner: ShufflePlanner,
    notifier: Box<dyn Notifier>,
    recipient: Option<String>,
    guide_image: PathBuf,
}

impl SessionOrchestrator {
    /// 根据配置创建编排器，邮件中继未配置时通知会以警告失败
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let notifier: Box<dyn Notifier> = match &config.smtp {
            Some(smtp) => Box::new(SmtpRelay::new(
                smtp,
                Duration::from_secs(config.notify_timeout_secs),
            )?),
            None => Box::new(UnconfiguredNotifier),
        };
        Ok(Self::new(config, notifier))
    }

    pub fn new(config: &Config, notifier: Box<dyn Notifier>) -> Self {
        Self {
            catalog: ImageCatalog::new(&config.image_dir),
            store: SessionStore::new(&config.output_dir),
            exporter: ResultExporter::new(&config.output_dir),
            planner: ShufflePlanner::with_seed(config.shuffle_seed),
            notifier,
            recipient: config.recipient.clone(),
            guide_image: config.guide_image.clone(),
        }
    }

    /// 为评分人打开会话
    ///
    /// 图片目录不存在时直接失败，不创建任何状态。
    /// 缓存中的图片不在当前目录里（或重复）时不提供恢复，按全新会话处理。
    pub fn open(&self, rater: RaterId) -> AppResult<Opening> {
        let catalog = self.catalog.list_images()?;
        info!("📁 图片目录中共有 {} 张图片", catalog.len());

        match self.store.load(&rater) {
            Some(cached) if shuffle_planner::records_match_catalog(&cached.records, &catalog) => {
                info!("♻️ 发现 {} 的未完成会话 ({} 张已评分)", rater, cached.cursor());
                Ok(Opening::Recovery(RecoveryOffer {
                    rater,
                    cached,
                    catalog,
                }))
            }
            Some(cached) => {
                let err = self.mismatched_cache(&rater, &cached, &catalog);
                warn!("⚠️ {}，按全新会话处理", err);
                Ok(Opening::Ready(self.start_fresh(rater, &catalog)?))
            }
            None => Ok(Opening::Ready(self.start_fresh(rater, &catalog)?)),
        }
    }

    fn mismatched_cache(
        &self,
        rater: &RaterId,
        cached: &CachedSession,
        catalog: &[String],
    ) -> AppError {
        AppError::CacheReadFailure {
            path: self.store.cache_path(rater).display().to_string(),
            reason: format!(
                "{} 条评分记录与当前目录的 {} 张图片不一致",
                cached.cursor(),
                catalog.len()
            ),
        }
    }

    /// 处理恢复提议
    ///
    /// 恢复出的会话如果已经全部评分（上次在清理前中断），这里补做一次完成检查点
    pub async fn resume(
        &self,
        offer: RecoveryOffer,
        choice: RecoveryChoice,
    ) -> AppResult<(Session, Option<Checkpoint>)> {
        let RecoveryOffer {
            rater,
            cached,
            catalog,
        } = offer;

        match choice {
            RecoveryChoice::Discard => {
                self.store.discard(&rater)?;
                info!("🆕 {} 放弃了旧会话，重新开始", rater);
                Ok((self.start_fresh(rater, &catalog)?, None))
            }
            RecoveryChoice::Continue => {
                let persisted = cached.order.clone();
                let order = self
                    .planner
                    .recover(persisted.clone(), &cached.records, &catalog)
                    .ok_or_else(|| self.mismatched_cache(&rater, &cached, &catalog))?;
                if persisted.as_ref() != Some(&order) {
                    self.store.save_order(&rater, &order)?;
                }

                let session = Session::new(rater, order, cached.records)?;
                info!("▶️ 继续会话 {}", session);

                let checkpoint = if session.total() > 0 && session.phase() == Phase::SessionComplete {
                    Some(self.checkpoint(&session, NotificationKind::Final).await)
                } else {
                    None
                };
                Ok((session, checkpoint))
            }
        }
    }

    fn start_fresh(&self, rater: RaterId, catalog: &[String]) -> AppResult<Session> {
        let order = self.planner.plan(None, catalog);
        if !order.is_empty() {
            self.store.save_order(&rater, &order)?;
        }
        Session::new(rater, order, Vec::new())
    }

    /// 处理评分人的一次操作
    ///
    /// 操作与当前阶段不符时返回 `InvalidAction`，会话不变
    pub async fn apply(&self, session: &mut Session, action: RaterAction) -> AppResult<Outcome> {
        match action {
            RaterAction::ChooseBatch(size) => {
                session.choose_batch(size)?;
                info!(
                    "📦 {} 开始新批次: {} 张 (从第 {} 张开始)",
                    session.rater(),
                    size,
                    session.cursor() + 1
                );
                Ok(Outcome::default())
            }
            RaterAction::AnotherBatch => {
                session.another_batch()?;
                info!("📦 {} 继续下一批", session.rater());
                Ok(Outcome::default())
            }
            RaterAction::Stop => {
                session.stop()?;
                info!("⏸️ {} 暂停评分 {}", session.rater(), session);
                Ok(Outcome::default())
            }
            RaterAction::Score(score) => {
                let (record, boundary) = session.record(&self.store, score)?;
                let checkpoint = match boundary {
                    Boundary::None => None,
                    Boundary::BatchClosed => {
                        logging::log_batch_closed(session.rater(), session.cursor(), session.total());
                        Some(self.checkpoint(session, NotificationKind::Batch).await)
                    }
                    Boundary::SessionComplete => {
                        logging::log_session_complete(session.rater(), session.total());
                        Some(self.checkpoint(session, NotificationKind::Final).await)
                    }
                };
                Ok(Outcome {
                    recorded: Some(record),
                    checkpoint,
                })
            }
        }
    }

    /// 计算当前界面（无副作用，可任意重复调用）
    pub fn view(&self, session: &Session) -> SessionView {
        let screen = match session.phase() {
            Phase::NeedsBatchSize => Screen::ChooseBatch {
                options: session.batch_menu(),
                paused: session.controller().is_paused(),
            },
            Phase::InBatch => {
                let image = session.next_image().unwrap_or_default().to_string();
                Screen::Rate {
                    image_path: self.catalog.image_path(&image),
                    image,
                    guide_image: self.guide_image.clone(),
                    batch_end: session.batch_end(),
                }
            }
            Phase::BatchClosed => Screen::BatchClosed {
                batch_size: session.controller().window().size,
            },
            Phase::SessionComplete => Screen::Complete {
                records: session.records().to_vec(),
            },
        };

        SessionView {
            rater: session.rater().to_string(),
            scored: session.cursor(),
            total: session.total(),
            progress: session.progress(),
            screen,
        }
    }

    /// 边界检查点：导出 → （完成时）清理缓存 → 通知
    async fn checkpoint(&self, session: &Session, kind: NotificationKind) -> Checkpoint {
        let rater = session.rater();

        let export_path = match self.exporter.export(rater, session.records()) {
            Ok(path) => Some(path),
            Err(e) => {
                error!("❌ 导出 {} 的评分结果失败: {}", rater, e);
                None
            }
        };

        // 只有最终结果成功落盘后才删除缓存
        if kind == NotificationKind::Final && export_path.is_some() {
            if let Err(e) = self.store.discard(rater) {
                warn!("⚠️ 清理 {} 的会话缓存失败: {}", rater, e);
            }
        }

        let delivery = match (&export_path, &self.recipient) {
            (None, _) => Delivery::Skipped("no results file to attach".to_string()),
            (Some(_), None) => Delivery::Skipped("no recipient configured".to_string()),
            (Some(path), Some(recipient)) => {
                let notification = Notification::results(kind, rater, recipient.clone(), path);
                match self.notifier.send(&notification).await {
                    Ok(()) => Delivery::Sent,
                    Err(e) => {
                        warn!("⚠️ {}", e);
                        Delivery::Failed(e.to_string())
                    }
                }
            }
        };

        Checkpoint {
            kind,
            export_path,
            delivery,
        }
    }
}
