//! 应用入口 - 编排层
//!
//! 驱动一次完整的评分运行：选择评分人 → 恢复/新建会话 → 循环处理评分人操作。
//! 每次循环只处理一个操作，界面每次都从会话状态重新计算。

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::RaterId;
use crate::orchestrator::session_orchestrator::{Opening, SessionOrchestrator};
use crate::ui::TerminalUi;
use crate::utils::logging;
use crate::workflow::Session;

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: SessionOrchestrator,
    ui: TerminalUi,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config.image_dir, &config.output_dir);

        if config.smtp.is_none() || config.recipient.is_none() {
            warn!("⚠️ 邮件通知未完整配置，结果只保存在本地");
        }

        let orchestrator = SessionOrchestrator::from_config(&config)?;

        Ok(Self {
            config,
            orchestrator,
            ui: TerminalUi::new(),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        self.ui.show_title();

        let rater = self.resolve_rater()?;
        let mut session = self.open_session(rater).await?;

        loop {
            let view = self.orchestrator.view(&session);
            self.ui.render_header(&view);

            let Some(action) = self.ui.prompt_action(&view)? else {
                break;
            };

            match self.orchestrator.apply(&mut session, action).await {
                Ok(outcome) => self.ui.show_outcome(&outcome),
                Err(e) if e.is_recoverable() => {
                    warn!("⚠️ {}", e);
                    self.ui.show_warning(&e.to_string());
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!("👋 本次运行结束 {}", session);
        Ok(())
    }

    /// 选择评分人，名称为空时重新询问
    fn resolve_rater(&self) -> Result<RaterId> {
        loop {
            let selection = self.ui.select_rater(&self.config.rater_names)?;
            match selection.resolve() {
                Ok(rater) => {
                    info!("👤 评分人: {}", rater);
                    return Ok(rater);
                }
                Err(e) => self.ui.show_warning(&e.to_string()),
            }
        }
    }

    async fn open_session(&self, rater: RaterId) -> Result<Session> {
        match self.orchestrator.open(rater)? {
            Opening::Ready(session) => Ok(session),
            Opening::Recovery(offer) => {
                let choice = self.ui.offer_recovery(&offer)?;
                let (session, checkpoint) = self.orchestrator.resume(offer, choice).await?;
                if let Some(checkpoint) = checkpoint {
                    self.ui.show_checkpoint(&checkpoint);
                }
                Ok(session)
            }
        }
    }
}
