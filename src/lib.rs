//! # gScorer
//!
//! 图片评分工具：评分人按随机顺序逐张为图片打分（0-6），分批进行，
//! 每次评分后自动缓存进度，批次结束和全部完成时导出结果并发送邮件。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 图片目录（只读列出）、SMTP 邮件中继
//!
//! ### ② 业务能力层（Services）
//! - `ShufflePlanner` - 评分顺序规划与恢复
//! - `SessionStore` - 每个评分人的持久化缓存
//! - `ResultExporter` - 带时间戳的结果导出
//! - `Notifier` - 结果通知能力
//!
//! ### ③ 流程层（Workflow）
//! - `Session` - 显式的会话对象
//! - `BatchController` - 批次状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `SessionOrchestrator` - 处理评分人操作，执行边界检查点
//! - `App` - 终端交互循环
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod ui;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ImageCatalog;
pub use models::{RaterId, Score, ScoreRecord};
pub use orchestrator::{App, RaterAction, RecoveryChoice, SessionOrchestrator};
pub use workflow::{Phase, Session};
