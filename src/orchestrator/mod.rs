//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `session_orchestrator` - 会话编排器
//! - 打开会话、处理恢复提议
//! - 每个评分人操作触发一次状态迁移
//! - 跨越批次/完成边界时导出并通知，且只执行一次
//!
//! ### `app` - 应用入口
//! - 持有配置、编排器和终端界面
//! - 循环读取评分人操作，交给编排器处理
//!
//! ## 层次关系
//!
//! ```text
//! app (终端交互循环)
//!     ↓
//! session_orchestrator (处理单个操作)
//!     ↓
//! workflow::Session / BatchController (状态机)
//!     ↓
//! services (能力层：shuffle / store / export / notify)
//!     ↓
//! infrastructure (基础设施：图片目录、邮件中继)
//! ```

pub mod app;
pub mod session_orchestrator;

// 重新导出主要类型
pub use app::App;
pub use session_orchestrator::{
    Checkpoint, Delivery, Opening, Outcome, RaterAction, RecoveryChoice, RecoveryOffer, Screen,
    SessionOrchestrator, SessionView,
};
