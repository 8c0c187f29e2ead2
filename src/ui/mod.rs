//! 评分界面
//!
//! 只负责展示和收集评分人输入，所有状态迁移都交给编排层

pub mod terminal;

pub use terminal::TerminalUi;
