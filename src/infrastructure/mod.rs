//! 基础设施层
//!
//! 持有外部资源（图片目录、邮件中继），只暴露能力，不认识会话流程

pub mod catalog;
pub mod smtp_relay;

pub use catalog::ImageCatalog;
pub use smtp_relay::SmtpRelay;
