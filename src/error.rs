use thiserror::Error;

/// 应用程序错误类型
///
/// 按处理策略分两类：
/// - 会话无法建立时的错误（目录缺失、缓存写入失败）直接向上传播
/// - 评分已记录之后的错误（导出、通知）只作为警告展示，不影响已记录的数据
#[derive(Debug, Error)]
pub enum AppError {
    /// 图片目录不存在
    #[error("图片目录不存在: {path}")]
    CatalogUnavailable { path: String },

    /// 会话缓存存在但无法读取（按全新会话处理，不会向上传播）
    #[error("会话缓存无法读取 ({path}): {reason}")]
    CacheReadFailure { path: String, reason: String },

    /// 通知发送失败
    #[error("通知发送失败: {reason}")]
    NotificationDeliveryFailure { reason: String },

    /// 评分人名称为空
    #[error("评分人名称不能为空")]
    InvalidRaterIdentity,

    /// 当前阶段不允许的操作
    #[error("当前阶段不允许该操作: {0}")]
    InvalidAction(String),

    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 删除文件失败
    #[error("删除文件失败 ({path}): {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    #[error("CSV 处理失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 处理失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建通知发送失败错误
    pub fn delivery_failed(reason: impl std::fmt::Display) -> Self {
        AppError::NotificationDeliveryFailure {
            reason: reason.to_string(),
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: &std::path::Path, source: std::io::Error) -> Self {
        AppError::WriteFailed {
            path: path.display().to_string(),
            source,
        }
    }

    /// 创建文件删除错误
    pub fn delete_failed(path: &std::path::Path, source: std::io::Error) -> Self {
        AppError::DeleteFailed {
            path: path.display().to_string(),
            source,
        }
    }

    /// 是否属于可降级处理的错误（只提示，不中断会话）
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::CacheReadFailure { .. }
                | AppError::NotificationDeliveryFailure { .. }
                | AppError::InvalidRaterIdentity
                | AppError::InvalidAction(_)
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(AppError::InvalidRaterIdentity.is_recoverable());
        assert!(AppError::delivery_failed("timeout").is_recoverable());
        assert!(!AppError::CatalogUnavailable {
            path: "raw_img".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_display_contains_path() {
        let err = AppError::CatalogUnavailable {
            path: "raw_img".to_string(),
        };
        assert!(err.to_string().contains("raw_img"));
    }
}
