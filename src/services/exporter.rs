//! 结果导出 - 业务能力层
//!
//! 批次结束或全部完成时，把当前全部评分记录写成一个新的带时间戳的 CSV 文件。
//! 导出文件从不覆盖，同一秒内重复导出时追加序号。

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{RaterId, ScoreRecord};
use crate::services::session_store::records_to_csv;

/// 结果导出服务
#[derive(Debug, Clone)]
pub struct ResultExporter {
    output_dir: PathBuf,
}

impl ResultExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 导出评分快照，返回新文件路径
    pub fn export(&self, rater: &RaterId, records: &[ScoreRecord]) -> AppResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| AppError::write_failed(&self.output_dir, e))?;

        let bytes = records_to_csv(records)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let stem = format!("{}_scores_{}", rater.file_stem(), stamp);

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{}.csv", stem)
            } else {
                format!("{}_{}.csv", stem, attempt)
            };
            let path = self.output_dir.join(name);
            attempt += 1;

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(AppError::write_failed(&path, e)),
            };
            file.write_all(&bytes)
                .and_then(|_| file.sync_all())
                .map_err(|e| AppError::write_failed(&path, e))?;

            info!("💾 已导出 {} 条评分记录: {}", records.len(), path.display());
            return Ok(path);
        }
    }
}
