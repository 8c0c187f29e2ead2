//! 会话缓存 - 业务能力层
//!
//! 每个评分人一份持久化缓存：
//! - `{rater}_scores_tmp.csv`：全部评分记录，每次评分后整体重写
//! - `{rater}_order_tmp.json`：评分顺序，会话开始时写入
//!
//! 缓存损坏或无法读取时只记录警告，按"没有可恢复的会话"处理。

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{RaterId, ScoreRecord};

/// 从缓存中恢复出的会话数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSession {
    pub records: Vec<ScoreRecord>,
    /// 已保存的评分顺序（旧版本缓存没有）
    pub order: Option<Vec<String>>,
}

impl CachedSession {
    /// 评分游标，等于记录条数
    pub fn cursor(&self) -> usize {
        self.records.len()
    }
}

/// 会话缓存
#[derive(Debug, Clone)]
pub struct SessionStore {
    output_dir: PathBuf,
}

impl SessionStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn cache_path(&self, rater: &RaterId) -> PathBuf {
        self.output_dir
            .join(format!("{}_scores_tmp.csv", rater.file_stem()))
    }

    pub fn order_path(&self, rater: &RaterId) -> PathBuf {
        self.output_dir
            .join(format!("{}_order_tmp.json", rater.file_stem()))
    }

    /// 读取缓存
    ///
    /// 缓存不存在、为空或损坏时返回 `None`
    pub fn load(&self, rater: &RaterId) -> Option<CachedSession> {
        if !self.exists(rater) {
            return None;
        }

        let path = self.cache_path(rater);
        let records = match read_records(&path) {
            Ok(records) => records,
            Err(e) => {
                warn!("⚠️ {}，按全新会话处理", e);
                return None;
            }
        };

        if records.is_empty() {
            debug!("缓存 {} 中没有评分记录", path.display());
            return None;
        }

        let order = self.load_order(rater);
        info!(
            "✓ 找到 {} 的会话缓存: {} 条评分记录",
            rater,
            records.len()
        );

        Some(CachedSession { records, order })
    }

    fn load_order(&self, rater: &RaterId) -> Option<Vec<String>> {
        let path = self.order_path(rater);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(order) => Some(order),
            Err(e) => {
                warn!("评分顺序文件 {} 无法解析: {}", path.display(), e);
                None
            }
        }
    }

    /// 追加一条评分记录并整体重写缓存
    ///
    /// 写入失败时撤销内存中的追加，保证内存与缓存一致
    pub fn append(
        &self,
        rater: &RaterId,
        records: &mut Vec<ScoreRecord>,
        record: ScoreRecord,
    ) -> AppResult<()> {
        records.push(record);
        if let Err(e) = self.write_cache(rater, records) {
            records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// 保存评分顺序
    pub fn save_order(&self, rater: &RaterId, order: &[String]) -> AppResult<()> {
        let path = self.order_path(rater);
        let json = serde_json::to_string_pretty(order)?;
        write_atomically(&path, json.as_bytes())
    }

    /// 删除缓存（评分全部完成或评分人放弃旧会话）
    pub fn discard(&self, rater: &RaterId) -> AppResult<()> {
        for path in [self.cache_path(rater), self.order_path(rater)] {
            match fs::remove_file(&path) {
                Ok(()) => debug!("已删除 {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(AppError::delete_failed(&path, e)),
            }
        }
        info!("🗑️ 已清除 {} 的会话缓存", rater);
        Ok(())
    }

    pub fn exists(&self, rater: &RaterId) -> bool {
        self.cache_path(rater).exists()
    }

    fn write_cache(&self, rater: &RaterId, records: &[ScoreRecord]) -> AppResult<()> {
        let path = self.cache_path(rater);
        let bytes = records_to_csv(records)?;
        write_atomically(&path, &bytes)
    }
}

/// 读取 CSV 评分记录
pub fn read_records(path: &Path) -> AppResult<Vec<ScoreRecord>> {
    let failure = |reason: String| AppError::CacheReadFailure {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path).map_err(|e| failure(e.to_string()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<ScoreRecord>, _>>()
        .map_err(|e| failure(e.to_string()))
}

/// 把评分记录序列化为带表头的 CSV
pub fn records_to_csv(records: &[ScoreRecord]) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // 记录为空时 serde 不会输出表头，这里统一手动写
    writer.write_record(["image", "score", "timestamp"])?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

/// 先写临时文件再重命名，避免中途崩溃留下半截文件
fn write_atomically(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::write_failed(parent, e))?;
    }

    let tmp = path.with_extension("partial");
    fs::write(&tmp, bytes).map_err(|e| AppError::write_failed(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| AppError::write_failed(path, e))?;
    Ok(())
}
