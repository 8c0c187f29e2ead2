use anyhow::{Context, Result};
/// 日志工具模块
///
/// 终端留给评分界面，日志统一写入日志文件
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::RaterId;

/// 初始化日志
///
/// # 参数
/// - `log_file_path`: 日志文件路径（追加写入）
/// - `verbose`: 未设置 `RUST_LOG` 时是否输出 debug 日志
pub fn init(log_file_path: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）时忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `image_dir`: 图片目录
/// - `output_dir`: 输出目录
pub fn log_startup(image_dir: &Path, output_dir: &Path) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - gScorer ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📁 图片目录: {}", image_dir.display());
    info!("💾 输出目录: {}", output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_closed(rater: &RaterId, scored: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ {} 的本批评分完成: 已评 {}/{}", rater, scored, total);
    info!("{}", "─".repeat(60));
}

/// 记录全部完成信息
pub fn log_session_complete(rater: &RaterId, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 {} 已完成全部 {} 张图片的评分", rater, total);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("abcdefgh", 3), "abc...");
        assert_eq!(truncate_text("图片评分工具", 2), "图片...");
    }

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gscorer.log");
        init(&path, false).unwrap();
        assert!(path.exists());
    }
}
