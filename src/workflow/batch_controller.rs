//! 批次控制器 - 流程层
//!
//! 状态机：NeedsBatchSize → InBatch → BatchClosed → (InBatch | NeedsBatchSize) …→ SessionComplete
//!
//! 阶段完全由 (游标, 总数, 批次窗口) 推导，控制器本身只保存批次窗口。
//! 副作用（导出、通知）不在这里执行，由编排层在跨越边界时执行一次。

use crate::error::{AppError, AppResult};
use crate::models::{BatchOption, BatchWindow, BATCH_SIZE_OPTIONS, FOLLOW_UP_BATCH_SIZE};

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 需要选择批次大小
    NeedsBatchSize,
    /// 批次进行中
    InBatch,
    /// 批次已结束，等待评分人选择继续或停止
    BatchClosed,
    /// 全部图片已评分（终态）
    SessionComplete,
}

/// 一次评分后跨越的边界
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// 未跨越边界
    None,
    BatchClosed,
    SessionComplete,
}

/// 批次控制器
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchController {
    window: BatchWindow,
    /// 评分人在批次结束后选择了停止
    paused: bool,
}

impl BatchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> BatchWindow {
        self.window
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// 推导当前阶段
    pub fn phase(&self, cursor: usize, total: usize) -> Phase {
        if cursor >= total {
            Phase::SessionComplete
        } else if !self.window.is_chosen() {
            Phase::NeedsBatchSize
        } else if cursor < self.window.end(total) {
            Phase::InBatch
        } else {
            Phase::BatchClosed
        }
    }

    /// 批次大小菜单
    ///
    /// 固定选项之外追加 "剩余全部"；没有剩余图片时不提供任何选项
    pub fn menu(cursor: usize, total: usize) -> Vec<BatchOption> {
        let remaining = total.saturating_sub(cursor);
        if remaining == 0 {
            return Vec::new();
        }
        BATCH_SIZE_OPTIONS
            .iter()
            .map(|&n| BatchOption::Fixed(n))
            .chain(std::iter::once(BatchOption::AllRemaining(remaining)))
            .collect()
    }

    /// 选择批次大小，开始新批次
    pub fn open_batch(&mut self, cursor: usize, total: usize, size: usize) -> AppResult<()> {
        self.expect_phase(cursor, total, Phase::NeedsBatchSize, "选择批次大小")?;
        if size == 0 {
            return Err(AppError::InvalidAction("批次大小必须大于 0".to_string()));
        }
        self.window = BatchWindow::new(cursor, size);
        self.paused = false;
        Ok(())
    }

    /// 评分后检查是否跨越边界（游标已经前进）
    pub fn boundary_after_score(&self, cursor: usize, total: usize) -> Boundary {
        match self.phase(cursor, total) {
            Phase::SessionComplete => Boundary::SessionComplete,
            Phase::BatchClosed => Boundary::BatchClosed,
            _ => Boundary::None,
        }
    }

    /// 批次结束后再来一批（固定 50 张）
    pub fn another_batch(&mut self, cursor: usize, total: usize) -> AppResult<()> {
        self.expect_phase(cursor, total, Phase::BatchClosed, "继续下一批")?;
        self.window = BatchWindow::new(cursor, FOLLOW_UP_BATCH_SIZE);
        Ok(())
    }

    /// 批次结束后停止，下次需要重新选择批次大小
    pub fn stop(&mut self, cursor: usize, total: usize) -> AppResult<()> {
        self.expect_phase(cursor, total, Phase::BatchClosed, "停止评分")?;
        self.window = BatchWindow::default();
        self.paused = true;
        Ok(())
    }

    fn expect_phase(&self, cursor: usize, total: usize, expected: Phase, action: &str) -> AppResult<()> {
        let actual = self.phase(cursor, total);
        if actual != expected {
            return Err(AppError::InvalidAction(format!(
                "{} (当前阶段: {:?})",
                action, actual
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_closes_exactly_at_bound() {
        let mut ctl = BatchController::new();
        ctl.open_batch(0, 120, 50).unwrap();

        assert_eq!(ctl.phase(49, 120), Phase::InBatch);
        assert_eq!(ctl.boundary_after_score(49, 120), Boundary::None);
        assert_eq!(ctl.boundary_after_score(50, 120), Boundary::BatchClosed);
        assert_eq!(ctl.phase(50, 120), Phase::BatchClosed);
    }

    #[test]
    fn test_last_batch_clamped_to_total_completes_session() {
        let mut ctl = BatchController::new();
        ctl.open_batch(100, 120, 50).unwrap();

        assert_eq!(ctl.phase(119, 120), Phase::InBatch);
        assert_eq!(ctl.boundary_after_score(119, 120), Boundary::None);
        assert_eq!(ctl.boundary_after_score(120, 120), Boundary::SessionComplete);
    }

    #[test]
    fn test_exhausted_exactly_at_batch_boundary() {
        let mut ctl = BatchController::new();
        ctl.open_batch(0, 5, 5).unwrap();
        assert_eq!(ctl.boundary_after_score(5, 5), Boundary::SessionComplete);
    }

    #[test]
    fn test_needs_batch_size_until_chosen() {
        let ctl = BatchController::new();
        assert_eq!(ctl.phase(0, 10), Phase::NeedsBatchSize);
        assert_eq!(ctl.phase(3, 10), Phase::NeedsBatchSize);
    }

    #[test]
    fn test_empty_catalog_is_complete() {
        let ctl = BatchController::new();
        assert_eq!(ctl.phase(0, 0), Phase::SessionComplete);
        assert!(BatchController::menu(0, 0).is_empty());
    }

    #[test]
    fn test_menu_includes_all_remaining() {
        let menu = BatchController::menu(30, 120);
        assert_eq!(menu.len(), 6);
        assert_eq!(menu[0], BatchOption::Fixed(5));
        assert_eq!(menu[5], BatchOption::AllRemaining(90));
    }

    #[test]
    fn test_another_batch_and_stop() {
        let mut ctl = BatchController::new();
        ctl.open_batch(0, 200, 5).unwrap();

        ctl.another_batch(5, 200).unwrap();
        assert_eq!(ctl.window(), BatchWindow::new(5, FOLLOW_UP_BATCH_SIZE));
        assert_eq!(ctl.phase(54, 200), Phase::InBatch);
        assert_eq!(ctl.phase(55, 200), Phase::BatchClosed);

        ctl.stop(55, 200).unwrap();
        assert!(ctl.is_paused());
        assert_eq!(ctl.phase(55, 200), Phase::NeedsBatchSize);

        ctl.open_batch(55, 200, 100).unwrap();
        assert!(!ctl.is_paused());
    }

    #[test]
    fn test_actions_rejected_in_wrong_phase() {
        let mut ctl = BatchController::new();
        assert!(ctl.another_batch(0, 10).is_err());
        assert!(ctl.stop(0, 10).is_err());
        assert!(ctl.open_batch(0, 10, 0).is_err());

        ctl.open_batch(0, 10, 5).unwrap();
        assert!(ctl.open_batch(2, 10, 5).is_err());
        assert_eq!(ctl.window(), BatchWindow::new(0, 5));
    }
}
