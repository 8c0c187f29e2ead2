/// 批次大小菜单中的固定选项
pub const BATCH_SIZE_OPTIONS: [usize; 5] = [5, 50, 100, 150, 200];

/// 批次结束后 "再来一批" 的固定大小
pub const FOLLOW_UP_BATCH_SIZE: usize = 50;

/// 当前批次窗口
///
/// `size == 0` 表示尚未选择批次大小，需要提示评分人选择。
/// 批次窗口不持久化，恢复会话后总是重新选择。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchWindow {
    pub start: usize,
    pub size: usize,
}

impl BatchWindow {
    pub fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    pub fn is_chosen(&self) -> bool {
        self.size > 0
    }

    /// 批次结束位置，超过总数时截断
    pub fn end(&self, total: usize) -> usize {
        self.start.saturating_add(self.size).min(total)
    }
}

/// 批次大小菜单项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOption {
    Fixed(usize),
    /// 剩余全部
    AllRemaining(usize),
}

impl BatchOption {
    pub fn size(self) -> usize {
        match self {
            BatchOption::Fixed(n) | BatchOption::AllRemaining(n) => n,
        }
    }

    pub fn label(self) -> String {
        match self {
            BatchOption::Fixed(n) => n.to_string(),
            BatchOption::AllRemaining(n) => format!("All ({})", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_is_clamped_to_total() {
        assert_eq!(BatchWindow::new(0, 50).end(120), 50);
        assert_eq!(BatchWindow::new(100, 50).end(120), 120);
        assert_eq!(BatchWindow::new(0, 200).end(3), 3);
    }

    #[test]
    fn test_labels() {
        assert_eq!(BatchOption::Fixed(5).label(), "5");
        assert_eq!(BatchOption::AllRemaining(17).label(), "All (17)");
    }
}
