//! 评分会话
//!
//! 封装"谁在评分、按什么顺序、评到第几张、当前批次"这一组状态。
//! 所有操作都显式接收会话引用，不存在隐式的全局会话状态。

use std::fmt::Display;

use crate::error::{AppError, AppResult};
use crate::models::{BatchOption, RaterId, Score, ScoreRecord};
use crate::services::SessionStore;
use crate::workflow::batch_controller::{BatchController, Boundary, Phase};

/// 评分会话
#[derive(Debug, Clone)]
pub struct Session {
    rater: RaterId,
    order: Vec<String>,
    records: Vec<ScoreRecord>,
    controller: BatchController,
}

impl Session {
    /// 创建会话
    ///
    /// 记录数不能超过评分顺序长度
    pub fn new(rater: RaterId, order: Vec<String>, records: Vec<ScoreRecord>) -> AppResult<Self> {
        if records.len() > order.len() {
            return Err(AppError::CacheReadFailure {
                path: rater.to_string(),
                reason: format!(
                    "评分记录 ({}) 多于图片总数 ({})",
                    records.len(),
                    order.len()
                ),
            });
        }
        Ok(Self {
            rater,
            order,
            records,
            controller: BatchController::new(),
        })
    }

    pub fn rater(&self) -> &RaterId {
        &self.rater
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// 评分游标
    pub fn cursor(&self) -> usize {
        self.records.len()
    }

    pub fn total(&self) -> usize {
        self.order.len()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase(self.cursor(), self.total())
    }

    pub fn controller(&self) -> &BatchController {
        &self.controller
    }

    /// 下一张待评分图片
    pub fn next_image(&self) -> Option<&str> {
        self.order.get(self.cursor()).map(String::as_str)
    }

    /// 当前批次结束位置
    pub fn batch_end(&self) -> usize {
        self.controller.window().end(self.total())
    }

    pub fn batch_menu(&self) -> Vec<BatchOption> {
        BatchController::menu(self.cursor(), self.total())
    }

    /// 进度（0.0 - 1.0）
    pub fn progress(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.cursor() as f64 / self.total() as f64
        }
    }

    pub fn choose_batch(&mut self, size: usize) -> AppResult<()> {
        let (cursor, total) = (self.cursor(), self.total());
        self.controller.open_batch(cursor, total, size)
    }

    pub fn another_batch(&mut self) -> AppResult<()> {
        let (cursor, total) = (self.cursor(), self.total());
        self.controller.another_batch(cursor, total)
    }

    pub fn stop(&mut self) -> AppResult<()> {
        let (cursor, total) = (self.cursor(), self.total());
        self.controller.stop(cursor, total)
    }

    /// 为下一张图片记录评分：追加记录、写缓存、游标前进
    ///
    /// 只能在批次进行中调用；缓存写入失败时会话保持不变
    pub fn record(&mut self, store: &SessionStore, score: Score) -> AppResult<(ScoreRecord, Boundary)> {
        if self.phase() != Phase::InBatch {
            return Err(AppError::InvalidAction(format!(
                "评分 (当前阶段: {:?})",
                self.phase()
            )));
        }

        let image = self
            .next_image()
            .ok_or_else(|| AppError::InvalidAction("没有待评分的图片".to_string()))?
            .to_string();
        let record = ScoreRecord::now(image, score);

        store.append(&self.rater, &mut self.records, record.clone())?;

        let boundary = self
            .controller
            .boundary_after_score(self.cursor(), self.total());
        Ok((record, boundary))
    }
}

impl Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[评分人 {} 进度 {}/{}]",
            self.rater,
            self.cursor(),
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(dir: &std::path::Path, total: usize) -> (Session, SessionStore) {
        let order = (0..total).map(|i| format!("{}.png", i)).collect();
        let rater = RaterId::parse("Helen").unwrap();
        (
            Session::new(rater, order, Vec::new()).unwrap(),
            SessionStore::new(dir),
        )
    }

    #[test]
    fn test_record_advances_cursor_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (mut s, store) = session(dir.path(), 3);
        s.choose_batch(5).unwrap();

        let (rec, boundary) = s.record(&store, Score::Two).unwrap();
        assert_eq!(rec.image, "0.png");
        assert_eq!(rec.score, Score::Two);
        assert_eq!(boundary, Boundary::None);
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.next_image(), Some("1.png"));
    }

    #[test]
    fn test_record_rejected_before_batch_chosen() {
        let dir = tempfile::tempdir().unwrap();
        let (mut s, store) = session(dir.path(), 3);
        assert!(matches!(
            s.record(&store, Score::One),
            Err(AppError::InvalidAction(_))
        ));
        assert_eq!(s.cursor(), 0);
        assert!(!store.exists(s.rater()));
    }

    #[test]
    fn test_too_many_records_rejected() {
        let rater = RaterId::parse("Helen").unwrap();
        let records = vec![
            ScoreRecord::now("a.png", Score::One),
            ScoreRecord::now("b.png", Score::One),
        ];
        assert!(Session::new(rater, vec!["a.png".to_string()], records).is_err());
    }

    #[test]
    fn test_progress() {
        let dir = tempfile::tempdir().unwrap();
        let (mut s, store) = session(dir.path(), 4);
        assert_eq!(s.progress(), 0.0);
        s.choose_batch(50).unwrap();
        s.record(&store, Score::Zero).unwrap();
        assert!((s.progress() - 0.25).abs() < f64::EPSILON);

        let (empty, _) = session(dir.path(), 0);
        assert_eq!(empty.progress(), 0.0);
        assert_eq!(empty.phase(), Phase::SessionComplete);
    }
}
