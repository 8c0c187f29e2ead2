//! 打乱顺序规划 - 业务能力层
//!
//! 为每个评分人生成图片的随机评分顺序，恢复会话时尽量沿用原顺序

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::models::ScoreRecord;

/// 打乱顺序规划器
#[derive(Debug, Clone, Default)]
pub struct ShufflePlanner {
    seed: Option<u64>,
}

impl ShufflePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用固定种子，保证同一种子得到同一顺序
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// 规划评分顺序
    ///
    /// 已有顺序且长度与目录一致时原样返回，否则重新打乱整个目录。
    pub fn plan(&self, previous: Option<&[String]>, catalog: &[String]) -> Vec<String> {
        plan_with_rng(previous, catalog, &mut self.rng())
    }

    /// 恢复会话时重建评分顺序
    ///
    /// 1. 持久化的顺序是当前目录的一个排列，且前 K 项正是已评分的 K 张图片：直接沿用
    /// 2. 否则已评分图片按记录顺序在前，其余图片打乱在后
    ///
    /// 评分记录与目录不一致（图片已移除或重复）时返回 `None`，无法恢复
    pub fn recover(
        &self,
        persisted: Option<Vec<String>>,
        scored: &[ScoreRecord],
        catalog: &[String],
    ) -> Option<Vec<String>> {
        if !records_match_catalog(scored, catalog) {
            warn!("⚠️ 部分已评分图片不在当前目录中，无法恢复评分顺序");
            return None;
        }

        if let Some(order) = persisted {
            if is_permutation_of(&order, catalog)
                && order.iter().zip(scored).all(|(img, rec)| *img == rec.image)
            {
                debug!("沿用已保存的评分顺序 ({} 张)", order.len());
                return Some(order);
            }
            warn!("已保存的评分顺序与目录或评分记录不一致，重新构建");
        }

        let seen: HashSet<&str> = scored.iter().map(|rec| rec.image.as_str()).collect();
        let mut remainder: Vec<String> = catalog
            .iter()
            .filter(|img| !seen.contains(img.as_str()))
            .cloned()
            .collect();
        remainder.shuffle(&mut self.rng());

        let mut order: Vec<String> = scored.iter().map(|rec| rec.image.clone()).collect();
        order.extend(remainder);
        Some(order)
    }
}

/// 已评分图片是否都在当前目录中且互不重复
pub fn records_match_catalog(scored: &[ScoreRecord], catalog: &[String]) -> bool {
    let catalog_set: HashSet<&str> = catalog.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    scored
        .iter()
        .all(|rec| catalog_set.contains(rec.image.as_str()) && seen.insert(rec.image.as_str()))
}

/// 使用指定随机源规划评分顺序
pub fn plan_with_rng<R: Rng + ?Sized>(
    previous: Option<&[String]>,
    catalog: &[String],
    rng: &mut R,
) -> Vec<String> {
    if let Some(order) = previous {
        if !order.is_empty() && order.len() == catalog.len() {
            return order.to_vec();
        }
    }

    let mut order = catalog.to_vec();
    order.shuffle(rng);
    order
}

fn is_permutation_of(order: &[String], catalog: &[String]) -> bool {
    if order.len() != catalog.len() {
        return false;
    }
    let a: HashSet<&str> = order.iter().map(String::as_str).collect();
    let b: HashSet<&str> = catalog.iter().map(String::as_str).collect();
    a.len() == order.len() && a == b
}
