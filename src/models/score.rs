use serde::{Deserialize, Serialize};
use std::fmt;

/// 评分取值（0-6 共七档）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Score {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
}

impl Score {
    /// 按按钮顺序排列的全部评分
    pub const ALL: [Score; 7] = [
        Score::Zero,
        Score::One,
        Score::Two,
        Score::Three,
        Score::Four,
        Score::Five,
        Score::Six,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// 从整数解析评分
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// 按钮显示文本
    pub fn label(self) -> &'static str {
        match self {
            Score::Zero => "0 🍃",
            Score::One => "1 🌱",
            Score::Two => "2 🌸",
            Score::Three => "3 🌞",
            Score::Four => "4 🔥",
            Score::Five => "5 💥",
            Score::Six => "6 🌋",
        }
    }
}

impl TryFrom<u8> for Score {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::from_value(value).ok_or_else(|| format!("评分超出范围 [0, 6]: {}", value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// 单条评分记录，对应缓存/导出文件中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub image: String,
    pub score: Score,
    pub timestamp: String,
}

impl ScoreRecord {
    /// 以当前本地时间创建记录
    pub fn now(image: impl Into<String>, score: Score) -> Self {
        Self {
            image: image.into(),
            score,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_button_maps_to_its_value() {
        for (i, score) in Score::ALL.iter().enumerate() {
            assert_eq!(score.value() as usize, i);
            assert!(score.label().starts_with(&i.to_string()));
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Score::from_value(7).is_none());
        assert!(Score::try_from(255u8).is_err());
    }

    #[test]
    fn test_timestamp_format() {
        let record = ScoreRecord::now("a.png", Score::Three);
        // 2024-01-01 12:00:00
        assert_eq!(record.timestamp.len(), 19);
        assert_eq!(&record.timestamp[4..5], "-");
        assert_eq!(&record.timestamp[10..11], " ");
    }
}
