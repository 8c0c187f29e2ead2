use crate::error::{AppError, AppResult};
use std::fmt;

/// 评分人身份
///
/// 决定加载哪份会话缓存、导出文件归属于谁。会话期间不可变。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RaterId(String);

impl RaterId {
    /// 解析评分人名称（去除首尾空白，不能为空）
    pub fn parse(raw: &str) -> AppResult<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(AppError::InvalidRaterIdentity);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 用于文件名的安全形式
    ///
    /// ASCII 字母、数字和 `-` 原样保留，其余字节（包括 `_` 本身）编码为 `_XX`，
    /// 不同名称得到不同的文件名。
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.0.len());
        for byte in self.0.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                stem.push(char::from(byte));
            } else {
                stem.push_str(&format!("_{:02X}", byte));
            }
        }
        stem
    }
}

impl fmt::Display for RaterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 评分人菜单的选择结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaterSelection {
    /// 从固定菜单中选择
    Listed(String),
    /// 选择 "Others" 后手动输入
    Other(String),
}

impl RaterSelection {
    /// 菜单中 "其他" 选项的显示文本
    pub const OTHER_LABEL: &'static str = "Others (Please Specify)";

    pub fn resolve(&self) -> AppResult<RaterId> {
        match self {
            RaterSelection::Listed(name) | RaterSelection::Other(name) => RaterId::parse(name),
        }
    }
}
