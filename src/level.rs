use crate::error::LevelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 无法识别的级别名称对应的哨兵值，保证落在 [0, 5] 之外
pub const INVALID_LEVEL: i64 = -1;

/// 未设置或设置非法时使用的级别（info）
pub const DEFAULT_LEVEL: Severity = Severity::Info;

/// 日志级别
///
/// rank 越小越严重，越不容易被过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 错误
    Error = 0,
    /// 一般信息
    Info = 1,
    /// 解析器输出
    Parser = 2,
    /// cf 输出
    Cf = 3,
    /// 形态分析输出
    Morph = 4,
    /// 调试信息
    Debug = 5,
}

impl Severity {
    /// 所有级别，按 rank 升序
    pub const ALL: [Severity; 6] = [
        Severity::Error,
        Severity::Info,
        Severity::Parser,
        Severity::Cf,
        Severity::Morph,
        Severity::Debug,
    ];

    pub fn rank(self) -> i64 {
        self as i64
    }

    pub fn from_rank(rank: i64) -> Option<Severity> {
        if !valid_level(rank) {
            return None;
        }
        Some(Self::ALL[rank as usize])
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Parser => "parser",
            Severity::Cf => "cf",
            Severity::Morph => "morph",
            Severity::Debug => "debug",
        }
    }
}

impl FromStr for Severity {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|severity| severity.name() == lower)
            .ok_or_else(|| LevelError::UnknownLevel(s.to_string()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 设置阈值时调用方给出的原始值：数字 rank 或级别名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Rank(i64),
    Name(String),
}

impl LevelSpec {
    /// 解析环境变量中的值
    ///
    /// 能解析为整数的按 rank 处理，其余按名称处理
    pub fn parse_env(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(rank) => LevelSpec::Rank(rank),
            Err(_) => LevelSpec::Name(trimmed.to_string()),
        }
    }

    /// 归一化为 rank，未知名称返回 [`INVALID_LEVEL`]
    pub fn normalized(&self) -> i64 {
        normalized_level(self)
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSpec::Rank(rank) => write!(f, "{}", rank),
            LevelSpec::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for LevelSpec {
    fn from(rank: i64) -> Self {
        LevelSpec::Rank(rank)
    }
}

impl From<i32> for LevelSpec {
    fn from(rank: i32) -> Self {
        LevelSpec::Rank(rank as i64)
    }
}

impl From<usize> for LevelSpec {
    fn from(rank: usize) -> Self {
        LevelSpec::Rank(i64::try_from(rank).unwrap_or(i64::MAX))
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}

impl From<Severity> for LevelSpec {
    fn from(severity: Severity) -> Self {
        LevelSpec::Rank(severity.rank())
    }
}

/// 将级别值归一化为 rank
///
/// 数字原样返回（合法性由 [`valid_level`] 判断），名称按精确匹配查找
pub fn normalized_level(spec: &LevelSpec) -> i64 {
    match spec {
        LevelSpec::Rank(rank) => *rank,
        LevelSpec::Name(name) => Severity::ALL
            .iter()
            .find(|severity| severity.name() == name)
            .map_or(INVALID_LEVEL, |severity| severity.rank()),
    }
}

/// 合法 rank 为闭区间 [0, 5]
pub fn valid_level(rank: i64) -> bool {
    (0..=5).contains(&rank)
}
