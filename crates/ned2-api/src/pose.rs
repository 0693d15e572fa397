//! 位姿类型与解析/格式化
//!
//! `Pose` 以基座坐标系表示工具点：位置 (x, y, z) 加姿态 (roll, pitch, yaw)。
//! 与 6 元素数组可互换，便于持久化为 name → 6-tuple 的映射。

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

/// 浮点数字面量模式：可选符号、整数/小数位、可选指数
const FLOAT_PATTERN: &str = r"-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?";

fn float_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 字面量模式，编译不会失败
    RE.get_or_init(|| Regex::new(FLOAT_PATTERN).expect("float pattern is a valid regex"))
}

/// 位姿解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoseParseError {
    /// 序列元素不足 6 个
    #[error("pose needs 6 elements, got {got}")]
    TooFewElements { got: usize },

    /// 自由文本中数字个数不是 6
    #[error("input must contain exactly six numbers, found {found}")]
    NumberCount { found: usize },

    /// 匹配出的片段无法按 f64 解析
    #[error("invalid number {text:?}")]
    InvalidNumber { text: String },
}

/// 机械臂工具点位姿
///
/// 构造后不可变；所有分量单位遵循厂商约定（位置 m，姿态 rad）。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            x,
            y,
            z,
            roll,
            pitch,
            yaw,
        }
    }

    /// 从有序数值序列按位构造 (x, y, z, roll, pitch, yaw)
    ///
    /// 只消费前 6 个元素；不足 6 个返回 [`PoseParseError::TooFewElements`]。
    pub fn from_list(values: &[f64]) -> Result<Self, PoseParseError> {
        if values.len() < 6 {
            return Err(PoseParseError::TooFewElements { got: values.len() });
        }
        Ok(Self::new(
            values[0], values[1], values[2], values[3], values[4], values[5],
        ))
    }

    /// 转回有序 6 元素数组，与 [`Pose::from_list`] 互逆
    pub fn to_list(&self) -> [f64; 6] {
        [self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
    }

    /// 从自由文本提取位姿
    ///
    /// 提取文本中所有浮点数字面量，恰好 6 个时按 [`Pose::from_list`]
    /// 的顺序构造。用户粘贴方括号列表或 `Pose(x=…)` 显示串都能还原
    /// 同样的 6 个数。
    pub fn parse_text(input: &str) -> Result<Self, PoseParseError> {
        let mut values = Vec::with_capacity(6);
        for m in float_regex().find_iter(input) {
            let text = m.as_str();
            let value: f64 = text.parse().map_err(|_| {
                warn!(text, "pose fragment did not parse as f64");
                PoseParseError::InvalidNumber {
                    text: text.to_string(),
                }
            })?;
            values.push(value);
        }
        if values.len() != 6 {
            return Err(PoseParseError::NumberCount {
                found: values.len(),
            });
        }
        Self::from_list(&values)
    }

    /// 格式化可缺省位姿；缺省渲染为字面量 `None`
    pub fn display_opt(pose: Option<&Pose>) -> String {
        match pose {
            Some(p) => p.to_string(),
            None => "None".to_string(),
        }
    }
}

impl From<[f64; 6]> for Pose {
    fn from(values: [f64; 6]) -> Self {
        Self::new(
            values[0], values[1], values[2], values[3], values[4], values[5],
        )
    }
}

impl From<Pose> for [f64; 6] {
    fn from(pose: Pose) -> Self {
        pose.to_list()
    }
}

impl fmt::Display for Pose {
    /// 位置 4 位小数，姿态 3 位小数
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pose(x={:.4}, y={:.4}, z={:.4}, roll={:.3}, pitch={:.3}, yaw={:.3})",
            self.x, self.y, self.z, self.roll, self.pitch, self.yaw
        )
    }
}
