//! 命令结果与硬件状态

use std::fmt;

/// 厂商约定的成功状态码
pub const CMD_STATUS_SUCCESS: i32 = 1;

/// 单次 setup/motion 调用的结果对象
///
/// 每次请求恰好产生一个结果，由匹配的回调消费一次。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandResult {
    /// 状态码，`1` 表示成功
    pub status: i32,
    /// 人类可读的结果描述
    pub message: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: CMD_STATUS_SUCCESS,
            message: message.into(),
        }
    }

    pub fn failure(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CMD_STATUS_SUCCESS
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

/// 机械臂硬件状态快照
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardwareStatus {
    /// 与控制端点的链路是否在线
    pub connection_up: bool,
    /// 是否需要标定
    pub calibration_needed: bool,
    /// 标定是否进行中
    pub calibration_in_progress: bool,
    /// 当前装载的末端工具
    pub active_tool: Option<String>,
}

impl fmt::Display for HardwareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "connection={}, calibration_needed={}, calibration_in_progress={}, tool={}",
            if self.connection_up { "up" } else { "down" },
            self.calibration_needed,
            self.calibration_in_progress,
            self.active_tool.as_deref().unwrap_or("none"),
        )
    }
}
