//! 门面层错误类型定义
//!
//! 运动调用的三类去向（离线/超时/设备拒绝）以命名枚举区分，
//! 不再折叠成单个布尔值；调用方想折叠随时可以。

use std::time::Duration;

use ned2_api::ApiError;
use thiserror::Error;

/// 运动或直通命令失败
#[derive(Error, Debug)]
pub enum MotionError {
    /// 未连接；命令未接触硬件
    #[error("robot is offline")]
    Offline,

    /// 完成信号未在超时内到达；请求未被取消，会话仍然在线
    #[error("motion did not complete within {0:?}")]
    Timeout(Duration),

    /// 设备通过失败回调报告了失败；会话仍然在线
    #[error("robot reported failure: {0}")]
    Rejected(String),

    /// 会话层错误（下发请求本身失败）
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// 单个 setup 调用（标定或工具更新）的失败方式
#[derive(Error, Debug)]
pub enum SetupFailure {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// `open()` 失败：任一 setup 调用失败即中止并释放句柄
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("calibration failed: {0}")]
    Calibration(SetupFailure),

    #[error("tool update failed: {0}")]
    ToolUpdate(SetupFailure),
}
