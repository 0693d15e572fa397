//! # Ned2 API
//!
//! Ned2 机械臂远程控制 API 的类型定义（无传输依赖）
//!
//! ## 模块
//!
//! - `pose`: 位姿类型与解析/格式化
//! - `joints`: 关节配置类型
//! - `result`: 命令结果与硬件状态
//! - `controller`: 会话控制接口（异步回调契约）
//!
//! ## 回调契约
//!
//! 厂商 SDK 的原生习惯是"发出请求；稍后在 SDK 管理的线程上，
//! 恰好调用成功/失败两个回调之一"。本 crate 只固定这一契约，
//! 不关心底层传输；阻塞式门面见 `ned2-client`。

pub mod controller;
pub mod joints;
pub mod pose;
pub mod result;

// 重新导出常用类型
pub use controller::{ApiError, ArmController, DoneCallback};
pub use joints::JointArray;
pub use pose::{Pose, PoseParseError};
pub use result::{CMD_STATUS_SUCCESS, CommandResult, HardwareStatus};
