//! # Ned2 Client
//!
//! Ned2 机械臂的同步门面。
//!
//! 厂商会话的原生习惯是异步回调：发出请求后，稍后在会话线程上
//! 恰好调用成功/失败回调之一。本 crate 把它桥接为带超时的阻塞
//! 调用：
//!
//! - [`rendezvous::CallGate`]: 回调线程与等待线程的会合原语
//!   （互斥量 + 条件变量 + 代号计数器，迟到/重复通知被丢弃）
//! - [`Ned2`]: 状态机门面（Disconnected/Online），`open` 内完成
//!   标定与工具装载，运动失败不摧毁会话
//!
//! # 使用场景
//!
//! CLI 与示例脚本只通过 [`Ned2`] 的能力接口访问机械臂，
//! 原始会话句柄不出门面。

pub mod error;
pub mod facade;
pub mod rendezvous;

// 重新导出常用类型
pub use error::{MotionError, SetupError, SetupFailure};
pub use facade::{Ned2, Ned2Config};
pub use rendezvous::{CallGate, Ticket, WaitOutcome};
