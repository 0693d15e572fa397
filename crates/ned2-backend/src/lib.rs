//! # Ned2 Backend Layer
//!
//! [`ArmController`](ned2_api::ArmController) 的具体实现。
//!
//! 当前提供进程内模拟器 [`SimArmController`]：工作线程执行异步请求并
//! 从自己的线程调用完成回调，复现厂商会话"回调到达于 SDK 线程"的
//! 契约。真实厂商传输在本仓库范围之外，trait 即接入缝。

pub mod sim;

pub use sim::{SimArmController, SimConfig};
