//! 会话控制接口
//!
//! 厂商远程控制会话的调用签名抽象。标定、工具更新与运动命令是
//! 异步的：发出请求后立即返回，稍后在会话自己的线程上恰好调用
//! 成功/失败回调之一，携带 [`CommandResult`]。查询类操作是同步的。
//!
//! 真实传输（网络协议、运动学、标定算法）全部在实现方内部；
//! 本 trait 是接入点，`ned2-backend` 提供进程内模拟实现。

use thiserror::Error;

use crate::joints::JointArray;
use crate::pose::Pose;
use crate::result::{CommandResult, HardwareStatus};

/// 完成通知回调
///
/// 每次请求的两个回调中恰好一个被调用一次，且在会话管理的线程上。
pub type DoneCallback = Box<dyn FnOnce(CommandResult) + Send + 'static>;

/// 会话层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 建立会话失败
    #[error("connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    /// 会话已关闭（工作线程退出后继续下发请求）
    #[error("session closed")]
    SessionClosed,

    /// 设备拒绝同步命令
    #[error("command rejected: {0}")]
    Rejected(String),
}

/// 机械臂会话控制接口
///
/// `&mut self` 配合上层"同一时刻至多一个在途请求"的约定，替代
/// 额外的锁。实现必须容忍回调在等待方超时放弃之后才被调用。
pub trait ArmController: Send {
    /// 自动标定（异步 setup 调用）
    fn calibrate(
        &mut self,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError>;

    /// 检测并装载末端工具（异步 setup 调用）
    fn update_tool(
        &mut self,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError>;

    /// 运动到目标位姿（异步 motion 调用）
    fn move_pose(
        &mut self,
        target: Pose,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError>;

    /// 运动到目标关节配置（异步 motion 调用）
    fn move_joints(
        &mut self,
        target: JointArray,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError>;

    /// 读取当前工具点位姿
    fn get_pose(&mut self) -> Result<Pose, ApiError>;

    /// 读取当前关节角
    fn joints_state(&mut self) -> Result<JointArray, ApiError>;

    /// 读取硬件状态
    fn hardware_status(&mut self) -> Result<HardwareStatus, ApiError>;

    /// 机器人侧保存的位姿名列表
    fn saved_pose_names(&mut self) -> Result<Vec<String>, ApiError>;

    /// 张开夹爪
    fn open_gripper(&mut self) -> Result<(), ApiError>;

    /// 闭合夹爪
    fn close_gripper(&mut self) -> Result<(), ApiError>;

    /// 从指定位姿抓取（内部含接近/下降/闭爪/抬升规划）
    fn pick_from_pose(&mut self, target: Pose) -> Result<(), ApiError>;

    /// 放置到指定位姿
    fn place_from_pose(&mut self, target: Pose) -> Result<(), ApiError>;

    /// 回到出厂 home 位姿
    fn move_to_home_pose(&mut self) -> Result<(), ApiError>;

    /// 收臂休眠（断开前的 rest 位姿）
    fn go_to_sleep(&mut self) -> Result<(), ApiError>;
}
