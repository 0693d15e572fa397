//! 同步运动门面
//!
//! [`Ned2`] 把异步回调会话包成阻塞调用/返回的契约。
//!
//! 状态机：
//! - **Disconnected**（初始）：无会话句柄，运动/查询离线降级
//! - **Online**：`open()` 内标定与工具装载都已成功
//!
//! `open()` 期间短暂处于 Connecting，`close()` 期间短暂处于
//! Closing；两者都不对外暴露。句柄与当前位姿缓存由门面独占，
//! 方法全部 `&mut self`，同一时刻至多一个在途请求由此保证。

use std::time::Duration;

use tracing::{error, info, warn};

use ned2_api::{ApiError, ArmController, DoneCallback, HardwareStatus, JointArray, Pose};

use crate::error::{MotionError, SetupError, SetupFailure};
use crate::rendezvous::{CallGate, WaitOutcome};

/// 门面配置
#[derive(Debug, Clone)]
pub struct Ned2Config {
    /// 每次 setup/motion 调用是否输出进度行
    pub verbose: bool,
    /// 标定与工具更新各自的等待上限
    pub setup_timeout: Duration,
    /// 单次运动的等待上限
    pub motion_timeout: Duration,
    /// 离线仿真：断开状态下 `move_pose` 只更新位姿缓存并报成功
    pub offline_simulation: bool,
}

impl Default for Ned2Config {
    fn default() -> Self {
        Ned2Config {
            verbose: true,
            setup_timeout: Duration::from_secs(30),
            motion_timeout: Duration::from_secs(30),
            offline_simulation: false,
        }
    }
}

/// Ned2 机械臂同步门面
pub struct Ned2 {
    config: Ned2Config,
    backend: Option<Box<dyn ArmController>>,
    setup_gate: CallGate,
    motion_gate: CallGate,
    current_pose: Option<Pose>,
}

impl Ned2 {
    pub fn new(config: Ned2Config) -> Self {
        Ned2 {
            config,
            backend: None,
            setup_gate: CallGate::new(),
            motion_gate: CallGate::new(),
            current_pose: None,
        }
    }

    pub fn config(&self) -> &Ned2Config {
        &self.config
    }

    pub fn is_offline(&self) -> bool {
        self.backend.is_none()
    }

    /// 接管已连接的会话并完成 setup
    ///
    /// 先标定、后工具更新，各自作为带超时的阻塞 setup 调用执行。
    /// 任一失败或超时即释放句柄（尽力收臂）并保持 Disconnected。
    pub fn open(&mut self, backend: Box<dyn ArmController>) -> Result<(), SetupError> {
        self.backend = Some(backend);

        if let Err(failure) = self.run_setup("Calibrate", |arm, ok, err| arm.calibrate(ok, err)) {
            self.close();
            return Err(SetupError::Calibration(failure));
        }
        if let Err(failure) = self.run_setup("Update Tool", |arm, ok, err| arm.update_tool(ok, err))
        {
            self.close();
            return Err(SetupError::ToolUpdate(failure));
        }

        self.refresh_pose();
        Ok(())
    }

    /// 释放会话：尽力把臂送到 rest 位姿，结果不检查
    pub fn close(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            if let Err(e) = backend.go_to_sleep() {
                warn!("Ned2: go_to_sleep on close failed: {e}");
            }
        }
    }

    /// 最近一次成功运动后的位姿缓存
    pub fn current_pose(&self) -> Option<Pose> {
        self.current_pose
    }

    /// 读取当前位姿并刷新缓存；离线时返回缓存（仿真）或 None
    pub fn get_pose(&mut self) -> Option<Pose> {
        if self.backend.is_none() {
            if self.config.offline_simulation {
                return self.current_pose;
            }
            warn!("Ned2: offline");
            return None;
        }
        self.refresh_pose();
        self.current_pose
    }

    pub fn joints_state(&mut self) -> Option<JointArray> {
        self.query("joints_state", |arm| arm.joints_state())
    }

    pub fn hardware_status(&mut self) -> Option<HardwareStatus> {
        self.query("hardware_status", |arm| arm.hardware_status())
    }

    /// 机器人侧保存的位姿名（`list robot`）
    pub fn saved_pose_names(&mut self) -> Option<Vec<String>> {
        self.query("saved_pose_names", |arm| arm.saved_pose_names())
    }

    /// 阻塞运动到目标位姿
    pub fn move_pose(&mut self, target: Pose, title: Option<&str>) -> Result<(), MotionError> {
        if self.backend.is_none() && self.config.offline_simulation {
            if self.config.verbose {
                if let Some(title) = title {
                    info!("Ned2: Move to {title} (offline simulation)");
                }
            }
            self.current_pose = Some(target);
            return Ok(());
        }
        self.blocking_move(title, |arm, ok, err| arm.move_pose(target, ok, err))
    }

    /// 阻塞运动到目标关节配置
    pub fn move_joints(&mut self, target: JointArray, title: Option<&str>) -> Result<(), MotionError> {
        if self.backend.is_none() && self.config.offline_simulation {
            // 不做运动学，离线仿真下关节运动不更新位姿缓存
            return Ok(());
        }
        self.blocking_move(title, |arm, ok, err| arm.move_joints(target, ok, err))
    }

    pub fn move_to_home_pose(&mut self) -> Result<(), MotionError> {
        self.passthrough(|arm| arm.move_to_home_pose())?;
        self.refresh_pose();
        Ok(())
    }

    pub fn pick_from_pose(&mut self, target: Pose) -> Result<(), MotionError> {
        self.passthrough(|arm| arm.pick_from_pose(target))?;
        self.refresh_pose();
        Ok(())
    }

    pub fn place_from_pose(&mut self, target: Pose) -> Result<(), MotionError> {
        self.passthrough(|arm| arm.place_from_pose(target))?;
        self.refresh_pose();
        Ok(())
    }

    pub fn open_gripper(&mut self) -> Result<(), MotionError> {
        self.passthrough(|arm| arm.open_gripper())
    }

    pub fn close_gripper(&mut self) -> Result<(), MotionError> {
        self.passthrough(|arm| arm.close_gripper())
    }

    /// 阻塞 setup 调用（标定/工具更新）
    ///
    /// 超时对 setup 是致命的：`open()` 中止并释放句柄。
    fn run_setup<F>(&mut self, what: &str, issue: F) -> Result<(), SetupFailure>
    where
        F: FnOnce(&mut dyn ArmController, DoneCallback, DoneCallback) -> Result<(), ApiError>,
    {
        let timeout = self.config.setup_timeout;
        let Some(arm) = self.backend.as_deref_mut() else {
            return Err(SetupFailure::Api(ApiError::SessionClosed));
        };

        let ticket = self.setup_gate.arm();
        let on_success = self.setup_gate.on_success(&ticket);
        let on_failure = self.setup_gate.on_failure(&ticket);
        issue(arm, on_success, on_failure)?;

        match self.setup_gate.wait(ticket, timeout) {
            WaitOutcome::Success(result) => {
                if self.config.verbose {
                    info!("Ned2: {what}: {}", result.message);
                }
                Ok(())
            },
            WaitOutcome::Failure(result) => {
                error!("Ned2: Error: {what}: {}", result.message);
                Err(SetupFailure::Rejected(result.message))
            },
            WaitOutcome::TimedOut => {
                error!("Ned2: Error: {what}: no completion within {timeout:?}");
                Err(SetupFailure::Timeout(timeout))
            },
        }
    }

    /// 阻塞 motion 调用
    ///
    /// 超时与设备拒绝都不摧毁会话；成功后重读并缓存当前位姿。
    fn blocking_move<F>(&mut self, title: Option<&str>, issue: F) -> Result<(), MotionError>
    where
        F: FnOnce(&mut dyn ArmController, DoneCallback, DoneCallback) -> Result<(), ApiError>,
    {
        let timeout = self.config.motion_timeout;
        let Some(arm) = self.backend.as_deref_mut() else {
            warn!("Ned2: offline");
            return Err(MotionError::Offline);
        };

        if self.config.verbose {
            if let Some(title) = title {
                info!("Ned2: Move to {title}");
            }
        }

        let ticket = self.motion_gate.arm();
        let on_success = self.motion_gate.on_success(&ticket);
        let on_failure = self.motion_gate.on_failure(&ticket);
        issue(arm, on_success, on_failure)?;

        match self.motion_gate.wait(ticket, timeout) {
            WaitOutcome::Success(result) => {
                self.refresh_pose();
                if self.config.verbose {
                    info!(
                        "Ned2: move successful: {}; pose is {}",
                        result.message,
                        Pose::display_opt(self.current_pose.as_ref())
                    );
                }
                Ok(())
            },
            WaitOutcome::Failure(result) => {
                error!("Ned2: Error: move failed: {result}");
                Err(MotionError::Rejected(result.message))
            },
            WaitOutcome::TimedOut => {
                error!("Ned2: Error: move did not complete within {timeout:?}");
                Err(MotionError::Timeout(timeout))
            },
        }
    }

    /// 同步查询；离线时记一条 offline 并返回 None
    fn query<T, F>(&mut self, what: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut dyn ArmController) -> Result<T, ApiError>,
    {
        let Some(arm) = self.backend.as_deref_mut() else {
            warn!("Ned2: offline");
            return None;
        };
        match f(arm) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ned2: {what} failed: {e}");
                None
            },
        }
    }

    /// 同步直通命令（夹爪/home/抓放）
    fn passthrough<F>(&mut self, f: F) -> Result<(), MotionError>
    where
        F: FnOnce(&mut dyn ArmController) -> Result<(), ApiError>,
    {
        let Some(arm) = self.backend.as_deref_mut() else {
            warn!("Ned2: offline");
            return Err(MotionError::Offline);
        };
        f(arm).map_err(MotionError::Api)
    }

    fn refresh_pose(&mut self) {
        if let Some(arm) = self.backend.as_deref_mut() {
            match arm.get_pose() {
                Ok(pose) => self.current_pose = Some(pose),
                Err(e) => warn!("Ned2: could not read pose: {e}"),
            }
        }
    }
}
