//! 集成测试共用的脚本化会话
//!
//! 每个异步操作按脚本行事：成功/失败回调从新起的线程调用
//! （复现"回调到达于 SDK 线程"），`Ignore` 则把回调直接丢弃，
//! 用于制造超时。探针记录句柄是否还活着、是否收过臂。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use ned2_sdk::api::{
    ApiError, ArmController, CommandResult, DoneCallback, HardwareStatus, JointArray, Pose,
};

/// 单个异步操作的脚本
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// 从回调线程报成功
    Succeed,
    /// 从回调线程报失败（错误闩路径）
    Fail(i32, &'static str),
    /// 两个回调都不调用（制造超时）
    Ignore,
}

impl Script {
    fn run(self, on_success: DoneCallback, on_failure: DoneCallback) {
        match self {
            Script::Succeed => {
                thread::spawn(move || on_success(CommandResult::success("ok")));
            },
            Script::Fail(status, message) => {
                thread::spawn(move || on_failure(CommandResult::failure(status, message)));
            },
            Script::Ignore => {},
        }
    }
}

/// 会话外部可见的事后探针
#[derive(Clone)]
pub struct Probe {
    alive: Arc<AtomicBool>,
    asleep: Arc<AtomicBool>,
}

impl Probe {
    /// 句柄是否仍被门面持有（Drop 前为 true）
    pub fn handle_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// 释放前是否收到过 go_to_sleep
    pub fn went_to_sleep(&self) -> bool {
        self.asleep.load(Ordering::SeqCst)
    }
}

/// 脚本化会话
pub struct ScriptedArm {
    calibrate: Script,
    update_tool: Script,
    motion: Script,
    pose: Pose,
    probe: Probe,
}

impl ScriptedArm {
    pub fn new(calibrate: Script, update_tool: Script, motion: Script) -> (Self, Probe) {
        let probe = Probe {
            alive: Arc::new(AtomicBool::new(true)),
            asleep: Arc::new(AtomicBool::new(false)),
        };
        let arm = ScriptedArm {
            calibrate,
            update_tool,
            motion,
            pose: Pose::new(0.14, 0.0, 0.203, 0.0, 0.76, 0.0),
            probe: probe.clone(),
        };
        (arm, probe)
    }

    /// 全部成功的会话
    pub fn all_good() -> (Self, Probe) {
        Self::new(Script::Succeed, Script::Succeed, Script::Succeed)
    }
}

impl Drop for ScriptedArm {
    fn drop(&mut self) {
        self.probe.alive.store(false, Ordering::SeqCst);
    }
}

impl ArmController for ScriptedArm {
    fn calibrate(
        &mut self,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        self.calibrate.run(on_success, on_failure);
        Ok(())
    }

    fn update_tool(
        &mut self,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        self.update_tool.run(on_success, on_failure);
        Ok(())
    }

    fn move_pose(
        &mut self,
        target: Pose,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        if matches!(self.motion, Script::Succeed) {
            self.pose = target;
        }
        self.motion.run(on_success, on_failure);
        Ok(())
    }

    fn move_joints(
        &mut self,
        _target: JointArray,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        self.motion.run(on_success, on_failure);
        Ok(())
    }

    fn get_pose(&mut self) -> Result<Pose, ApiError> {
        Ok(self.pose)
    }

    fn joints_state(&mut self) -> Result<JointArray, ApiError> {
        Ok(JointArray::default())
    }

    fn hardware_status(&mut self) -> Result<HardwareStatus, ApiError> {
        Ok(HardwareStatus {
            connection_up: true,
            ..HardwareStatus::default()
        })
    }

    fn saved_pose_names(&mut self) -> Result<Vec<String>, ApiError> {
        Ok(Vec::new())
    }

    fn open_gripper(&mut self) -> Result<(), ApiError> {
        Ok(())
    }

    fn close_gripper(&mut self) -> Result<(), ApiError> {
        Ok(())
    }

    fn pick_from_pose(&mut self, target: Pose) -> Result<(), ApiError> {
        self.pose = target;
        Ok(())
    }

    fn place_from_pose(&mut self, target: Pose) -> Result<(), ApiError> {
        self.pose = target;
        Ok(())
    }

    fn move_to_home_pose(&mut self) -> Result<(), ApiError> {
        Ok(())
    }

    fn go_to_sleep(&mut self) -> Result<(), ApiError> {
        self.probe.asleep.store(true, Ordering::SeqCst);
        Ok(())
    }
}
