//! 进程内模拟臂
//!
//! 工作线程持有模拟状态并执行异步请求：每个请求按配置的延迟模拟
//! 执行时间，随后从工作线程调用恰好一个完成回调。同步查询直接读
//! 共享状态。不做任何运动学计算，`move_joints` 只更新关节角。

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;
use tracing::{debug, info};

use ned2_api::{
    ApiError, ArmController, CommandResult, DoneCallback, HardwareStatus, JointArray, Pose,
};

/// 模拟臂的出厂 home 位姿
pub const HOME_POSE: Pose = Pose {
    x: 0.14,
    y: 0.0,
    z: 0.203,
    roll: 0.0,
    pitch: 0.76,
    yaw: 0.0,
};

/// home 位姿对应的关节角
pub const HOME_JOINTS: JointArray = JointArray([0.0, 0.3, -1.3, 0.0, 0.0, 0.0]);

/// 收臂休眠关节角
const SLEEP_JOINTS: JointArray = JointArray([0.0, 0.55, -1.25, 0.0, 0.0, 0.0]);

/// 模拟器时序配置
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// 标定耗时
    pub calibration_delay: Duration,
    /// 工具扫描耗时
    pub tool_update_delay: Duration,
    /// 单次运动耗时
    pub motion_delay: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            calibration_delay: Duration::from_millis(50),
            tool_update_delay: Duration::from_millis(30),
            motion_delay: Duration::from_millis(80),
        }
    }
}

/// 模拟臂状态（工作线程与查询共享）
#[derive(Debug)]
struct SimState {
    pose: Pose,
    joints: JointArray,
    calibrated: bool,
    calibration_in_progress: bool,
    tool: Option<String>,
    gripper_open: bool,
    saved_names: Vec<String>,
}

impl SimState {
    fn new() -> Self {
        SimState {
            pose: HOME_POSE,
            joints: HOME_JOINTS,
            calibrated: false,
            calibration_in_progress: false,
            tool: None,
            gripper_open: true,
            // 出厂固件自带的两个命名位姿
            saved_names: vec!["observation".to_string(), "resting".to_string()],
        }
    }
}

/// 异步请求（setup 与 motion 共用一个队列）
enum Request {
    Calibrate {
        on_success: DoneCallback,
        on_failure: DoneCallback,
    },
    UpdateTool {
        on_success: DoneCallback,
        on_failure: DoneCallback,
    },
    MovePose {
        target: Pose,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    },
    MoveJoints {
        target: JointArray,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    },
}

/// 模拟臂会话
///
/// 上层约定同一时刻至多一个在途异步请求；队列容量只是裕量。
/// Drop 时关闭请求通道并 join 工作线程。
#[derive(Debug)]
pub struct SimArmController {
    host: String,
    request_tx: Option<Sender<Request>>,
    worker: Option<JoinHandle<()>>,
    state: Arc<Mutex<SimState>>,
    config: SimConfig,
}

impl SimArmController {
    /// 建立模拟会话
    pub fn connect(host: &str) -> Result<Self, ApiError> {
        Self::connect_with(host, SimConfig::default())
    }

    /// 指定时序配置建立模拟会话
    pub fn connect_with(host: &str, config: SimConfig) -> Result<Self, ApiError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ApiError::Connection {
                host: host.to_string(),
                reason: "empty host".to_string(),
            });
        }

        let state = Arc::new(Mutex::new(SimState::new()));
        let (request_tx, request_rx) = bounded::<Request>(4);

        let worker_state = state.clone();
        let worker_config = config.clone();
        let worker = thread::Builder::new()
            .name("ned2-sim".to_string())
            .spawn(move || worker_loop(request_rx, worker_state, worker_config))
            .map_err(|e| ApiError::Connection {
                host: host.to_string(),
                reason: format!("failed to spawn worker: {e}"),
            })?;

        info!(host, "simulated arm session established");
        Ok(SimArmController {
            host: host.to_string(),
            request_tx: Some(request_tx),
            worker: Some(worker),
            state,
            config,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn submit(&self, request: Request) -> Result<(), ApiError> {
        self.request_tx
            .as_ref()
            .ok_or(ApiError::SessionClosed)?
            .send(request)
            .map_err(|_| ApiError::SessionClosed)
    }

    fn require_calibrated(&self) -> Result<(), ApiError> {
        if self.state.lock().calibrated {
            Ok(())
        } else {
            Err(ApiError::Rejected("arm is not calibrated".to_string()))
        }
    }
}

impl Drop for SimArmController {
    fn drop(&mut self) {
        // 先断开通道，工作线程才能观察到 Disconnected 退出
        drop(self.request_tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        debug!(host = %self.host, "simulated arm session closed");
    }
}

/// 工作线程主循环：顺序执行请求，从本线程回调
fn worker_loop(request_rx: Receiver<Request>, state: Arc<Mutex<SimState>>, config: SimConfig) {
    for request in request_rx {
        match request {
            Request::Calibrate {
                on_success,
                on_failure: _,
            } => {
                state.lock().calibration_in_progress = true;
                thread::sleep(config.calibration_delay);
                {
                    let mut s = state.lock();
                    s.calibration_in_progress = false;
                    s.calibrated = true;
                }
                on_success(CommandResult::success("Calibration done"));
            },

            Request::UpdateTool {
                on_success,
                on_failure,
            } => {
                thread::sleep(config.tool_update_delay);
                let calibrated = state.lock().calibrated;
                if !calibrated {
                    on_failure(CommandResult::failure(
                        -20,
                        "tool scan requires a calibrated arm",
                    ));
                    continue;
                }
                state.lock().tool = Some("standard gripper".to_string());
                on_success(CommandResult::success("Tool updated: standard gripper"));
            },

            Request::MovePose {
                target,
                on_success,
                on_failure,
            } => {
                if !state.lock().calibrated {
                    on_failure(CommandResult::failure(-10, "arm is not calibrated"));
                    continue;
                }
                thread::sleep(config.motion_delay);
                state.lock().pose = target;
                on_success(CommandResult::success("Move complete"));
            },

            Request::MoveJoints {
                target,
                on_success,
                on_failure,
            } => {
                if !state.lock().calibrated {
                    on_failure(CommandResult::failure(-10, "arm is not calibrated"));
                    continue;
                }
                thread::sleep(config.motion_delay);
                // 无正运动学：位姿保持上一次的笛卡尔读数
                state.lock().joints = target;
                on_success(CommandResult::success("Move complete"));
            },
        }
    }
}

impl ArmController for SimArmController {
    fn calibrate(
        &mut self,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        self.submit(Request::Calibrate {
            on_success,
            on_failure,
        })
    }

    fn update_tool(
        &mut self,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        self.submit(Request::UpdateTool {
            on_success,
            on_failure,
        })
    }

    fn move_pose(
        &mut self,
        target: Pose,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        self.submit(Request::MovePose {
            target,
            on_success,
            on_failure,
        })
    }

    fn move_joints(
        &mut self,
        target: JointArray,
        on_success: DoneCallback,
        on_failure: DoneCallback,
    ) -> Result<(), ApiError> {
        self.submit(Request::MoveJoints {
            target,
            on_success,
            on_failure,
        })
    }

    fn get_pose(&mut self) -> Result<Pose, ApiError> {
        Ok(self.state.lock().pose)
    }

    fn joints_state(&mut self) -> Result<JointArray, ApiError> {
        Ok(self.state.lock().joints)
    }

    fn hardware_status(&mut self) -> Result<HardwareStatus, ApiError> {
        let s = self.state.lock();
        Ok(HardwareStatus {
            connection_up: true,
            calibration_needed: !s.calibrated,
            calibration_in_progress: s.calibration_in_progress,
            active_tool: s.tool.clone(),
        })
    }

    fn saved_pose_names(&mut self) -> Result<Vec<String>, ApiError> {
        Ok(self.state.lock().saved_names.clone())
    }

    fn open_gripper(&mut self) -> Result<(), ApiError> {
        let mut s = self.state.lock();
        if s.tool.is_none() {
            return Err(ApiError::Rejected("no tool equipped".to_string()));
        }
        s.gripper_open = true;
        Ok(())
    }

    fn close_gripper(&mut self) -> Result<(), ApiError> {
        let mut s = self.state.lock();
        if s.tool.is_none() {
            return Err(ApiError::Rejected("no tool equipped".to_string()));
        }
        s.gripper_open = false;
        Ok(())
    }

    fn pick_from_pose(&mut self, target: Pose) -> Result<(), ApiError> {
        self.require_calibrated()?;
        thread::sleep(self.config.motion_delay);
        let mut s = self.state.lock();
        s.pose = target;
        s.gripper_open = false;
        Ok(())
    }

    fn place_from_pose(&mut self, target: Pose) -> Result<(), ApiError> {
        self.require_calibrated()?;
        thread::sleep(self.config.motion_delay);
        let mut s = self.state.lock();
        s.pose = target;
        s.gripper_open = true;
        Ok(())
    }

    fn move_to_home_pose(&mut self) -> Result<(), ApiError> {
        self.require_calibrated()?;
        thread::sleep(self.config.motion_delay);
        let mut s = self.state.lock();
        s.pose = HOME_POSE;
        s.joints = HOME_JOINTS;
        Ok(())
    }

    fn go_to_sleep(&mut self) -> Result<(), ApiError> {
        thread::sleep(self.config.motion_delay);
        self.state.lock().joints = SLEEP_JOINTS;
        Ok(())
    }
}
