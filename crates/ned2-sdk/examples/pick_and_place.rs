//! 抓取-放置示例
//!
//! 连接机械臂，完成标定与工具装载，然后执行一轮抓取-放置。
//! 任何一步失败都立即收臂退出（示例脚本的策略；交互式 shell
//! 则会继续运行）。
//!
//! # 运行
//!
//! ```bash
//! cargo run --example pick_and_place
//! ```

use ned2_sdk::{JointArray, MotionError, Ned2, Ned2Config, Pose, SimArmController};

/// 机械臂控制端点
const ROBOT_HOST: &str = "10.10.10.10";

/// 抬起的中位（安全过渡点）
const RAISED_CENTER_JOINTS: JointArray = JointArray([-0.081, 0.239, -0.595, -0.017, -1.201, -0.093]);

/// 中间放置点
const PLACE_CENTER_POSE: Pose = Pose {
    x: 0.2495,
    y: -0.0109,
    z: 0.0945,
    roll: -2.763,
    pitch: 1.533,
    yaw: -2.725,
};

/// 左侧抓取点
const PLACE_LEFT_POSE: Pose = Pose {
    x: 0.2464,
    y: -0.1004,
    z: 0.0930,
    roll: -1.523,
    pitch: 1.557,
    yaw: -1.398,
};

fn run_actions(ned2: &mut Ned2) -> Result<(), MotionError> {
    ned2.move_joints(RAISED_CENTER_JOINTS, Some("raised center"))?;
    ned2.pick_from_pose(PLACE_LEFT_POSE)?;
    ned2.place_from_pose(PLACE_CENTER_POSE)?;
    ned2.move_joints(RAISED_CENTER_JOINTS, Some("raised center"))?;
    ned2.close_gripper()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    ned2_sdk::logging::init();

    let arm = SimArmController::connect(ROBOT_HOST)?;

    let mut ned2 = Ned2::new(Ned2Config::default());
    if let Err(e) = ned2.open(Box::new(arm)) {
        anyhow::bail!("failed to connect and setup the robot arm: {e}");
    }

    let outcome = run_actions(&mut ned2);
    // 无论成败都收臂
    ned2.close();

    if let Err(e) = outcome {
        anyhow::bail!("exiting due to error: {e}");
    }
    println!("pick and place finished");
    Ok(())
}
