//! # Ned2 SDK
//!
//! Niryo Ned2 机械臂控制 SDK 的统一入口。
//!
//! ## 分层
//!
//! - [`api`]: 厂商 API 类型与回调契约（无传输依赖）
//! - [`backend`]: 会话实现（进程内模拟器）
//! - [`client`]: 同步门面 [`Ned2`]（回调到阻塞的桥接）
//! - [`tools`]: 命名位姿库持久化
//!
//! ## 快速上手
//!
//! ```rust,no_run
//! use ned2_sdk::{Ned2, Ned2Config, SimArmController};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! ned2_sdk::logging::init();
//!
//! let arm = SimArmController::connect("10.10.10.10")?;
//! let mut ned2 = Ned2::new(Ned2Config::default());
//! ned2.open(Box::new(arm))?;
//!
//! println!("pose: {}", ned2_sdk::Pose::display_opt(ned2.get_pose().as_ref()));
//! ned2.close();
//! # Ok(())
//! # }
//! ```

pub use ned2_api as api;
pub use ned2_backend as backend;
pub use ned2_client as client;
pub use ned2_tools as tools;

// 扁平重导出常用类型
pub use ned2_api::{ApiError, ArmController, CommandResult, HardwareStatus, JointArray, Pose};
pub use ned2_backend::{SimArmController, SimConfig};
pub use ned2_client::{MotionError, Ned2, Ned2Config, SetupError, SetupFailure};
pub use ned2_tools::{PoseCatalog, PoseLibrary, PoseStore};

/// 日志初始化
pub mod logging {
    use tracing_subscriber::EnvFilter;

    /// 初始化 tracing 订阅者
    ///
    /// `RUST_LOG` 优先；未设置时默认 `info`。`log` 宏产生的记录
    /// 一并桥接进来。重复调用只有第一次生效。
    pub fn init() {
        let _ = tracing_log::LogTracer::init();
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    }
}
