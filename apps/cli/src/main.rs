//! # Ned2 CLI
//!
//! Ned2 机械臂的交互式控制 shell。
//!
//! ```bash
//! $ ned2-cli --host 10.10.10.10
//! Welcome to Ned2CLI. Type "help" for available commands.
//! Ned2> move raised center
//! Ned2> save shelf
//! Ned2> quit
//! ```
//!
//! 启动时连接并完成标定/工具装载；失败则打印诊断后退出。
//! `--offline` 跳过连接，进入离线仿真（运动只更新位姿缓存）。

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use ned2_client::{Ned2, Ned2Config};
use ned2_sdk::SimArmController;
use ned2_tools::PoseCatalog;

mod shell;

/// Ned2 CLI - 机械臂交互控制
#[derive(Parser, Debug)]
#[command(name = "ned2-cli")]
#[command(about = "Interactive control shell for the Niryo Ned2 robot arm", long_about = None)]
#[command(version)]
struct Cli {
    /// 机械臂控制端点（IPv4 地址或主机名）
    #[arg(long, default_value = "10.10.10.10")]
    host: String,

    /// 只读基础位姿文件（随发行种子）
    #[arg(long, default_value = "base-saved-poses.yaml")]
    base_poses: PathBuf,

    /// 本地位姿文件（可写，每次变更整体重写）
    #[arg(long, default_value = "local-saved-poses.yaml")]
    poses: PathBuf,

    /// 不连接硬件，离线仿真模式
    #[arg(long)]
    offline: bool,

    /// 关闭逐条进度行
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    ned2_sdk::logging::init();

    let cli = Cli::parse();

    let mut catalog = PoseCatalog::load(&cli.base_poses, &cli.poses);
    let mut ned2 = Ned2::new(Ned2Config {
        verbose: !cli.quiet,
        offline_simulation: cli.offline,
        ..Ned2Config::default()
    });

    if !cli.offline {
        let arm = SimArmController::connect(&cli.host)
            .with_context(|| format!("failed to reach the robot at {}", cli.host))?;
        if let Err(e) = ned2.open(Box::new(arm)) {
            // 启动期 setup 失败是仅有的两类设计内退出之一
            eprintln!("Failed to connect and setup the robot arm: {e}");
            process::exit(1);
        }
    }

    shell::run(&mut ned2, &mut catalog)?;

    ned2.close();
    Ok(())
}
