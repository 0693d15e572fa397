//! 交互式 shell
//!
//! 行循环 + 命令分发。单条命令内的任何错误都在分发边界捕获，
//! 打印一行后继续循环；只有 `quit`/`exit`/Ctrl-D 结束会话。
//! 每条命令输出后跟一个空行。

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use ned2_client::Ned2;
use ned2_sdk::{Pose, PoseLibrary};
use ned2_tools::{PoseCatalog, ResolveError};

const HISTORY_FILE: &str = ".ned2_history";

/// 单条命令后的走向
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// 运行 shell 直到用户退出
pub fn run(ned2: &mut Ned2, catalog: &mut PoseCatalog) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    // 首次运行没有历史文件
    let _ = rl.load_history(HISTORY_FILE);

    println!("Welcome to Ned2CLI. Type \"help\" for available commands.");

    loop {
        match rl.readline("Ned2> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                let flow = dispatch(line, ned2, catalog);
                if let Err(e) = &flow {
                    println!("Error {e}");
                }
                println!();
                if matches!(flow, Ok(Flow::Quit)) {
                    break;
                }
            },

            Err(ReadlineError::Interrupted) => {
                // Ctrl-C 丢弃当前行，不退出
                println!("^C");
            },

            Err(ReadlineError::Eof) => break,

            Err(e) => {
                eprintln!("Error: {e:?}");
                break;
            },
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

fn dispatch(line: &str, ned2: &mut Ned2, catalog: &mut PoseCatalog) -> Result<Flow> {
    let (command, rest) = split_command(line);

    match command {
        "status" => {
            match ned2.hardware_status() {
                Some(status) => println!("Hardware status: {status}"),
                None => println!("Hardware status: Not connected"),
            }
        },

        "list" => cmd_list(rest, ned2, catalog),

        "pose" => {
            println!("Pose is {}", Pose::display_opt(ned2.get_pose().as_ref()));
        },

        "joints" => {
            match ned2.joints_state() {
                Some(joints) => println!("Joints are {joints}"),
                None => println!("Joints are None"),
            }
        },

        "save" => cmd_save(rest, ned2, catalog)?,

        "remove" => cmd_remove(rest, catalog)?,

        "remove_all" => {
            if catalog.local_mut().remove_all()? > 0 {
                println!("Removed all saved poses");
            } else {
                println!("There are no saved poses to remove");
            }
        },

        "home" => ned2.move_to_home_pose()?,

        "move" => {
            if let Some(pose) = resolve_target(catalog, rest) {
                ned2.move_pose(pose, Some(rest))?;
            }
        },

        "pick" => {
            if let Some(pose) = resolve_target(catalog, rest) {
                ned2.pick_from_pose(pose)?;
            }
        },

        "place" => {
            if let Some(pose) = resolve_target(catalog, rest) {
                ned2.place_from_pose(pose)?;
            }
        },

        "grasp" | "close" => ned2.close_gripper()?,

        "release" | "open" => ned2.open_gripper()?,

        "help" => print_help(),

        "quit" | "exit" => return Ok(Flow::Quit),

        other => {
            println!("Unknown command: {other}. Type \"help\" for available commands.");
        },
    }

    Ok(Flow::Continue)
}

fn cmd_list(rest: &str, ned2: &mut Ned2, catalog: &PoseCatalog) {
    if rest == "robot" {
        match ned2.saved_pose_names() {
            Some(names) => {
                println!("Saved poses in the robot:");
                for name in names {
                    println!("  {name}");
                }
            },
            None => println!("Robot is offline"),
        }
        return;
    }

    if !catalog.base().is_empty() {
        println!("Saved base poses:");
        print_library(catalog.base());
    }
    println!("Saved poses:");
    print_library(catalog.local().library());
}

fn print_library(library: &PoseLibrary) {
    for (name, values) in library.iter() {
        println!("  {name} {}", Pose::from(*values));
    }
}

fn cmd_save(name: &str, ned2: &mut Ned2, catalog: &mut PoseCatalog) -> Result<()> {
    if name.is_empty() {
        println!("Please provide a name for the pose to save");
        return Ok(());
    }
    match ned2.get_pose() {
        Some(pose) => {
            catalog.local_mut().save_pose(name, pose.to_list())?;
            println!("Saved current pose as {name}");
        },
        None => println!("Cannot read the current pose while offline"),
    }
    Ok(())
}

fn cmd_remove(name: &str, catalog: &mut PoseCatalog) -> Result<()> {
    if name.is_empty() {
        println!("Please provide a pose name");
    } else if catalog.local_mut().remove_pose(name)? {
        println!("Removed the pose from saved poses");
    } else {
        println!("Could not find the pose among saved poses");
    }
    Ok(())
}

/// 名字/字面文本 → 位姿；失败打印诊断并返回 None（命令静默继续）
fn resolve_target(catalog: &PoseCatalog, text: &str) -> Option<Pose> {
    match catalog.resolve(text) {
        Ok(pose) => Some(pose),
        Err(ResolveError::EmptyName) => {
            println!("Please specify a pose name");
            None
        },
        Err(e) => {
            println!("{e}");
            None
        },
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  status                    Show hardware status");
    println!("  list [robot]              List saved poses (or poses stored on the robot)");
    println!("  pose                      Show current arm pose");
    println!("  joints                    Show current arm joints");
    println!("  save <name>               Save current pose under a name");
    println!("  remove <name>             Remove a saved pose");
    println!("  remove_all                Remove all saved poses");
    println!("  home                      Move to home pose");
    println!("  move <name|pose text>     Move to a saved pose or literal pose");
    println!("  pick <name|pose text>     Pick up from a pose");
    println!("  place <name|pose text>    Place at a pose");
    println!("  grasp / close             Close the gripper");
    println!("  release / open            Open the gripper");
    println!("  quit / exit               Exit the CLI");
}
