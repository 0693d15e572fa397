//! # Ned2 Tools
//!
//! 应用层共享的持久化工具：命名位姿库。
//!
//! 位姿文件是顶层为 name → 6 元素数值序列映射的 YAML 文档，
//! 人类可直接编辑；写入与重读必须还原同一组名字和数值。

pub mod poses;

pub use poses::{PoseCatalog, PoseLibrary, PoseStore, ResolveError};
