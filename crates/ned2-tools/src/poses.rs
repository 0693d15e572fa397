//! 命名位姿库
//!
//! 三层结构：
//! - [`PoseLibrary`]: 内存中的 name → `[f64; 6]` 映射，可从 YAML
//!   加载（缺失视为空库，损坏报告后视为空库，都不算错误）
//! - [`PoseStore`]: 绑定文件路径的读写库，每次变更整体重写文件
//! - [`PoseCatalog`]: 本地库 → 基础库 → 字面文本的名字解析

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::warn;

use ned2_api::{Pose, PoseParseError};

/// 名字解析失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("pose name is empty")]
    EmptyName,

    #[error("could not find the pose among the saved poses")]
    NotFound,

    /// 输入看起来像字面位姿但解析失败
    #[error("failed to parse pose text: {0}")]
    Parse(#[from] PoseParseError),
}

/// 内存位姿库
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseLibrary {
    poses: BTreeMap<String, [f64; 6]>,
}

impl PoseLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 YAML 文件加载
    ///
    /// 文件不存在返回空库；无法读取或格式损坏（包括元素个数不是
    /// 6 的条目）报告一条诊断后返回空库。调用方永远拿到可用的库。
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to read saved poses from {}: {e}", path.display());
                return Self::new();
            },
        };
        match serde_yaml::from_str::<BTreeMap<String, [f64; 6]>>(&text) {
            Ok(poses) => Self { poses },
            Err(e) => {
                warn!("failed to parse saved poses from {}: {e}", path.display());
                Self::new()
            },
        }
    }

    /// 整体写出为 YAML
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_yaml::to_string(&self.poses)
            .context("failed to serialize saved poses")?;
        fs::write(path, text)
            .with_context(|| format!("failed to write saved poses to {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[f64; 6]> {
        self.poses.get(name)
    }

    /// 同名覆盖（last write wins）
    pub fn insert(&mut self, name: impl Into<String>, values: [f64; 6]) {
        self.poses.insert(name.into(), values);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.poses.remove(name).is_some()
    }

    pub fn clear(&mut self) -> usize {
        let count = self.poses.len();
        self.poses.clear();
        count
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &[f64; 6])> {
        self.poses.iter()
    }
}

/// 绑定文件的读写位姿库
///
/// 每次变更（保存/删除/清空）都从内存映射整体重写文件。
/// 无效果的变更（删除不存在的名字、清空空库）不触碰磁盘。
#[derive(Debug)]
pub struct PoseStore {
    path: PathBuf,
    library: PoseLibrary,
}

impl PoseStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let library = PoseLibrary::load(&path);
        PoseStore { path, library }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn library(&self) -> &PoseLibrary {
        &self.library
    }

    /// 保存（或覆盖）一个命名位姿并落盘
    pub fn save_pose(&mut self, name: &str, values: [f64; 6]) -> Result<()> {
        self.library.insert(name, values);
        self.library.save(&self.path)
    }

    /// 删除命名位姿；不存在返回 `Ok(false)` 且不写盘
    pub fn remove_pose(&mut self, name: &str) -> Result<bool> {
        if !self.library.remove(name) {
            return Ok(false);
        }
        self.library.save(&self.path)?;
        Ok(true)
    }

    /// 清空；空库返回 `Ok(0)` 且不写盘
    pub fn remove_all(&mut self) -> Result<usize> {
        let count = self.library.clear();
        if count > 0 {
            self.library.save(&self.path)?;
        }
        Ok(count)
    }
}

/// 基础库 + 本地库的名字解析
pub struct PoseCatalog {
    base: PoseLibrary,
    local: PoseStore,
}

impl PoseCatalog {
    /// 加载两个库：基础库只读（随发行种子），本地库读写
    pub fn load(base_path: &Path, local_path: impl Into<PathBuf>) -> Self {
        PoseCatalog {
            base: PoseLibrary::load(base_path),
            local: PoseStore::open(local_path),
        }
    }

    pub fn base(&self) -> &PoseLibrary {
        &self.base
    }

    pub fn local(&self) -> &PoseStore {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut PoseStore {
        &mut self.local
    }

    /// 解析用户给出的名字或字面位姿文本
    ///
    /// 顺序：本地库 → 基础库 → 字面文本解析。输入不含位姿迹象
    /// （方括号或 `Pose` 字样）时，解析失败报告为未找到。
    pub fn resolve(&self, text: &str) -> Result<Pose, ResolveError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ResolveError::EmptyName);
        }

        let stored = self
            .local
            .library()
            .get(text)
            .or_else(|| self.base.get(text));
        if let Some(values) = stored {
            // 库内条目固定 6 元素，from_list 不会失败
            return Pose::from_list(values).map_err(ResolveError::Parse);
        }

        let looks_like_pose_text = text.contains('[') || text.contains("Pose");
        match Pose::parse_text(text) {
            Ok(pose) => Ok(pose),
            Err(e) if looks_like_pose_text => Err(ResolveError::Parse(e)),
            Err(e) => {
                warn!("pose {text:?} not saved and not parseable: {e}");
                Err(ResolveError::NotFound)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RAISED_CENTER: [f64; 6] = [0.2003, -0.0171, 0.2848, -0.769, 1.543, -0.752];
    const PLACE_LEFT: [f64; 6] = [0.2464, -0.1004, 0.0930, -1.523, 1.557, -1.398];

    #[test]
    fn load_missing_file_yields_empty_library() {
        let dir = TempDir::new().unwrap();
        let library = PoseLibrary::load(&dir.path().join("nope.yaml"));
        assert!(library.is_empty());
    }

    #[test]
    fn load_malformed_file_yields_empty_library() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poses.yaml");
        fs::write(&path, "not: [valid\n  - poses").unwrap();
        assert!(PoseLibrary::load(&path).is_empty());
    }

    #[test]
    fn load_wrong_arity_entry_yields_empty_library() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poses.yaml");
        fs::write(&path, "short:\n- 1.0\n- 2.0\n- 3.0\n").unwrap();
        assert!(PoseLibrary::load(&path).is_empty());
    }

    #[test]
    fn save_then_fresh_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poses.yaml");

        let mut store = PoseStore::open(&path);
        store.save_pose("raised center", RAISED_CENTER).unwrap();
        store.save_pose("place left", PLACE_LEFT).unwrap();

        let reloaded = PoseLibrary::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("raised center"), Some(&RAISED_CENTER));
        assert_eq!(reloaded.get("place left"), Some(&PLACE_LEFT));
    }

    #[test]
    fn duplicate_name_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poses.yaml");

        let mut store = PoseStore::open(&path);
        store.save_pose("spot", RAISED_CENTER).unwrap();
        store.save_pose("spot", PLACE_LEFT).unwrap();

        let reloaded = PoseLibrary::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("spot"), Some(&PLACE_LEFT));
    }

    #[test]
    fn remove_missing_name_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poses.yaml");

        let mut store = PoseStore::open(&path);
        store.save_pose("spot", RAISED_CENTER).unwrap();
        assert!(!store.remove_pose("other").unwrap());
        assert_eq!(store.library().len(), 1);
        assert_eq!(PoseLibrary::load(&path).len(), 1);
    }

    #[test]
    fn remove_all_persists_empty_then_noops() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poses.yaml");

        let mut store = PoseStore::open(&path);
        store.save_pose("a", RAISED_CENTER).unwrap();
        store.save_pose("b", PLACE_LEFT).unwrap();

        assert_eq!(store.remove_all().unwrap(), 2);
        assert!(PoseLibrary::load(&path).is_empty());

        // 第二次没有可删的，不再写盘
        assert_eq!(store.remove_all().unwrap(), 0);
    }

    #[test]
    fn resolve_prefers_local_over_base() {
        let dir = TempDir::new().unwrap();
        let base_path = dir.path().join("base.yaml");
        let local_path = dir.path().join("local.yaml");

        let mut base = PoseLibrary::new();
        base.insert("spot", RAISED_CENTER);
        base.save(&base_path).unwrap();

        let mut catalog = PoseCatalog::load(&base_path, &local_path);
        catalog.local_mut().save_pose("spot", PLACE_LEFT).unwrap();

        let pose = catalog.resolve("spot").unwrap();
        assert_eq!(pose.to_list(), PLACE_LEFT);
    }

    #[test]
    fn resolve_falls_back_to_base() {
        let dir = TempDir::new().unwrap();
        let base_path = dir.path().join("base.yaml");

        let mut base = PoseLibrary::new();
        base.insert("spot", RAISED_CENTER);
        base.save(&base_path).unwrap();

        let catalog = PoseCatalog::load(&base_path, dir.path().join("local.yaml"));
        assert_eq!(catalog.resolve("spot").unwrap().to_list(), RAISED_CENTER);
    }

    #[test]
    fn resolve_parses_literal_text() {
        let dir = TempDir::new().unwrap();
        let catalog = PoseCatalog::load(&dir.path().join("base.yaml"), dir.path().join("l.yaml"));

        let pose = catalog.resolve("[0.25, -0.01, 0.09, -2.763, 1.533, -2.725]").unwrap();
        assert_eq!(pose.x, 0.25);
    }

    #[test]
    fn resolve_unknown_name_not_found() {
        let dir = TempDir::new().unwrap();
        let catalog = PoseCatalog::load(&dir.path().join("base.yaml"), dir.path().join("l.yaml"));

        assert_eq!(catalog.resolve("nowhere"), Err(ResolveError::NotFound));
        assert_eq!(catalog.resolve("   "), Err(ResolveError::EmptyName));
    }

    #[test]
    fn resolve_pose_like_text_reports_parse_error() {
        let dir = TempDir::new().unwrap();
        let catalog = PoseCatalog::load(&dir.path().join("base.yaml"), dir.path().join("l.yaml"));

        assert!(matches!(
            catalog.resolve("[1.0, 2.0, 3.0]"),
            Err(ResolveError::Parse(_))
        ));
    }
}
