//! 配置加载模块 (简单原则：包列表是数据，不是逻辑)
//!
//! 依赖列表和外部工具参数来自 TOML 配置文档：
//! 优先 `--config` 指定的文件，其次 `~/.prov/depsets.toml`，
//! 否则使用内嵌的默认文档。启动时加载一次，之后不可变。

use crate::error::{ProvError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// 内嵌的默认配置
const DEFAULT_CONFIG: &str = include_str!("depsets.toml");

/// 外部工具参数 (镜像名、PPA、仓库地址等)
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 容器名称
    pub container_name: String,
    /// Fedora 基础镜像
    pub fedora_image: String,
    /// Ubuntu 基础镜像
    pub ubuntu_image: String,
    /// 裸机 Ubuntu 使用的 PPA
    pub ppa: String,
    /// macOS 二进制包仓库 (git clone)
    pub binaries_repo: String,
    /// 克隆后的本地目录，.dmg 文件所在处
    pub binaries_dir: String,
    /// 复制进容器的项目源码目录
    pub source_dir: String,
    /// 容器内的目标路径
    pub container_dest: String,
}

/// 配置文档的原始形态
#[derive(Debug, Deserialize)]
struct RawConfig {
    settings: Settings,
    dependency_sets: HashMap<String, Vec<String>>,
}

/// 启动时加载的不可变配置：命名依赖列表 + 工具参数
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub settings: Settings,
    sets: HashMap<String, Vec<String>>,
}

impl ProvisionConfig {
    /// 从 TOML 文本解析
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self {
            settings: raw.settings,
            sets: raw.dependency_sets,
        })
    }

    /// 内嵌默认配置
    pub fn default_config() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// 按优先级加载：显式路径 > 用户配置文件 > 内嵌默认
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(ProvError::ConfigFileMissing(path.to_path_buf()));
            }
            let content = std::fs::read_to_string(path)?;
            return Self::from_toml(&content);
        }

        if let Some(path) = user_config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                return Self::from_toml(&content);
            }
        }

        Self::default_config()
    }

    /// 取一个命名依赖列表；未知或为空均为配置错误
    pub fn dependency_set(&self, name: &str) -> Result<&[String]> {
        let packages = self
            .sets
            .get(name)
            .ok_or_else(|| ProvError::UnknownDependencySet(name.to_string()))?;
        if packages.is_empty() {
            return Err(ProvError::EmptyDependencySet(name.to_string()));
        }
        Ok(packages)
    }

    /// 所有依赖列表名称 (排序后，供 list 命令输出)
    pub fn set_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// 排序后的 (名称 → 包列表) 映射，供 JSON 输出
    pub fn sorted_sets(&self) -> BTreeMap<&str, &Vec<String>> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}

/// 用户级配置文件路径：~/.prov/depsets.toml
fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".prov").join("depsets.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_default_parses() {
        let config = ProvisionConfig::default_config().unwrap();
        assert!(!config.set_names().is_empty());
        assert!(!config.dependency_set("dpkg_python3").unwrap().is_empty());
    }

    #[test]
    fn every_default_set_is_non_empty() {
        let config = ProvisionConfig::default_config().unwrap();
        for name in config.set_names() {
            assert!(
                config.dependency_set(name).is_ok(),
                "默认依赖列表 {} 不应为空",
                name
            );
        }
    }

    #[test]
    fn unknown_set_is_an_error() {
        let config = ProvisionConfig::default_config().unwrap();
        let err = config.dependency_set("no_such_set").unwrap_err();
        assert!(matches!(err, ProvError::UnknownDependencySet(_)));
    }

    #[test]
    fn empty_set_is_an_error() {
        let config = ProvisionConfig::from_toml(
            r#"
            [settings]
            container_name = "c"
            fedora_image = "fedora"
            ubuntu_image = "ubuntu"
            ppa = "ppa:gift/dev"
            binaries_repo = "https://example.com/repo.git"
            binaries_dir = "repo"
            source_dir = "."
            container_dest = "/home/test/"

            [dependency_sets]
            empty = []
            "#,
        )
        .unwrap();
        let err = config.dependency_set("empty").unwrap_err();
        assert!(matches!(err, ProvError::EmptyDependencySet(_)));
    }

    #[test]
    fn explicit_path_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
            [settings]
            container_name = "custom"
            fedora_image = "fedora"
            ubuntu_image = "ubuntu"
            ppa = "ppa:custom/dev"
            binaries_repo = "https://example.com/repo.git"
            binaries_dir = "repo"
            source_dir = "."
            container_dest = "/srv/"

            [dependency_sets]
            dpkg_python3 = ["python3-yaml"]
            "#
        )
        .unwrap();

        let config = ProvisionConfig::load(Some(&path)).unwrap();
        assert_eq!(config.settings.container_name, "custom");
        assert_eq!(config.dependency_set("dpkg_python3").unwrap(), ["python3-yaml"]);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = ProvisionConfig::load(Some(Path::new("/nonexistent/depsets.toml"))).unwrap_err();
        assert!(matches!(err, ProvError::ConfigFileMissing(_)));
    }
}
