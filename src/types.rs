//! 核心数据结构定义 (表达原则：用数据结构表达逻辑)
//!
//! 环境上下文只在入口处构造一次，之后只读传递，
//! 避免在业务逻辑中读取全局环境变量。

use crate::error::{ProvError, Result};
use std::collections::HashMap;
use std::fmt;

/// 目标操作系统家族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// macOS (磁盘镜像安装路径)
    MacOs,
    /// Fedora (容器内 dnf 安装)
    Fedora,
    /// Ubuntu (容器内或裸机 apt 安装)
    Ubuntu,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::MacOs => write!(f, "macos"),
            OsFamily::Fedora => write!(f, "fedora"),
            OsFamily::Ubuntu => write!(f, "ubuntu"),
        }
    }
}

/// 目标 Python 版本 (选择依赖列表的 python2/python3 变体)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PythonVersion {
    Python2,
    Python3,
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PythonVersion::Python2 => write!(f, "python2"),
            PythonVersion::Python3 => write!(f, "python3"),
        }
    }
}

impl PythonVersion {
    /// 从版本选择器解析，如 "2"、"2.7"、"3.8"
    pub fn from_selector(s: &str) -> Option<Self> {
        match s.trim().chars().next() {
            Some('2') => Some(PythonVersion::Python2),
            Some('3') => Some(PythonVersion::Python3),
            _ => None,
        }
    }
}

/// 执行分支 — 每次运行恰好激活一个
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    /// macOS：克隆二进制仓库后逐个挂载磁盘镜像安装
    MacOs,
    /// Fedora 容器：pull / run / exec dnf / cp
    FedoraContainer(String),
    /// Ubuntu 容器：pull / run / exec apt-get / cp
    UbuntuContainer(String),
    /// 裸机 Ubuntu：添加 PPA 后批量 apt-get 安装
    UbuntuHost,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::MacOs => write!(f, "macos"),
            Branch::FedoraContainer(v) => write!(f, "fedora-container ({})", v),
            Branch::UbuntuContainer(v) => write!(f, "ubuntu-container ({})", v),
            Branch::UbuntuHost => write!(f, "ubuntu-host"),
        }
    }
}

/// 来自命令行的上下文覆盖项 (优先于环境变量)
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub os: Option<String>,
    pub distro_version: Option<String>,
    pub python: Option<String>,
    pub target: Option<String>,
}

/// 解析后的运行目标 — 构造一次，之后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentContext {
    pub os_family: OsFamily,
    pub distro_version: Option<String>,
    pub python: PythonVersion,
    pub test_target: Option<String>,
}

impl EnvironmentContext {
    /// 从进程环境变量快照 + 命令行覆盖项解析上下文
    ///
    /// 环境变量：
    /// - `PROV_OS_NAME` (回退 `TRAVIS_OS_NAME`)：osx / macos / linux / fedora / ubuntu
    /// - `FEDORA_VERSION` / `UBUNTU_VERSION`：容器的发行版版本
    /// - `PROV_PYTHON_VERSION` (回退 `TRAVIS_PYTHON_VERSION`)：默认 python3
    /// - `TARGET`：测试目标 (如 pylint)
    pub fn resolve(env: &HashMap<String, String>, overrides: &ContextOverrides) -> Result<Self> {
        let lookup = |key: &str| env.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let os_name = overrides
            .os
            .clone()
            .or_else(|| lookup("PROV_OS_NAME"))
            .or_else(|| lookup("TRAVIS_OS_NAME"))
            .ok_or_else(|| {
                ProvError::UnresolvedEnvironment(
                    "未设置操作系统 (PROV_OS_NAME / TRAVIS_OS_NAME / --os)".to_string(),
                )
            })?;

        let fedora_version = lookup("FEDORA_VERSION");
        let ubuntu_version = lookup("UBUNTU_VERSION");

        // "linux" 本身不区分发行版，由版本变量决定：
        // FEDORA_VERSION 存在 => Fedora，否则一律视为 Ubuntu
        let (os_family, distro_version) = match os_name.to_lowercase().as_str() {
            "osx" | "macos" | "darwin" => (OsFamily::MacOs, None),
            "fedora" => (OsFamily::Fedora, fedora_version),
            "ubuntu" => (OsFamily::Ubuntu, ubuntu_version),
            "linux" => {
                if fedora_version.is_some() {
                    (OsFamily::Fedora, fedora_version)
                } else {
                    (OsFamily::Ubuntu, ubuntu_version)
                }
            }
            other => {
                return Err(ProvError::UnresolvedEnvironment(format!(
                    "不支持的操作系统: {}",
                    other
                )));
            }
        };

        let distro_version = overrides.distro_version.clone().or(distro_version);

        let python = match overrides
            .python
            .clone()
            .or_else(|| lookup("PROV_PYTHON_VERSION"))
            .or_else(|| lookup("TRAVIS_PYTHON_VERSION"))
        {
            Some(selector) => PythonVersion::from_selector(&selector).ok_or_else(|| {
                ProvError::UnresolvedEnvironment(format!("无法识别的 Python 版本: {}", selector))
            })?,
            None => PythonVersion::Python3,
        };

        let test_target = overrides.target.clone().or_else(|| lookup("TARGET"));

        Ok(Self {
            os_family,
            distro_version,
            python,
            test_target,
        })
    }

    /// 确定执行分支 (穷尽匹配，每个上下文恰好一个分支)
    pub fn branch(&self) -> Result<Branch> {
        match (self.os_family, &self.distro_version) {
            (OsFamily::MacOs, _) => Ok(Branch::MacOs),
            (OsFamily::Fedora, Some(version)) => Ok(Branch::FedoraContainer(version.clone())),
            (OsFamily::Fedora, None) => Err(ProvError::UnresolvedEnvironment(
                "Fedora 目标需要 FEDORA_VERSION".to_string(),
            )),
            (OsFamily::Ubuntu, Some(version)) => Ok(Branch::UbuntuContainer(version.clone())),
            (OsFamily::Ubuntu, None) => Ok(Branch::UbuntuHost),
        }
    }
}
