//! 错误处理模块 (修复原则：明确抛出异常)
//!
//! 失败策略：快速失败，不重试、不回滚 —
//! 第一个出错的外部命令终止整个运行，并原样传播其退出码。

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvError {
    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置解析错误: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置文件不存在: {0}")]
    ConfigFileMissing(PathBuf),

    #[error("无法解析运行环境: {0}")]
    UnresolvedEnvironment(String),

    #[error("未知的依赖列表: {0}")]
    UnknownDependencySet(String),

    #[error("依赖列表为空: {0}")]
    EmptyDependencySet(String),

    #[error("命令未找到: {0}")]
    CommandNotFound(String),

    #[error("命令执行失败: {program} (退出码 {code})")]
    CommandFailed { program: String, code: i32 },
}

impl ProvError {
    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            eprintln!("❌ 错误: {}", self);

            // (thiserror 支持自动的 source() 链)
            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            match self {
                ProvError::UnresolvedEnvironment(msg) => eprintln!("环境未解析: {}", msg),
                ProvError::UnknownDependencySet(name) => eprintln!("未知依赖列表: {}", name),
                ProvError::CommandNotFound(cmd) => eprintln!("命令未找到: {}", cmd),
                ProvError::CommandFailed { program, code } => {
                    eprintln!("命令失败: {} (退出码 {})", program, code)
                }
                _ => eprintln!("错误: {}", self),
            }
        }
    }

    /// 进程退出码：外部命令失败时原样传播子进程的退出码，
    /// 配置类错误统一为 1
    pub fn exit_code(&self) -> i32 {
        match self {
            ProvError::CommandFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, ProvError>;
