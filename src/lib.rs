//! ProvCLI - CI 环境配备工具
//!
//! 单组件的扁平调度器：把 {操作系统, 发行版版本, Python 版本, 测试目标}
//! 映射为一串外部命令 (包安装、容器操作、磁盘镜像操作)，
//! 严格顺序执行，首个失败立即终止。

// CLI 定义
pub mod cli;

// 配置加载 (命名依赖列表 + 工具参数)
pub mod config;

// 诊断命令
pub mod doctor;

// 错误处理
pub mod error;

// 外部命令执行
pub mod executor;

// 执行计划构建
pub mod plan;

// 核心数据结构
pub mod types;

// 重新导出常用类型
pub use config::ProvisionConfig;
pub use error::{ProvError, Result};
pub use executor::{CommandRunner, Provisioner, SystemRunner};
pub use plan::{ExecutionStep, StepKind};
pub use types::{Branch, ContextOverrides, EnvironmentContext, OsFamily, PythonVersion};
