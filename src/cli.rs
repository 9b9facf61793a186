//! CLI 参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ProvCLI - CI 环境配备工具
#[derive(Parser)]
#[command(
    name = "prov",
    version = "0.1.0",
    about = "CI 环境配备工具",
    long_about = "根据环境变量解析目标平台，按命名依赖列表调度系统包管理器、\
                  容器引擎与磁盘镜像工具，准备构建/测试环境"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 覆盖目标操作系统 (osx/macos/fedora/ubuntu/linux)
    #[arg(long, global = true)]
    pub os: Option<String>,

    /// 覆盖发行版版本 (如 33 / 20.04)
    #[arg(long, global = true)]
    pub distro_version: Option<String>,

    /// 覆盖 Python 版本选择器 (如 2.7 / 3.8)
    #[arg(long, global = true)]
    pub python: Option<String>,

    /// 覆盖测试目标 (如 pylint)
    #[arg(long, global = true)]
    pub target: Option<String>,

    /// 配置文件路径 (默认 ~/.prov/depsets.toml，否则内嵌默认)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 解析上下文并顺序执行配备步骤 (首个失败立即终止)
    Provision {
        /// 只打印将要执行的命令，不实际执行
        #[arg(long)]
        dry_run: bool,
    },

    /// 打印解析出的执行计划，每步一行
    Plan,

    /// 显示解析后的运行上下文与选中的依赖列表
    Resolve,

    /// 列出配置中的依赖列表
    List {
        /// 指定列表名称，打印其中的包
        name: Option<String>,
        /// 输出格式 (plain/json)
        #[arg(short, long, default_value = "plain")]
        format: String,
    },

    /// 检查当前分支所需的外部工具是否在 PATH 中
    Doctor,
}
