//! ProvCLI 主程序入口
//!
//! 设计原则：
//! - 模块化：入口代码简洁，逻辑委托给各模块
//! - 环境变量只在此处快照一次，以显式结构传入各模块
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换
//! - 退出码：成功为 0，外部命令失败原样传播其退出码

use clap::Parser;
use provcli::cli::{Cli, Commands};
use provcli::config::ProvisionConfig;
use provcli::error::{ProvError, Result};
use provcli::executor::{Provisioner, SystemRunner};
use provcli::types::{ContextOverrides, EnvironmentContext};
use provcli::{doctor, plan};
use std::collections::HashMap;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match run_command(cli) {
        Ok(_) => {
            // 静默成功 - 各命令自行决定输出
        }
        Err(e) => {
            e.report(verbose);
            std::process::exit(e.exit_code());
        }
    }
}

/// 环境变量快照 — 整个进程中唯一的 ambient 读取点
fn snapshot_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// 配置文件路径：--config 优先，其次 PROV_CONFIG
fn config_path(cli_path: Option<PathBuf>, env: &HashMap<String, String>) -> Option<PathBuf> {
    cli_path.or_else(|| env.get("PROV_CONFIG").map(PathBuf::from))
}

/// 运行具体命令
fn run_command(cli: Cli) -> Result<()> {
    let env = snapshot_env();
    let overrides = ContextOverrides {
        os: cli.os,
        distro_version: cli.distro_version,
        python: cli.python,
        target: cli.target,
    };
    let config = ProvisionConfig::load(config_path(cli.config, &env).as_deref())?;

    match cli.command {
        Commands::Provision { dry_run } => {
            let ctx = EnvironmentContext::resolve(&env, &overrides)?;
            let steps = plan::build_plan(&ctx, &config)?;

            if dry_run {
                for step in &steps {
                    println!("{}", step);
                }
                return Ok(());
            }

            let mut provisioner = Provisioner::new(SystemRunner, cli.verbose);
            provisioner.run(&steps)?;
            if cli.verbose {
                println!("✓ 配备完成 ({} 步)", steps.len());
            }
        }

        Commands::Plan => {
            let ctx = EnvironmentContext::resolve(&env, &overrides)?;
            for step in plan::build_plan(&ctx, &config)? {
                println!("{}", step);
            }
        }

        Commands::Resolve => {
            let ctx = EnvironmentContext::resolve(&env, &overrides)?;
            println!("os: {}", ctx.os_family);
            println!(
                "distro_version: {}",
                ctx.distro_version.as_deref().unwrap_or("-")
            );
            println!("python: {}", ctx.python);
            println!("target: {}", ctx.test_target.as_deref().unwrap_or("-"));
            println!("branch: {}", ctx.branch()?);
            println!(
                "dependency_sets: {}",
                plan::dependency_set_names(&ctx)?.join(", ")
            );
        }

        Commands::List { name, format } => match name {
            Some(name) => {
                let packages = config.dependency_set(&name)?;
                if format == "json" {
                    println!("{}", serde_json::to_string_pretty(packages)?);
                } else {
                    for package in packages {
                        println!("{}", package);
                    }
                }
            }
            None => {
                if format == "json" {
                    println!("{}", serde_json::to_string_pretty(&config.sorted_sets())?);
                } else {
                    for name in config.set_names() {
                        println!("{}", name);
                    }
                }
            }
        },

        Commands::Doctor => {
            let ctx = EnvironmentContext::resolve(&env, &overrides)?;
            let missing = doctor::report(&ctx.branch()?);
            if missing > 0 {
                return Err(ProvError::CommandNotFound(format!(
                    "{} 个所需工具缺失",
                    missing
                )));
            }
        }
    }

    Ok(())
}
