//! 执行计划构建 (表达原则：先算出完整步骤序列，再执行)
//!
//! 把已解析的上下文 + 配置映射为一串外部命令调用。
//! 映射是穷尽的：每个上下文恰好落在一个分支，
//! 依赖列表选择对所有支持的组合都是全函数。

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::types::{Branch, EnvironmentContext, PythonVersion};
use std::fmt;

/// 步骤类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// 包安装 (含索引刷新、仓库源添加)
    PackageInstall,
    /// 容器操作 (pull / run / cp)
    ContainerOp,
    /// 磁盘镜像操作 (attach / detach)
    DiskImageOp,
    /// 源码克隆
    CloneOp,
}

/// 一次外部命令调用，按需即时生成，不持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStep {
    pub kind: StepKind,
    pub program: String,
    pub args: Vec<String>,
}

impl ExecutionStep {
    fn new(kind: StepKind, program: &str, args: &[&str]) -> Self {
        Self {
            kind,
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for ExecutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 上下文 → 依赖列表名称 (静态映射表，穷尽匹配)
pub fn dependency_set_names(ctx: &EnvironmentContext) -> Result<Vec<String>> {
    let branch = ctx.branch()?;

    let mut names = match (&branch, ctx.python) {
        (Branch::MacOs, _) => vec!["l2tbinaries".to_string()],
        (Branch::FedoraContainer(_), PythonVersion::Python2) => vec!["rpm_python2".to_string()],
        (Branch::FedoraContainer(_), PythonVersion::Python3) => vec!["rpm_python3".to_string()],
        (Branch::UbuntuContainer(_) | Branch::UbuntuHost, PythonVersion::Python2) => {
            vec!["dpkg_python2".to_string()]
        }
        (Branch::UbuntuContainer(_) | Branch::UbuntuHost, PythonVersion::Python3) => {
            vec!["dpkg_python3".to_string()]
        }
    };

    // pylint 目标在 Linux 分支追加 lint 依赖
    if !matches!(branch, Branch::MacOs) && ctx.test_target.as_deref() == Some("pylint") {
        names.push("pylint".to_string());
    }

    Ok(names)
}

/// 构建完整执行计划
pub fn build_plan(ctx: &EnvironmentContext, config: &ProvisionConfig) -> Result<Vec<ExecutionStep>> {
    let mut packages: Vec<String> = Vec::new();
    for name in dependency_set_names(ctx)? {
        packages.extend(config.dependency_set(&name)?.iter().cloned());
    }

    let settings = &config.settings;
    let mut steps = Vec::new();

    match ctx.branch()? {
        Branch::MacOs => {
            // 克隆一次，随后按列表顺序逐包 attach / install / detach
            steps.push(ExecutionStep::new(
                StepKind::CloneOp,
                "git",
                &["clone", "--depth", "1", &settings.binaries_repo, &settings.binaries_dir],
            ));
            for package in &packages {
                let dmg = format!("{}/{}.dmg", settings.binaries_dir, package);
                let pkg = format!("/Volumes/{}/{}.pkg", package, package);
                let volume = format!("/Volumes/{}", package);
                steps.push(ExecutionStep::new(
                    StepKind::DiskImageOp,
                    "hdiutil",
                    &["attach", &dmg],
                ));
                steps.push(ExecutionStep::new(
                    StepKind::PackageInstall,
                    "installer",
                    &["-target", "/", "-pkg", &pkg],
                ));
                steps.push(ExecutionStep::new(
                    StepKind::DiskImageOp,
                    "hdiutil",
                    &["detach", &volume],
                ));
            }
        }

        Branch::FedoraContainer(version) => {
            let image = format!("{}:{}", settings.fedora_image, version);
            let dest = format!("{}:{}", settings.container_name, settings.container_dest);
            steps.push(ExecutionStep::new(StepKind::ContainerOp, "docker", &["pull", &image]));
            steps.push(ExecutionStep::new(
                StepKind::ContainerOp,
                "docker",
                &["run", "-d", "--name", &settings.container_name, &image, "sleep", "infinity"],
            ));
            let mut install = vec![
                "exec".to_string(),
                settings.container_name.clone(),
                "dnf".to_string(),
                "install".to_string(),
                "-y".to_string(),
            ];
            install.extend(packages.iter().cloned());
            steps.push(ExecutionStep {
                kind: StepKind::PackageInstall,
                program: "docker".to_string(),
                args: install,
            });
            steps.push(ExecutionStep::new(
                StepKind::ContainerOp,
                "docker",
                &["cp", &settings.source_dir, &dest],
            ));
        }

        Branch::UbuntuContainer(version) => {
            let image = format!("{}:{}", settings.ubuntu_image, version);
            let dest = format!("{}:{}", settings.container_name, settings.container_dest);
            steps.push(ExecutionStep::new(StepKind::ContainerOp, "docker", &["pull", &image]));
            steps.push(ExecutionStep::new(
                StepKind::ContainerOp,
                "docker",
                &["run", "-d", "--name", &settings.container_name, &image, "sleep", "infinity"],
            ));
            steps.push(ExecutionStep::new(
                StepKind::PackageInstall,
                "docker",
                &["exec", &settings.container_name, "apt-get", "update", "-q"],
            ));
            let mut install = vec![
                "exec".to_string(),
                settings.container_name.clone(),
                "apt-get".to_string(),
                "install".to_string(),
                "-y".to_string(),
            ];
            install.extend(packages.iter().cloned());
            steps.push(ExecutionStep {
                kind: StepKind::PackageInstall,
                program: "docker".to_string(),
                args: install,
            });
            steps.push(ExecutionStep::new(
                StepKind::ContainerOp,
                "docker",
                &["cp", &settings.source_dir, &dest],
            ));
        }

        Branch::UbuntuHost => {
            steps.push(ExecutionStep::new(
                StepKind::PackageInstall,
                "add-apt-repository",
                &[&settings.ppa, "-y"],
            ));
            steps.push(ExecutionStep::new(
                StepKind::PackageInstall,
                "apt-get",
                &["update", "-q"],
            ));
            let mut install = vec!["install".to_string(), "-y".to_string()];
            install.extend(packages.iter().cloned());
            steps.push(ExecutionStep {
                kind: StepKind::PackageInstall,
                program: "apt-get".to_string(),
                args: install,
            });
        }
    }

    Ok(steps)
}
