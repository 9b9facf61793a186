//! 外部命令执行器 (分离原则：执行接口与系统实现分离)
//!
//! 所有平台都继承父进程的 stdin/stdout/stderr，
//! 失败命令的诊断输出因此原样可见，无额外包装。

use crate::error::{ProvError, Result};
use crate::plan::ExecutionStep;
use std::process::{Command, Stdio};

/// 命令执行接口，测试中用记录式 mock 替换
pub trait CommandRunner {
    /// 执行一条命令，阻塞到子进程结束，返回退出码
    fn run(&mut self, step: &ExecutionStep) -> Result<i32>;
}

/// 真实系统执行器
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, step: &ExecutionStep) -> Result<i32> {
        let mut cmd = Command::new(&step.program);
        cmd.args(&step.args);

        // 继承标准流
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = cmd.status().map_err(|e| {
            ProvError::CommandNotFound(format!(
                "{}: {} (请确保命令在 PATH 中或使用完整路径)",
                step.program, e
            ))
        })?;

        Ok(status.code().unwrap_or(1))
    }
}

/// 环境配备器：严格顺序执行计划，首个失败立即终止
pub struct Provisioner<R: CommandRunner> {
    runner: R,
    verbose: bool,
}

impl<R: CommandRunner> Provisioner<R> {
    pub fn new(runner: R, verbose: bool) -> Self {
        Self { runner, verbose }
    }

    /// 顺序执行全部步骤。快速失败：任一步骤退出码非零即返回错误，
    /// 后续步骤不再执行，不重试，不回滚。
    pub fn run(&mut self, plan: &[ExecutionStep]) -> Result<()> {
        for (index, step) in plan.iter().enumerate() {
            if self.verbose {
                println!("[{}/{}] {}", index + 1, plan.len(), step);
            }

            let code = self.runner.run(step)?;
            if code != 0 {
                return Err(ProvError::CommandFailed {
                    program: step.program.clone(),
                    code,
                });
            }
        }
        Ok(())
    }
}
