//! doctor 命令：检查当前分支所需的外部工具是否就位

use crate::types::Branch;
use std::path::Path;

/// 分支对应的外部协作工具
pub fn required_tools(branch: &Branch) -> &'static [&'static str] {
    match branch {
        Branch::MacOs => &["git", "hdiutil", "installer"],
        Branch::FedoraContainer(_) | Branch::UbuntuContainer(_) => &["docker"],
        Branch::UbuntuHost => &["add-apt-repository", "apt-get"],
    }
}

/// 在 PATH 中查找可执行文件
pub fn tool_on_path(name: &str) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path_var).any(|dir| is_executable(&dir.join(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// 打印诊断报告，返回缺失工具数量
pub fn report(branch: &Branch) -> usize {
    println!("🔍 环境配备诊断\n");
    println!("分支: {} | 平台: {}", branch, std::env::consts::OS);
    println!("──────────────────────────────────────────────\n");

    let mut missing = 0;
    for tool in required_tools(branch) {
        if tool_on_path(tool) {
            println!("   ✓ {}", tool);
        } else {
            println!("   ❌ {} 不在 PATH 中", tool);
            missing += 1;
        }
    }

    println!();
    if missing == 0 {
        println!("✓ 所需工具齐全");
    } else {
        println!("❌ 缺失 {} 个工具", missing);
    }
    missing
}
