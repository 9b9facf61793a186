//! CLI 集成测试
//!
//! 使用 assert_cmd 进行命令行集成测试。
//! 所有用例都清空进程环境后显式注入变量，避免宿主 CI 环境干扰。

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::TempDir;

/// 获取 prov 命令，清空继承环境
fn prov() -> Command {
    let mut cmd = Command::cargo_bin("prov").unwrap();
    cmd.env_clear();
    cmd
}

mod basic_commands {
    use super::*;

    #[test]
    fn test_help_command() {
        prov()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("prov"));
    }

    #[test]
    fn test_version_command() {
        prov().arg("--version").assert().success();
    }
}

mod resolve_command {
    use super::*;

    #[test]
    fn test_resolve_ubuntu_python3_from_env() {
        prov()
            .arg("resolve")
            .env("PROV_OS_NAME", "linux")
            .env("UBUNTU_VERSION", "20.04")
            .env("PROV_PYTHON_VERSION", "3.8")
            .assert()
            .success()
            .stdout(predicate::str::contains("os: ubuntu"))
            .stdout(predicate::str::contains("branch: ubuntu-container (20.04)"))
            .stdout(predicate::str::contains("dependency_sets: dpkg_python3"));
    }

    #[test]
    fn test_resolve_honors_cli_overrides() {
        prov()
            .arg("resolve")
            .env("TRAVIS_OS_NAME", "linux")
            .arg("--os")
            .arg("osx")
            .assert()
            .success()
            .stdout(predicate::str::contains("os: macos"))
            .stdout(predicate::str::contains("dependency_sets: l2tbinaries"));
    }

    #[test]
    fn test_unresolved_environment_fails_with_code_one() {
        prov()
            .arg("resolve")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("环境未解析"));
    }
}

mod plan_command {
    use super::*;

    #[test]
    fn test_bare_ubuntu_plan_shape() {
        let assert = prov()
            .arg("plan")
            .env("PROV_OS_NAME", "ubuntu")
            .assert()
            .success()
            .stdout(predicate::str::contains("add-apt-repository ppa:gift/dev -y"))
            .stdout(predicate::str::contains("apt-get update -q"))
            .stdout(predicate::str::contains("apt-get install -y"));

        // 裸机分支恰好三步
        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert_eq!(stdout.lines().count(), 3);
    }

    #[test]
    fn test_batch_install_contains_every_package() {
        let assert = prov()
            .arg("plan")
            .env("PROV_OS_NAME", "ubuntu")
            .env("PROV_PYTHON_VERSION", "3")
            .assert()
            .success();

        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        let batch = stdout
            .lines()
            .find(|l| l.starts_with("apt-get install"))
            .expect("应有批量安装行");
        for package in ["python3-yaml", "python3-dfvfs", "libewf-python3"] {
            assert!(batch.contains(package), "缺少 {}", package);
        }
    }

    #[test]
    fn test_macos_plan_clones_then_mounts_images() {
        prov()
            .arg("plan")
            .arg("--os")
            .arg("osx")
            .assert()
            .success()
            .stdout(predicate::str::contains("git clone"))
            .stdout(predicate::str::contains("hdiutil attach"))
            .stdout(predicate::str::contains("installer -target /"))
            .stdout(predicate::str::contains("hdiutil detach"));
    }

    #[test]
    fn test_fedora_container_plan_uses_docker() {
        prov()
            .arg("plan")
            .env("TRAVIS_OS_NAME", "linux")
            .env("FEDORA_VERSION", "33")
            .assert()
            .success()
            .stdout(predicate::str::contains("docker pull fedora:33"))
            .stdout(predicate::str::contains("dnf install -y"))
            .stdout(predicate::str::contains("docker cp"));
    }

    #[test]
    fn test_pylint_target_appends_lint_package() {
        prov()
            .arg("plan")
            .env("PROV_OS_NAME", "ubuntu")
            .env("TARGET", "pylint")
            .assert()
            .success()
            .stdout(predicate::str::contains("pylint"));
    }
}

mod provision_command {
    use super::*;

    #[test]
    fn test_dry_run_prints_plan_without_executing() {
        prov()
            .arg("provision")
            .arg("--dry-run")
            .env("PROV_OS_NAME", "ubuntu")
            .assert()
            .success()
            .stdout(predicate::str::contains("apt-get install -y"));
    }
}

mod list_command {
    use super::*;

    #[test]
    fn test_list_set_names() {
        prov()
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("dpkg_python2"))
            .stdout(predicate::str::contains("dpkg_python3"))
            .stdout(predicate::str::contains("rpm_python3"))
            .stdout(predicate::str::contains("l2tbinaries"));
    }

    #[test]
    fn test_list_one_set_plain() {
        prov()
            .arg("list")
            .arg("dpkg_python3")
            .assert()
            .success()
            .stdout(predicate::str::contains("python3-yaml"));
    }

    #[test]
    fn test_list_one_set_json() {
        prov()
            .arg("list")
            .arg("dpkg_python3")
            .arg("--format")
            .arg("json")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"python3-yaml\""));
    }

    #[test]
    fn test_list_unknown_set_fails() {
        prov()
            .arg("list")
            .arg("no_such_set")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("未知依赖列表"));
    }
}

mod config_file {
    use super::*;

    fn write_config(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("depsets.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
            [settings]
            container_name = "ci-box"
            fedora_image = "fedora"
            ubuntu_image = "ubuntu"
            ppa = "ppa:custom/stable"
            binaries_repo = "https://example.com/binaries.git"
            binaries_dir = "binaries"
            source_dir = "."
            container_dest = "/srv/"

            [dependency_sets]
            dpkg_python3 = ["python3-yaml", "python3-six"]
            "#
        )
        .unwrap();
        path
    }

    #[test]
    fn test_custom_config_replaces_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir);

        prov()
            .arg("plan")
            .arg("--config")
            .arg(&path)
            .env("PROV_OS_NAME", "ubuntu")
            .assert()
            .success()
            .stdout(predicate::str::contains("ppa:custom/stable"))
            .stdout(predicate::str::contains("apt-get install -y python3-yaml python3-six"));
    }

    #[test]
    fn test_config_via_environment_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir);

        prov()
            .arg("list")
            .env("PROV_CONFIG", &path)
            .assert()
            .success()
            .stdout(predicate::str::contains("dpkg_python3"));
    }

    #[test]
    fn test_missing_config_file_fails() {
        prov()
            .arg("list")
            .arg("--config")
            .arg("/nonexistent/depsets.toml")
            .assert()
            .failure()
            .code(1);
    }
}
