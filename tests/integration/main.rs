//! Integration tests for imgfresh

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and token
    fn imgfresh(config_dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("imgfresh");
        cmd.env("IMGFRESH_CONFIG", config_dir.path().join("config.toml"))
            .env_remove("GHCR_TOKEN");
        cmd
    }

    #[test]
    fn help_displays() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(
                predicate::str::contains("latest published image")
                    .or(predicate::str::contains("freshness checker")),
            )
            .stdout(predicate::str::contains("check"));
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("imgfresh"));
    }

    #[test]
    fn config_path() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[runtime]"))
            .stdout(predicate::str::contains("command = \"docker\""));
    }

    #[test]
    fn config_set_then_show() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["config", "set", "registry.ghcr_token", "ghp_secret"])
            .assert()
            .success();

        imgfresh(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("********"))
            .stdout(predicate::str::contains("ghp_secret").not());
    }

    #[test]
    fn config_set_unknown_key() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[registry]\ntimeout_secs = \"x\"\n")
            .unwrap();

        imgfresh(&dir)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn completions_bash() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("imgfresh"));
    }

    #[test]
    fn resolve_unsupported_registry() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["resolve", "quay.io/prometheus/node-exporter:v1.8.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported registry quay.io"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn resolve_ghcr_without_token() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["resolve", "ghcr.io/esphome/esphome:2024.6"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("GHCR token missing"));
    }

    #[test]
    fn check_rejects_unknown_runtime() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["check", "--runtime", "containerd"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported container runtime"));
    }

    #[test]
    fn check_rejects_unknown_format() {
        let dir = TempDir::new().unwrap();
        imgfresh(&dir)
            .args(["check", "--format", "yaml"])
            .assert()
            .failure();
    }
}
