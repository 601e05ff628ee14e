//! End-to-end tests for the scene-tools CLI
//!
//! These tests:
//! 1. Lay out a scratch repository with a scenes file
//! 2. Install the `mock_runner` binary as the external tools (or a build
//!    script that installs it)
//! 3. Run `scene-tools` and check exit codes, invocations and outputs

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
#[cfg(unix)]
use std::process::Stdio;
#[cfg(unix)]
use std::time::{Duration, Instant};

const SCENES: &str = "tools/layoutdump_scenes.json";
const LAYOUT_EXE: &str = "zig-out/bin/luau-layout-dump.exe";
const RUNNER_EXE: &str = "zig-out/bin/luau-native-runner.exe";

/// Test context with a scratch repository
struct TestContext {
    /// Scratch directory, removed on drop
    temp: tempfile::TempDir,
    /// Repository root
    root: PathBuf,
    /// Where the mock tools log their command lines
    log: PathBuf,
    /// Extra environment for the next runs
    envs: Vec<(String, String)>,
}

impl TestContext {
    /// Create a repository with the given scenes document
    fn new(scenes: &str) -> Self {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp.path().join("repo");
        fs::create_dir_all(root.join("tools")).expect("Failed to create tools dir");
        fs::write(root.join(SCENES), scenes).expect("Failed to write scenes");
        let log = temp.path().join("mock.log");

        Self {
            temp,
            root,
            log,
            envs: Vec::new(),
        }
    }

    /// Install the mock binary at a repo-relative path
    fn install_tool(&self, rel: &str) {
        let dest = self.root.join(rel);
        fs::create_dir_all(dest.parent().unwrap()).expect("Failed to create bin dir");
        fs::copy(mock_runner_binary(), &dest).expect("Failed to install mock tool");
    }

    /// Write the build script invoked when a tool is missing
    fn write_build_script(&self, body: &str) {
        fs::write(self.root.join("zig_build_simple.sh"), body)
            .expect("Failed to write build script");
    }

    fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Run scene-tools with `--repo-root` pointing at the scratch repo
    fn run(&self, args: &[&str]) -> ToolOutput {
        let mut full = vec!["--repo-root", self.root.to_str().unwrap()];
        full.extend_from_slice(args);
        self.run_in(&self.root, &full)
    }

    /// Run scene-tools from a given working directory
    fn run_in(&self, cwd: &Path, args: &[&str]) -> ToolOutput {
        let output = self
            .command(cwd, args)
            .output()
            .expect("Failed to run scene-tools");

        ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }

    /// scene-tools command with the isolated test environment applied
    fn command(&self, cwd: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_scene-tools"));
        cmd.args(args)
            .current_dir(cwd)
            .env("XDG_CONFIG_HOME", self.temp.path().join("config"))
            .env("NO_COLOR", "1")
            .env("MOCK_RUNNER_LOG", &self.log)
            .env("MOCK_EXE", mock_runner_binary())
            .env_remove("RUST_LOG");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Command lines the mock tools received, in order
    fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Output from a scene-tools run
#[derive(Debug)]
struct ToolOutput {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

impl ToolOutput {
    fn assert_ok(&self) {
        assert_eq!(
            self.code,
            Some(0),
            "scene-tools failed:\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
    }
}

fn mock_runner_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mock_runner"))
}

/// Poll `check` until it holds or the timeout passes
#[cfg(unix)]
fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    check()
}

/// Whether `pid` names a live process; zombies count as gone
#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    let signalable = Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success());
    if !signalable {
        return false;
    }
    match fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => !stat
            .rsplit(')')
            .next()
            .is_some_and(|rest| rest.trim_start().starts_with('Z')),
        Err(_) => true,
    }
}

// ============== Layout dump ==============

#[test]
fn test_layout_default_selects_docs_scenes() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}, "docs_b": {}}}"#);
    ctx.install_tool(LAYOUT_EXE);

    let output = ctx.run(&["layout-dump", "--init-baselines"]);
    output.assert_ok();

    assert_eq!(
        ctx.invocations(),
        vec![format!("--scenes {} docs_b --update-baseline", SCENES)]
    );
    assert!(ctx.root.join("snapshots/docs_b.layout.json").exists());
    assert!(!ctx.root.join("snapshots/a.layout.json").exists());
}

#[test]
fn test_layout_init_then_verify() {
    let ctx = TestContext::new(
        r#"{"scenes": {"docs_a": {}, "docs_b": {"baseline": "custom/b.json"}}}"#,
    );
    ctx.install_tool(LAYOUT_EXE);

    ctx.run(&["layout-dump", "--init-baselines"]).assert_ok();
    assert!(ctx.root.join("custom/b.json").exists());

    // Baselines exist now: init mode no longer asks for updates
    ctx.run(&["layout-dump", "--init-baselines"]).assert_ok();
    ctx.run(&["layout-dump"]).assert_ok();

    let calls = ctx.invocations();
    assert_eq!(calls.len(), 6);
    assert!(calls[0].ends_with("docs_a --update-baseline"));
    assert!(calls[1].ends_with("docs_b --update-baseline"));
    assert!(calls[2..].iter().all(|c| !c.contains("--update-baseline")));
}

#[test]
fn test_layout_update_all_scenes() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}, "docs_b": {}}}"#);
    ctx.install_tool(LAYOUT_EXE);

    let output = ctx.run(&["layout-dump", "--all", "--update-baselines"]);
    output.assert_ok();

    let calls = ctx.invocations();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains(" a --update-baseline"));
    assert!(calls[1].contains(" docs_b --update-baseline"));
    assert!(output.stdout.contains("2 baseline(s) written"));
}

#[test]
fn test_layout_only() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}, "b": {}, "docs_c": {}}}"#);
    ctx.install_tool(LAYOUT_EXE);

    ctx.run(&["layout-dump", "--only", "b", "a", "--update-baselines"])
        .assert_ok();

    let calls = ctx.invocations();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains(" a "));
    assert!(calls[1].contains(" b "));
}

#[test]
fn test_layout_failure_aborts_run() {
    let mut ctx = TestContext::new(r#"{"scenes": {"docs_a": {}, "docs_b": {}, "docs_c": {}}}"#);
    ctx.install_tool(LAYOUT_EXE);
    ctx.env("MOCK_RUNNER_FAIL_SCENE", "docs_b");

    let output = ctx.run(&["layout-dump", "--update-baselines"]);

    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Error:"), "stderr: {}", output.stderr);
    assert_eq!(ctx.invocations().len(), 2);
    assert!(!ctx.root.join("snapshots/docs_c.layout.json").exists());
}

// ============== Screenshots ==============

#[test]
fn test_screenshot_all_scenes() {
    let ctx = TestContext::new(
        r#"{"scenes": {
            "docs_a": {"width": 800, "height": 600},
            "b": {"pixelWidth": 2560, "pixelHeight": 1440, "appModule": "apps/b"}
        }}"#,
    );
    ctx.install_tool(RUNNER_EXE);

    ctx.run(&["screenshot"]).assert_ok();

    assert_eq!(
        ctx.invocations(),
        vec![
            "--lua-entry luau/index.luau --app-module apps/b --width 1280 --height 720 \
             --screenshot-auto --screenshot-out artifacts/b.png \
             --pixel-width 2560 --pixel-height 1440"
                .to_string(),
            "--lua-entry luau/index.luau --width 800 --height 600 \
             --screenshot-auto --screenshot-out artifacts/docs_a.png"
                .to_string(),
        ]
    );
    assert!(ctx.root.join("artifacts/b.png").exists());
    assert!(ctx.root.join("artifacts/docs_a.png").exists());
}

#[test]
fn test_screenshot_missing_output() {
    let mut ctx = TestContext::new(r#"{"scenes": {"a": {}, "b": {}}}"#);
    ctx.install_tool(RUNNER_EXE);
    ctx.env("MOCK_RUNNER_SKIP_OUTPUT", "1");

    let output = ctx.run(&["screenshot"]);

    assert_eq!(output.code, Some(1));
    assert!(
        output.stderr.contains("missing screenshot: artifacts/a.png"),
        "stderr: {}",
        output.stderr
    );
    assert_eq!(ctx.invocations().len(), 1);
}

#[test]
fn test_screenshot_only_one_scene() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}, "b": {}}}"#);
    ctx.install_tool(RUNNER_EXE);

    ctx.run(&["screenshot", "--only", "b"]).assert_ok();

    assert_eq!(ctx.invocations().len(), 1);
    assert!(!ctx.root.join("artifacts/a.png").exists());
    assert!(ctx.root.join("artifacts/b.png").exists());
}

#[cfg(unix)]
#[test]
fn test_interrupt_exits_130_and_kills_tool() {
    let mut ctx = TestContext::new(r#"{"scenes": {"a": {}, "b": {}}}"#);
    ctx.install_tool(RUNNER_EXE);
    let pid_file = ctx.temp.path().join("mock.pid");
    ctx.env("MOCK_RUNNER_SLEEP", "60");
    ctx.env("MOCK_RUNNER_PID_FILE", pid_file.to_str().unwrap());

    let root = ctx.root.to_str().unwrap().to_string();
    let child = ctx
        .command(&ctx.root, &["--repo-root", &root, "screenshot"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start scene-tools");

    let mut tool_pid = None;
    let started = wait_until(Duration::from_secs(20), || {
        tool_pid = fs::read_to_string(&pid_file)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok());
        tool_pid.is_some()
    });
    assert!(started, "mock tool never started");
    let tool_pid = tool_pid.unwrap();

    let sent = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to run kill");
    assert!(sent.success());

    let output = child.wait_with_output().expect("Failed to wait for scene-tools");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(130), "stderr: {}", stderr);
    assert!(!stderr.contains("Error:"), "stderr: {}", stderr);

    assert!(
        wait_until(Duration::from_secs(5), || !process_alive(tool_pid)),
        "mock tool {} outlived scene-tools",
        tool_pid
    );
    assert_eq!(ctx.invocations().len(), 1);
    assert!(!ctx.root.join("artifacts/a.png").exists());
}

// ============== Bootstrapping ==============

#[cfg(unix)]
#[test]
fn test_failed_build_aborts_before_any_scene() {
    let ctx = TestContext::new(r#"{"scenes": {"docs_a": {}}}"#);
    ctx.write_build_script("echo building >&2\nexit 1\n");

    let output = ctx.run(&["layout-dump"]);

    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("build command"), "stderr: {}", output.stderr);
    assert!(ctx.invocations().is_empty());
}

#[cfg(unix)]
#[test]
fn test_build_that_produces_nothing() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}}}"#);
    ctx.write_build_script("exit 0\n");

    let output = ctx.run(&["screenshot"]);

    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("missing exe"), "stderr: {}", output.stderr);
}

#[cfg(unix)]
#[test]
fn test_build_installs_missing_tool() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}}}"#);
    ctx.write_build_script(&format!(
        "mkdir -p zig-out/bin && cp \"$MOCK_EXE\" {}\n",
        RUNNER_EXE
    ));

    ctx.run(&["screenshot"]).assert_ok();

    assert!(ctx.root.join(RUNNER_EXE).exists());
    assert!(ctx.root.join("artifacts/a.png").exists());
}

// ============== Configuration ==============

#[test]
fn test_invalid_scenes_file() {
    let ctx = TestContext::new(r#"{"scenes": [1, 2, 3]}"#);
    ctx.install_tool(LAYOUT_EXE);

    let output = ctx.run(&["layout-dump", "--all"]);

    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("invalid scenes file"), "stderr: {}", output.stderr);
    assert!(ctx.invocations().is_empty());
}

#[test]
fn test_unselected_malformed_scene_is_ignored() {
    let ctx = TestContext::new(
        r#"{"scenes": {"_comment": "shared with the runner", "docs_a": {}}}"#,
    );
    ctx.install_tool(LAYOUT_EXE);

    ctx.run(&["layout-dump", "--update-baselines"]).assert_ok();
    assert!(ctx.root.join("snapshots/docs_a.layout.json").exists());

    // Selecting it is still an error
    let output = ctx.run(&["layout-dump", "--only", "_comment"]);
    assert_eq!(output.code, Some(1));
    assert!(
        output.stderr.contains("invalid scene config: _comment"),
        "stderr: {}",
        output.stderr
    );
    assert_eq!(ctx.invocations().len(), 1);
}

#[test]
fn test_malformed_config_file_is_one_line() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}}}"#);
    fs::write(ctx.root.join("scene-tools.toml"), "build_command = \"oops\n").unwrap();

    let output = ctx.run(&["list"]);

    assert_eq!(output.code, Some(1));
    let lines: Vec<_> = output.stderr.lines().collect();
    assert_eq!(lines.len(), 1, "stderr: {}", output.stderr);
    assert!(lines[0].starts_with("Error: invalid configuration file:"), "{}", lines[0]);
    assert!(lines[0].contains("line 1"), "{}", lines[0]);
}

#[test]
fn test_custom_scenes_path_is_passed_through() {
    let ctx = TestContext::new(r#"{"scenes": {}}"#);
    fs::write(
        ctx.root.join("tools/other.json"),
        r#"{"scenes": {"docs_x": {}}}"#,
    )
    .unwrap();
    ctx.install_tool(LAYOUT_EXE);

    ctx.run(&["layout-dump", "--scenes", "tools/other.json", "--update-baselines"])
        .assert_ok();

    assert_eq!(
        ctx.invocations(),
        vec!["--scenes tools/other.json docs_x --update-baseline".to_string()]
    );
}

#[test]
fn test_repo_config_overrides_default_prefix() {
    let ctx = TestContext::new(r#"{"scenes": {"docs_a": {}, "guide_b": {}}}"#);
    fs::write(
        ctx.root.join("scene-tools.toml"),
        "[layout_dump]\ndefault_prefix = \"guide_\"\n",
    )
    .unwrap();
    ctx.install_tool(LAYOUT_EXE);

    ctx.run(&["layout-dump", "--update-baselines"]).assert_ok();

    let calls = ctx.invocations();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("guide_b"));
}

#[test]
fn test_repo_root_discovered_from_subdirectory() {
    let ctx = TestContext::new(r#"{"scenes": {"a": {}}}"#);
    ctx.write_build_script("exit 1\n");
    ctx.install_tool(RUNNER_EXE);

    let output = ctx.run_in(&ctx.root.join("tools"), &["screenshot"]);
    output.assert_ok();
    assert!(ctx.root.join("artifacts/a.png").exists());
}

#[test]
fn test_list_json() {
    let ctx =
        TestContext::new(r#"{"scenes": {"b": {"width": 640}, "a": {"baseline": "x/a.json"}}}"#);

    let output = ctx.run(&["list", "--json"]);
    output.assert_ok();

    let listing: serde_json::Value = serde_json::from_str(&output.stdout).expect("valid JSON");
    let scenes = listing.as_array().unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0]["name"], "a");
    assert!(scenes[0]["baseline"].as_str().unwrap().ends_with("x/a.json"));
    assert_eq!(scenes[1]["width"], 640);
    assert_eq!(scenes[1]["height"], 720);
    assert!(ctx.invocations().is_empty());
}

#[test]
fn test_scene_registry_from_library() {
    // Exercises the public loader without a subprocess
    use scene_tools::{ErrorCategory, SceneRegistry};

    let reg = SceneRegistry::from_json_str(r#"{"scenes": {"a": {}, "docs_b": {}}}"#).unwrap();
    assert_eq!(reg.names().collect::<Vec<_>>(), vec!["a", "docs_b"]);

    let err = SceneRegistry::from_json_str(r#"{"nope": {}}"#).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Config);
}
