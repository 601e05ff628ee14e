//! Mock external tool for integration testing
//!
//! Copied into a scratch repo under the names of both the layout dump tool
//! and the native runner. The mode is picked from the arguments:
//! `--scenes` means layout dump, `--lua-entry` means native runner.
//!
//! Environment knobs:
//! - `MOCK_RUNNER_LOG`: append each command line to this file
//! - `MOCK_RUNNER_EXIT_CODE`: exit with this code without doing anything
//! - `MOCK_RUNNER_FAIL_SCENE`: exit 3 when this scene is requested
//! - `MOCK_RUNNER_SKIP_OUTPUT`: exit 0 without writing the screenshot
//! - `MOCK_RUNNER_PID_FILE`: write this process id to the file on startup
//! - `MOCK_RUNNER_SLEEP`: block for this many seconds before doing anything

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use scene_tools::drivers::layout::baseline_path;
use scene_tools::SceneRegistry;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Ok(log) = std::env::var("MOCK_RUNNER_LOG") {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log)
            .expect("open mock log");
        writeln!(file, "{}", args.join(" ")).expect("write mock log");
    }

    if let Ok(pid_file) = std::env::var("MOCK_RUNNER_PID_FILE") {
        // Rename into place so readers never see a partial write
        let tmp = format!("{}.tmp", pid_file);
        std::fs::write(&tmp, std::process::id().to_string()).expect("write pid file");
        std::fs::rename(&tmp, &pid_file).expect("publish pid file");
    }

    if let Some(secs) = std::env::var("MOCK_RUNNER_SLEEP")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        std::thread::sleep(Duration::from_secs(secs));
    }

    if let Some(code) = std::env::var("MOCK_RUNNER_EXIT_CODE")
        .ok()
        .and_then(|c| c.parse::<i32>().ok())
    {
        std::process::exit(code);
    }

    let code = if has_flag(&args, "--scenes") {
        layout_dump(&args)
    } else if has_flag(&args, "--lua-entry") {
        native_runner(&args)
    } else {
        eprintln!("mock_runner: unrecognized arguments: {:?}", args);
        64
    };
    std::process::exit(code);
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).map(String::as_str)
}

fn fails(scene: &str) -> bool {
    std::env::var("MOCK_RUNNER_FAIL_SCENE").is_ok_and(|s| s == scene)
}

/// `--scenes <path> <scene> [--update-baseline]`
fn layout_dump(args: &[String]) -> i32 {
    let cwd = std::env::current_dir().expect("cwd");
    let scenes = flag_value(args, "--scenes").expect("--scenes value");
    let Some(scene_name) = args
        .iter()
        .skip_while(|a| a.as_str() != "--scenes")
        .nth(2)
        .filter(|a| !a.starts_with("--"))
    else {
        eprintln!("mock_runner: missing scene name");
        return 64;
    };

    if fails(scene_name) {
        eprintln!("mock_runner: layout mismatch in {}", scene_name);
        return 3;
    }

    let registry = SceneRegistry::load(&cwd.join(scenes)).expect("load scenes");
    let scene = match registry.get(scene_name) {
        Some(Ok(scene)) => scene,
        Some(Err(e)) => {
            eprintln!("mock_runner: {}", e);
            return 2;
        }
        None => {
            eprintln!("mock_runner: unknown scene {}", scene_name);
            return 2;
        }
    };

    let baseline = baseline_path(&cwd, Path::new("snapshots"), scene_name, scene);
    if has_flag(args, "--update-baseline") {
        write_file(&baseline, format!("{{\"scene\":\"{}\"}}\n", scene_name).as_bytes());
        println!("baseline written: {}", baseline.display());
        0
    } else if baseline.exists() {
        println!("layout matches: {}", scene_name);
        0
    } else {
        eprintln!("mock_runner: no baseline for {}", scene_name);
        2
    }
}

/// `--lua-entry <path> ... --screenshot-out <path>`
fn native_runner(args: &[String]) -> i32 {
    let cwd = std::env::current_dir().expect("cwd");
    let Some(out) = flag_value(args, "--screenshot-out") else {
        eprintln!("mock_runner: missing --screenshot-out");
        return 64;
    };

    let scene = Path::new(out)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if fails(&scene) {
        eprintln!("mock_runner: render failed for {}", scene);
        return 3;
    }

    if std::env::var_os("MOCK_RUNNER_SKIP_OUTPUT").is_none() {
        write_file(&cwd.join(out), b"\x89PNG\r\n\x1a\n");
    }
    0
}

fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create output dir");
    }
    std::fs::write(path, contents).expect("write output");
}
