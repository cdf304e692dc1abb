use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI with an isolated data directory and the given API URL.
pub fn run_cli(args: &[&str], data_dir: &Path, api_url: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bigs"));
    cmd.args(args);
    cmd.env("BIGS_DATA_DIR", data_dir);
    cmd.env_remove("BIGS_PASSWORD");
    cmd.env("NO_COLOR", "1");
    match api_url {
        Some(url) => cmd.env("BIGS_API_URL", url),
        None => cmd.env_remove("BIGS_API_URL"),
    };
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str], data_dir: &Path, api_url: Option<&str>) -> String {
    let output = run_cli(args, data_dir, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Read the persisted session file as JSON.
pub fn session_file(data_dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(data_dir.join("session.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Write a signed-in session file directly.
pub fn seed_session(data_dir: &Path, access: &str, refresh: &str) {
    let session = serde_json::json!({
        "accessToken": access,
        "refreshToken": refresh,
        "userName": "Alice",
        "userEmail": "alice@example.com",
        "userImage": "/image/avatar.png"
    });
    std::fs::write(data_dir.join("session.json"), session.to_string()).unwrap();
}
