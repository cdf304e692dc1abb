//! Stamps the binary with `<package version>+<commit>` when built from a
//! git checkout, or the bare package version otherwise.

use std::path::Path;
use std::process::Command;

fn main() {
    let git_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../.git");
    for watched in ["HEAD", "index"] {
        println!("cargo:rerun-if-changed={}", git_dir.join(watched).display());
    }

    let package = env!("CARGO_PKG_VERSION");
    let version = match commit() {
        Some(sha) => format!("{package}+{sha}"),
        None => package.to_string(),
    };
    println!("cargo:rustc-env=BIGS_VERSION={version}");
}

/// Short hash of HEAD, if git is available and this is a checkout.
fn commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())?;

    let sha = String::from_utf8(output.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}
