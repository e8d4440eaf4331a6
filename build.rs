//! Build script for the `jira` binary.

use std::env;
use std::process::Command;

fn main() {
    // Load .env values (useful during development) before build-time macros read them
    let _ = dotenvy::dotenv();

    let revision = env::var("JIRA_CLI_GIT_REVISION")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(git_revision)
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=JIRA_CLI_GIT_REVISION={}", revision);

    println!("cargo:rerun-if-env-changed=JIRA_CLI_GIT_REVISION");
    println!("cargo:rerun-if-changed=.env");
}

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
