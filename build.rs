// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");

    // Packagers (flatpak, distro builds) can pin the version explicitly
    let version = std::env::var("VIEWFINDER_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version string for the about page
///
/// - exact tag `v0.1.0` becomes `0.1.0-abcdef1`
/// - `v0.1.0-5-gabcdef1` becomes `0.1.0-dirty-abcdef1`
/// - outside a git checkout the package version is used
fn describe_version() -> String {
    let Some(described) = git(&["describe", "--tags", "--always", "--match", "v*"]) else {
        return env!("CARGO_PKG_VERSION").to_string();
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() == 3 {
        let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
        return format!("{}-dirty-{}", parts[2], hash);
    }

    let commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    format!("{}-{}", described, commit)
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
