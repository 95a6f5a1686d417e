use std::process::{Command, Output};

fn git(args: &[&str]) -> Option<Output> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let package_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();

    // Release tags report the package version; anything else is a dev build.
    let version = if git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some() {
        package_version
    } else {
        match git(&["rev-parse", "--short", "HEAD"]) {
            Some(out) => format!("dev@{}", String::from_utf8_lossy(&out.stdout).trim()),
            None => "dev@unknown".to_string(),
        }
    };

    println!("cargo:rustc-env=BOOKSHELF_VERSION={version}");
}
