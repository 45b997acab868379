//! Build script for Lifelog
//!
//! Bumps the build counter on source changes and embeds build metadata.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let counter_path = Path::new("build_number.txt");

    let previous: u64 = fs::read_to_string(counter_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build = previous + 1;

    // A read-only checkout still builds; the counter just stays put.
    if let Err(e) = fs::write(counter_path, build.to_string()) {
        println!("cargo:warning=Could not persist build number: {}", e);
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=LIFELOG_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=LIFELOG_BUILD_TIMESTAMP={}", timestamp);
}
