//! Structural tests for layer boundary enforcement.
//!
//! These tests scan source files to verify that the domain stays pure and
//! the application layer never reaches into presentation or infrastructure.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| !l.trim().starts_with("//"))
        .map(String::from)
        .collect()
}

fn src(layer: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer)
}

fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let files = collect_rs_files(&src(layer));
    assert!(!files.is_empty(), "no sources found for {layer}");
    files
        .iter()
        .flat_map(|file| {
            read_non_comment_lines(file)
                .into_iter()
                .filter(|line| forbidden.iter().any(|f| line.contains(f)))
                .map(move |line| format!("{}: {}", file.display(), line.trim()))
        })
        .collect()
}

#[test]
fn test_domain_has_no_io_or_outer_layer_imports() {
    let found = violations(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(found.is_empty(), "domain imports outer layers:\n{}", found.join("\n"));
}

#[test]
fn test_application_does_not_import_infra_or_presentation() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output"],
    );
    assert!(
        found.is_empty(),
        "application imports outer layers:\n{}",
        found.join("\n")
    );
}
