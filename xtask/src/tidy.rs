use std::fs;

use xshell::{cmd, Shell};

fn project_root() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

#[test]
fn versions_are_in_sync() {
    let root = project_root();
    let manifest = fs::read_to_string(root.join("Cargo.toml")).unwrap();
    let version = manifest
        .lines()
        .find_map(|it| it.strip_prefix("version = \""))
        .and_then(|it| it.split('"').next())
        .unwrap();

    let readme = fs::read_to_string(root.join("README.md")).unwrap();
    assert!(
        readme.contains(&format!("dflags = \"{version}\"")),
        "README.md should mention dflags {version}"
    );
}

#[test]
fn formatting() {
    let sh = Shell::new().unwrap();
    sh.change_dir(project_root());
    cmd!(sh, "cargo fmt --all -- --check").run().unwrap();
}
