use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::process::Command;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("course_tidy"));
    cmd.env_remove("COURSE_TIDY_CONFIG");
    cmd
}

#[test]
fn binary_print_config_succeeds() {
    let out = bin().arg("--print-config").output().expect("spawn binary");
    assert!(out.status.success(), "binary should succeed with --print-config");
}

#[test]
fn missing_root_prints_usage_and_fails() {
    let out = bin().output().expect("spawn binary");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn nonexistent_root_fails() {
    let td = TempDir::new().unwrap();
    let out = bin().arg(td.path().join("absent")).output().expect("spawn binary");
    assert!(!out.status.success());
}

#[test]
fn bad_pass_order_fails_without_touching_the_tree() {
    let root = TempDir::new().unwrap();
    root.child("U/Magnification/Completed/a.html").touch().unwrap();
    let out = bin()
        .arg(root.path())
        .args(["--passes", "compact,promote-completed"])
        .output()
        .expect("spawn binary");
    assert!(!out.status.success());
    assert!(root.path().join("U/Magnification/Completed/a.html").exists());
}

#[test]
fn run_tidies_the_tree() {
    let root = TempDir::new().unwrap();
    let cfg = TempDir::new().unwrap();
    cfg.child("config.xml").write_str("<config><log_level>quiet</log_level></config>").unwrap();
    root.child("CourseA/Full Remediation/Completed/doc.html")
        .write_str("<html><head><title>Doc Title</title></head></html>")
        .unwrap();

    let out = bin()
        .arg(root.path())
        .arg("--config")
        .arg(cfg.path().join("config.xml"))
        .output()
        .expect("spawn binary");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(root.path().join("CourseA/Doc Title/Doc Title.html").exists());
}

#[test]
fn init_config_writes_template_once() {
    let td = TempDir::new().unwrap();
    let path = td.path().join("cfg/config.xml");
    let first = bin().arg("--init-config").arg("--config").arg(&path).output().expect("spawn binary");
    assert!(first.status.success());
    assert!(path.exists());
    let second = bin().arg("--init-config").arg("--config").arg(&path).output().expect("spawn binary");
    assert!(!second.status.success());
}
