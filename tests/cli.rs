use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const TEMPLATE: &str = "h1.text-red Hello\n.card\n  img(:src=\"url\")\n";

fn workspace_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

#[test]
fn compile_file_to_stdout() {
    let dir = workspace_with(&[("page.hsml", TEMPLATE)]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.current_dir(dir.path()).arg("compile").arg("page.hsml");

    cmd.assert().success().stdout(predicate::eq(
        r#"<h1 class="text-red">Hello</h1><div class="card"><img :src="url"/></div>"#,
    ));
}

#[test]
fn compile_file_to_output_file() {
    let dir = workspace_with(&[("page.hsml", TEMPLATE)]);
    let out = dir.path().join("out.html");
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.current_dir(dir.path())
        .arg("compile")
        .arg("page.hsml")
        .arg("-o")
        .arg(&out);

    cmd.assert().success();
    assert!(fs::read_to_string(out).unwrap().starts_with("<h1"));
}

#[test]
fn compile_directory_writes_sibling_html() {
    let dir = workspace_with(&[
        ("a.hsml", "p a"),
        ("b.hsml", "p b"),
        ("notes.txt", "p ignored"),
    ]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.arg("compile").arg(dir.path());

    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("a.html")).unwrap(),
        "<p>a</p>"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("b.html")).unwrap(),
        "<p>b</p>"
    );
    assert!(!dir.path().join("notes.html").exists());
}

#[test]
fn compile_with_inspection_format() {
    let dir = workspace_with(&[("page.hsml", TEMPLATE)]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.current_dir(dir.path())
        .arg("compile")
        .arg("page.hsml")
        .arg("--format")
        .arg("ast-treeviz");

    cmd.assert().success().stdout(
        predicate::str::contains("├─ Element: h1.text-red | Hello")
            .and(predicate::str::contains("  └─ Element: img :src")),
    );
}

#[test]
fn unknown_format_lists_available_ones() {
    let dir = workspace_with(&[("page.hsml", TEMPLATE)]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.current_dir(dir.path())
        .arg("compile")
        .arg("page.hsml")
        .arg("-f")
        .arg("ast-xml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Available formats: html, ast-json"));
}

#[test]
fn compile_error_shows_source_context() {
    let dir = workspace_with(&[("broken.hsml", "div\n  p\n      span\n")]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.current_dir(dir.path()).arg("compile").arg("broken.hsml");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("StructuralError at line 3")
                .and(predicate::str::contains(">>   3 |       span")),
        );
}

#[test]
fn local_config_is_layered() {
    let dir = workspace_with(&[
        ("page.hsml", TEMPLATE),
        (
            "hsml.toml",
            "[compile]\ndynamic_attributes = \"interpolation\"\nvoid_elements = \"html\"\n",
        ),
    ]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.current_dir(dir.path()).arg("compile").arg("page.hsml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"<img src="{{ url }}">"#));
}

#[test]
fn explicit_config_file() {
    let dir = workspace_with(&[
        ("page.hsml", "//! kept?\np"),
        ("quiet.toml", "[compile]\nnative_comments = false\n"),
    ]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.current_dir(dir.path())
        .arg("compile")
        .arg("page.hsml")
        .arg("--config")
        .arg("quiet.toml");

    cmd.assert().success().stdout(predicate::eq("<p></p>"));
}

#[test]
fn check_reports_each_template() {
    let dir = workspace_with(&[("good.hsml", "p ok"), ("bad.hsml", "p {{ open")]);
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.arg("check").arg(dir.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("ok: ").and(predicate::str::contains("good.hsml")))
        .stderr(
            predicate::str::contains("SyntaxError at line 1")
                .and(predicate::str::contains("1 of 2 templates failed")),
        );
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("hsml");
    cmd.arg("list-formats");

    cmd.assert().success().stdout(
        predicate::str::contains("html")
            .and(predicate::str::contains("ast-treeviz"))
            .and(predicate::str::contains("lines-json")),
    );
}
