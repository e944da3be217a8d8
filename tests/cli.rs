use assert_cmd::Command;

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("ocr-synth").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("ocr-synth").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("ocr-synth 0.1.0\n");
}

fn generate_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ocr-synth").unwrap();
    cmd.arg("generate")
        .arg("--backgrounds")
        .arg(dir.join("backgrounds"))
        .arg("--texts")
        .arg(dir.join("texts"))
        .arg("--fonts")
        .arg(dir.join("fonts"))
        .arg("--colors")
        .arg(dir.join("colors.txt"))
        .arg("--images")
        .arg(dir.join("out/images"))
        .arg("--annotations")
        .arg(dir.join("out/annotations"));
    cmd
}

#[test]
fn generate_rejects_article_parse_mode() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut cmd = generate_cmd(temp.path());
    cmd.args(["--parse-mode", "text"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Invalid configuration"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn generate_rejects_unknown_granularity() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut cmd = generate_cmd(temp.path());
    cmd.args(["--annotation-mode", "words,glyphs"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("glyphs"));
}

#[test]
fn generate_rejects_empty_font_range() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut cmd = generate_cmd(temp.path());
    cmd.args(["--font-size-start", "40", "--font-size-end", "40"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("font size range"));
}

#[test]
fn generate_rejects_unknown_report_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut cmd = generate_cmd(temp.path());
    cmd.args(["--output", "yaml"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("unsupported report output"));
}

#[test]
fn generate_with_missing_inputs_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut cmd = generate_cmd(temp.path());
    cmd.assert().failure().stderr(predicates::str::contains("Error"));
}

#[test]
fn restore_on_empty_annotation_dir_succeeds() {
    let temp = tempfile::tempdir().expect("create temp dir");
    std::fs::create_dir_all(temp.path().join("annotations")).expect("create dir");

    let mut cmd = Command::cargo_bin("ocr-synth").unwrap();
    cmd.arg("restore")
        .arg("--annotations")
        .arg(temp.path().join("annotations"))
        .arg("--images")
        .arg(temp.path().join("images"))
        .arg("--output")
        .arg(temp.path().join("restored"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Restored 0 image(s)"));
}
