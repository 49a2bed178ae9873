use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

/// Temp data dir plus an empty config so the user's own config never leaks in.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        dir.child("config.toml").write_str("").expect("config");
        Self { dir }
    }

    fn with_config(config: &str) -> Self {
        let workspace = Self::new();
        workspace
            .dir
            .child("config.toml")
            .write_str(config)
            .expect("config");
        workspace
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("audit-form").expect("binary");
        cmd.arg("--config")
            .arg(self.dir.child("config.toml").path())
            .arg("--data-dir")
            .arg(self.dir.child("data").path())
            .env_remove("AUDIT_FORM_DATA_DIR")
            .env_remove("RUST_LOG");
        cmd
    }

    fn answers(&self) -> Value {
        let raw = std::fs::read_to_string(self.dir.child("data/answers.json").path())
            .expect("answers.json");
        serde_json::from_str(&raw).expect("answers are json")
    }
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("audit-form")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn answering_no_hides_follow_up_questions() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["answer", "q2", "No"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden by answers: q3, q4, q5, q6"));

    ws.cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("== Parking =="))
        .stdout(predicate::str::contains(" - q2 [y/n] Is there on-site parking? = no"))
        .stdout(predicate::str::contains("q3 [").not());

    let answers = ws.answers();
    let q2 = answers
        .as_array()
        .expect("array")
        .iter()
        .find(|record| record["id"] == "q2")
        .expect("q2 saved");
    assert_eq!(q2["response"], "no");
}

#[test]
fn choice_questions_reject_unlisted_answers() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["answer", "q13", "definitely"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'definitely' is not an answer to 'q13'; expected one of: yes, no",
        ));
    ws.dir
        .child("data/answers.json")
        .assert(predicate::path::missing());

    ws.cmd().args(["answer", "q13", "YES"]).assert().success();
    ws.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("q13"));
}

#[test]
fn retired_questions_are_never_shown() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("q126").not())
        .stdout(predicate::str::contains("q53"));
}

#[test]
fn duplicate_group_toggle_and_expansion() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add another Accessible Toilet"))
        .stdout(predicate::str::contains("\"q36\"").not());

    ws.cmd()
        .args(["show", "--expand", "Accessible Toilet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hide second Accessible Toilet"))
        .stdout(predicate::str::contains(" - q36 [y/n]"));

    ws.cmd().args(["answer", "q31", "no"]).assert().success();
    ws.cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Add another").not());
}

#[test]
fn export_requires_complete_ramp_measurements() {
    let ws = Workspace::new();
    ws.cmd().args(["answer", "q13", "yes"]).assert().success();

    ws.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please enter height and length for all ramps marked Yes",
        ))
        .stderr(predicate::str::contains("q13"));

    let report = ws.dir.child("out/report.html");
    ws.cmd()
        .args(["export", "html", "--output"])
        .arg(report.path())
        .assert()
        .failure();
    report.assert(predicate::path::missing());

    ws.cmd()
        .args(["gradient", "q13", "--height", "500", "--length", "5000"])
        .assert()
        .success();
    ws.cmd().arg("validate").assert().success();

    ws.cmd()
        .args(["export", "html", "--output"])
        .arg(report.path())
        .assert()
        .success();
    report.assert(predicate::str::contains("<h1>Accessibility Report</h1>"));
    report.assert(predicate::str::contains("Entrance ramp gradient"));
    report.assert(predicate::str::contains("1 : 10"));
}

#[test]
fn images_attach_detach_and_respect_size_limit() {
    let ws = Workspace::new();
    let photo = ws.dir.child("door.png");
    photo
        .write_binary(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
        .expect("photo");
    let huge = ws.dir.child("huge.jpg");
    huge.write_binary(&vec![0xffu8; 140 * 1024]).expect("huge");

    ws.cmd()
        .args(["attach", "q17"])
        .arg(huge.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The selected image is 140 KB. Please choose an image under 130 KB.",
        ));

    ws.cmd()
        .args(["attach", "q17"])
        .arg(photo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("user_images"))
        .stdout(predicate::str::contains("q17-"));

    let answers = ws.answers();
    let stored = answers
        .as_array()
        .expect("array")
        .iter()
        .find(|record| record["id"] == "q17")
        .and_then(|record| record["imageList"][0].as_str())
        .expect("image reference")
        .to_string();
    assert!(stored.ends_with(".png"));
    assert!(std::path::Path::new(&stored).exists());

    ws.cmd()
        .args(["attach", "q13"])
        .arg(photo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not accept images"));

    ws.cmd().args(["detach", "q17", "0"]).assert().success();
    assert!(!std::path::Path::new(&stored).exists());
    ws.cmd()
        .args(["detach", "q17", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no image at index 0"));
}

#[test]
fn widget_export_embeds_position_and_gallery() {
    let ws = Workspace::with_config("widget_position = \"bottom-center\"\n");
    let photo = ws.dir.child("ramp.jpg");
    photo.write_binary(&[0xff, 0xd8, 0xff, 0xe0]).expect("photo");
    ws.cmd().args(["answer", "q11", "yes"]).assert().success();
    ws.cmd()
        .args(["attach", "q17"])
        .arg(photo.path())
        .assert()
        .success();

    let widget = ws.dir.child("widget.js");
    ws.cmd()
        .args(["export", "widget", "--output"])
        .arg(widget.path())
        .assert()
        .success();
    widget.assert(predicate::str::contains(
        "const buttonPosition = \"bottom-center\";",
    ));
    widget.assert(predicate::str::contains("data:image/jpeg;base64,/9j/4A=="));
    widget.assert(predicate::str::contains("Step at entrance"));

    ws.cmd()
        .args(["export", "widget", "--position", "manual", "--output"])
        .arg(widget.path())
        .assert()
        .success();
    widget.assert(predicate::str::contains("const buttonPosition = \"manual\";"));
}

#[test]
fn pdf_export_needs_a_configured_printer() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["export", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pdf_command configured"));
}

#[cfg(unix)]
#[test]
fn pdf_export_runs_the_configured_command() {
    let ws = Workspace::with_config("pdf_command = [\"cp\", \"{input}\", \"{output}\"]\n");
    let pdf = ws.dir.child("report.pdf");
    ws.cmd()
        .args(["export", "pdf", "--output"])
        .arg(pdf.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("report.pdf"));
    pdf.assert(predicate::str::contains("Image Gallery (max 24 images shown)"));
}

#[test]
fn exports_default_to_timestamped_names() {
    let ws = Workspace::new();
    let out = ws.dir.child("exports");
    ws.dir
        .child("config.toml")
        .write_str(&format!("output_dir = {:?}\n", out.path().display().to_string()))
        .expect("config");

    ws.cmd()
        .args(["export", "widget"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"AccessibilityWidget-\d+\.js").expect("regex"));
}

#[test]
fn clear_requires_confirmation() {
    let ws = Workspace::new();
    ws.cmd().args(["answer", "q2", "yes"]).assert().success();
    ws.dir.child("data/answers.json").assert(predicate::path::exists());

    ws.cmd()
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    ws.dir.child("data/answers.json").assert(predicate::path::exists());

    ws.cmd().args(["clear", "--yes"]).assert().success();
    ws.dir.child("data/answers.json").assert(predicate::path::missing());
    ws.dir.child("data/user_images").assert(predicate::path::missing());
}

#[test]
fn data_dir_can_come_from_the_environment() {
    let ws = Workspace::new();
    let data = ws.dir.child("from-env");
    Command::cargo_bin("audit-form")
        .expect("binary")
        .arg("--config")
        .arg(ws.dir.child("config.toml").path())
        .env("AUDIT_FORM_DATA_DIR", data.path())
        .args(["answer", "q2", "yes"])
        .assert()
        .success();
    data.child("answers.json").assert(predicate::path::exists());
}

#[test]
fn unknown_question_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["answer", "zzz", "yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown question 'zzz'"));
}

#[test]
fn schema_command_prints_json_schema() {
    Command::cargo_bin("audit-form")
        .expect("binary")
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("QuestionSchema"))
        .stdout(predicate::str::contains("skipLogic"));
}
