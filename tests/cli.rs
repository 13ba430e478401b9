use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

fn run_command(cmd: &mut Command) {
    cmd.assert().success();
}

#[test]
fn normalize_train_score_eval_round_trip() {
    let workspace = temp_workspace();
    let raw_dir = workspace.path().join("raw");
    let corpus_dir = workspace.path().join("corpus");
    let model_path = workspace.path().join("lexid.model");
    let stats_path = workspace.path().join("stats.json");
    let test_path = workspace.path().join("europarl.test");

    let en_dir = raw_dir.join("en");
    let fr_dir = raw_dir.join("fr");
    fs::create_dir_all(&en_dir).expect("create en dir");
    fs::create_dir_all(&fr_dir).expect("create fr dir");
    fs::write(
        en_dir.join("ep-00.txt"),
        "<CHAPTER id=1>\nthe cat sat\nthe dog ran\n(applause)\n",
    )
    .expect("write en corpus");
    fs::write(
        fr_dir.join("ep-00.txt"),
        "le chat noir\n<SPEAKER>\nle chien blanc\n",
    )
    .expect("write fr corpus");

    let mut normalize = Command::cargo_bin("lexid").expect("binary exists");
    normalize.current_dir(workspace.path()).args([
        "--quiet",
        "normalize",
        "raw",
        "corpus",
    ]);
    run_command(&mut normalize);
    assert!(corpus_dir.join("lang-en.txt").exists(), "lang-en.txt was created");
    assert!(corpus_dir.join("lang-fr.txt").exists(), "lang-fr.txt was created");

    let mut train = Command::cargo_bin("lexid").expect("binary exists");
    train.current_dir(workspace.path()).args([
        "--quiet",
        "train",
        "corpus",
        "--no-progress",
        "-o",
        "lexid.model",
        "--stats-json",
        "stats.json",
    ]);
    run_command(&mut train);
    assert!(model_path.exists(), "model blob was created");

    let stats: Value = serde_json::from_str(&fs::read_to_string(&stats_path).expect("read stats"))
        .expect("stats are valid JSON");
    assert_eq!(stats["languages"].as_array().expect("languages array").len(), 2);

    let mut score = Command::cargo_bin("lexid").expect("binary exists");
    let score_output = score
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "score",
            "-m",
            "lexid.model",
            "--json",
            "the cat sat",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let scored: Value = serde_json::from_slice(&score_output).expect("score output is valid JSON");
    assert_eq!(scored["language"], "en");
    assert!(scored["log_prob"].as_f64().expect("log_prob is a number") <= 0.0);

    fs::write(&test_path, "en\tthe cat\nfr\tle chat\n").expect("write test file");
    let mut eval = Command::cargo_bin("lexid").expect("binary exists");
    let eval_output = eval
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "eval",
            "-m",
            "lexid.model",
            "--test-file",
            "europarl.test",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&eval_output).expect("eval output is valid JSON");
    assert_eq!(report["sentence_count"], 2);
    assert_eq!(report["error_count"], 0);

    let mut info = Command::cargo_bin("lexid").expect("binary exists");
    let info_output = info
        .current_dir(workspace.path())
        .args(["--quiet", "info", "-m", "lexid.model"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let info_text = String::from_utf8(info_output).expect("info output is UTF-8");
    assert!(
        info_text.contains("Languages"),
        "info output contained expected summary"
    );
}
