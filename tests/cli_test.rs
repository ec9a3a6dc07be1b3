use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;

fn responses(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_replay_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("pay-stream"));
    cmd.arg("replay").arg("tests/fixtures/approval_flow.jsonl");

    let output = cmd.output()?;
    assert!(output.status.success());

    let responses = responses(&output.stdout);
    let statuses: Vec<u64> = responses
        .iter()
        .map(|r| r["status"].as_u64().unwrap())
        .collect();
    assert_eq!(statuses, vec![200, 201, 201, 400, 200, 200, 200]);

    assert_eq!(
        responses[1]["location"],
        "http://localhost:8080/api/v1/banks/1"
    );
    assert_eq!(
        responses[3]["body"]["detail"],
        "Cannot approve a transaction you created"
    );
    assert_eq!(responses[4]["body"]["transaction"]["approvedBy"], "checker");
    assert_eq!(responses[5]["body"]["count"], 1);
    assert_eq!(responses[6]["body"]["count"], 3);

    Ok(())
}

#[test]
fn test_replay_base_url_override() {
    let mut cmd = Command::new(cargo_bin!("pay-stream"));
    cmd.arg("replay")
        .arg("tests/fixtures/banks.jsonl")
        .arg("--base-url")
        .arg("https://pay.example.com");

    cmd.assert().success().stdout(predicate::str::contains(
        "\"location\":\"https://pay.example.com/api/v1/banks/1\"",
    ));
}

#[test]
fn test_replay_base_url_from_config() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut config,
        b"[server]\nbase_url = \"https://configured.example\"\n",
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("pay-stream"));
    cmd.arg("--config")
        .arg(config.path())
        .arg("replay")
        .arg("tests/fixtures/banks.jsonl");

    cmd.assert().success().stdout(predicate::str::contains(
        "https://configured.example/api/v1/banks/1",
    ));
}

#[test]
fn test_import_csv_batch() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("pay-stream"));
    cmd.arg("import")
        .arg("tests/fixtures/transactions.csv")
        .arg("--tenant")
        .arg("acme")
        .arg("--user")
        .arg("importer")
        .arg("--setup")
        .arg("tests/fixtures/banks.jsonl");

    let output = cmd.output()?;
    assert!(output.status.success());

    let responses = responses(&output.stdout);
    assert_eq!(responses.len(), 1);
    let batch = &responses[0]["body"]["batch"];
    assert_eq!(responses[0]["status"], 201);
    assert_eq!(batch["transactionCount"], 3);
    assert_eq!(batch["transactions"][0]["createdBy"], "importer");
    assert_eq!(batch["transactions"][1]["exchangeRate"], Value::Null);

    Ok(())
}

#[test]
fn test_import_without_bank_fails() {
    let mut cmd = Command::new(cargo_bin!("pay-stream"));
    cmd.arg("import")
        .arg("tests/fixtures/transactions.csv")
        .arg("--tenant")
        .arg("acme")
        .arg("--user")
        .arg("importer");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains(
            "Bank not found with branch code: FB001",
        ));
}

#[test]
fn test_logs_stay_off_stdout() {
    let mut cmd = Command::new(cargo_bin!("pay-stream"));
    cmd.arg("-v")
        .arg("replay")
        .arg("tests/fixtures/banks.jsonl")
        .env_remove("RUST_LOG");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bank created").not())
        .stderr(predicate::str::contains("bank created"));
}
