use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_boundary_numerical_values() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("boundary_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["id", "amount", "description", "payer", "involved", "timestamp"])
        .unwrap();

    // u64::MAX = 18446744073709551615
    wtr.write_record([
        "18446744073709551615",
        "1000000000.00",
        "big",
        "alice",
        "bob",
        "2024-05-01T00:00:00Z",
    ])
    .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("splitledger"));
    cmd.args(["--roster", "alice,bob", "settle"]).arg(&output_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bob,alice,1000000000.00"));
}

#[test]
fn test_sub_cent_amounts_round_away() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("precision_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["id", "amount", "description", "payer", "involved", "timestamp"])
        .unwrap();

    wtr.write_record(["1", "0.004", "crumb", "alice", "bob", "2024-05-01T00:00:00Z"])
        .unwrap();
    wtr.write_record(["2", "0.004", "crumb", "alice", "bob", "2024-05-01T00:01:00Z"])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("splitledger"));
    cmd.args(["--roster", "alice,bob", "balances"]).arg(&output_path);

    // 0.008 rounds to a cent, which is still within the settled tolerance.
    cmd.assert()
        .success()
        .stdout("participant,balance\nalice,0.01\nbob,-0.01\n");

    let mut cmd = Command::new(cargo_bin!("splitledger"));
    cmd.args(["--roster", "alice,bob", "settle"]).arg(&output_path);
    cmd.assert().success().stdout("from,to,amount\n");
}

#[test]
fn test_thirds_settle_to_the_cent() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("thirds_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["id", "amount", "description", "payer", "involved", "timestamp"])
        .unwrap();
    wtr.write_record([
        "1",
        "100.00",
        "cabin",
        "alice",
        "alice;bob;carol",
        "2024-05-01T00:00:00Z",
    ])
    .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("splitledger"));
    cmd.args(["--roster", "alice,bob,carol", "settle"])
        .arg(&output_path);

    cmd.assert()
        .success()
        .stdout("from,to,amount\nbob,alice,33.33\ncarol,alice,33.33\n");
}
