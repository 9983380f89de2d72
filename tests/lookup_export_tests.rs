use predicates::str::contains;
use std::fs;

mod common;
use common::{Env, temp_out};

#[test]
fn test_lookup_import_feeds_initial_data() {
    let env = Env::new("lookup_import");
    let csv = temp_out("lookup_import_reference", "csv");
    fs::write(
        &csv,
        "driver_id,driver_name,helper_id,helper_name,helper_company,vehicle_number,destination,customer\n\
         D1,Ali,H1,Omar,Acme,DXB-1,Dubai,Noon\n\
         D2,Zaid,H1,Omar,Acme,DXB-1,Sharjah,Amazon\n",
    )
    .unwrap();

    env.cmd("01/01/2024 08:00")
        .args(["lookup", "--import", &csv])
        .assert()
        .success()
        .stdout(contains("Zaid"));

    let v = env.json("01/01/2024 08:00", &["rpc", r#"{"op":"getInitialData"}"#]);
    assert_eq!(v["drivers"].as_array().unwrap().len(), 2);
    assert_eq!(v["helpers"].as_array().unwrap().len(), 1);
    assert_eq!(v["vehicles"][0]["number"], "DXB-1");
    assert_eq!(v["customers"][1], "Amazon");
}

#[test]
fn test_export_csv_and_json() {
    let env = Env::new("export_shifts");
    env.start("D1", "15/01/2024 08:00");
    env.start("D2", "03/02/2024 08:00");

    let out = temp_out("export_shifts", "csv");
    env.cmd("03/02/2024 09:00")
        .args(["export", "--format", "csv", "--file", &out, "--range", "2024-01"])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.starts_with("Row ID,Shift Date,Driver Employee ID"));
    assert!(content.contains("SHIFT-20240115-080000-D1"));
    assert!(!content.contains("D2"));

    // no silent overwrite
    env.cmd("03/02/2024 09:00")
        .args(["export", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("--force"));

    let json_out = temp_out("export_shifts", "json");
    env.cmd("03/02/2024 09:00")
        .args(["export", "--format", "json", "--file", &json_out])
        .assert()
        .success();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[1]["Shift Date"], "03/02/2024");
}

#[test]
fn test_log_records_operations() {
    let env = Env::new("log_operations");
    env.start("D1", "01/01/2024 08:00");

    env.cmd("01/01/2024 08:00")
        .args(["log", "--print", "--op", "startShift"])
        .assert()
        .success()
        .stdout(contains("SHIFT-20240101-080000-D1"));
}

#[test]
fn test_db_info_counts_stages() {
    let env = Env::new("db_info");
    env.start("D1", "01/01/2024 08:00");

    env.cmd("01/01/2024 08:00")
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Total shifts"));
}
