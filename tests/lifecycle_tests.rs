use predicates::str::contains;

mod common;
use common::Env;

#[test]
fn test_full_shift_lifecycle() {
    let env = Env::new("lifecycle_full");
    let row = env.start("D1", "01/01/2024 08:00");
    assert_eq!(row, "SHIFT-20240101-080000-D1");

    let dep = env.json(
        "01/01/2024 09:01",
        &["depart", &row, "--at", "2024-01-01T09:00"],
    );
    assert_eq!(dep["departureTime"], "01/01/2024 09:00");

    let drop = env.json(
        "01/01/2024 17:40:05",
        &[
            "last-drop", &row, "--at", "01/01/2024 17:30", "--failed", "5", "--photo", &env.photo,
        ],
    );
    assert_eq!(drop["submittedAt"], "01/01/2024 17:40:05");

    let end = env.json(
        "01/01/2024 18:31",
        &[
            "end", &row, "--at", "01/01/2024 18:30", "--odometer", "1250", "--photo", &env.photo,
        ],
    );
    assert_eq!(end["success"], true);
    assert_eq!(end["shiftDuration"], 10.5);
    assert_eq!(end["overtime"], 1.5);
    assert_eq!(end["departureAutoFilled"], false);

    // photos landed in the configured directory
    let photos: Vec<_> = std::fs::read_dir(&env.photos).unwrap().collect();
    assert_eq!(photos.len(), 3);
}

#[test]
fn test_second_start_reports_stuck_stage() {
    let env = Env::new("lifecycle_conflict");
    env.start("D1", "01/01/2024 08:00");

    env.cmd("02/01/2024 08:00")
        .args([
            "start", "--driver-id", "D1", "--driver-name", "Driver D1", "--vehicle", "V",
            "--odometer", "1", "--photo", &env.photo, "--at", "02/01/2024 08:00",
        ])
        .assert()
        .failure()
        .stdout(contains("\"success\": false"))
        .stdout(contains("Stage 2"));
}

#[test]
fn test_unknown_row_fails_with_json_error() {
    let env = Env::new("lifecycle_unknown_row");

    env.cmd("01/01/2024 10:00")
        .args(["depart", "SHIFT-missing", "--at", "01/01/2024 09:00"])
        .assert()
        .failure()
        .stdout(contains("not found"));
}

#[test]
fn test_invalid_time_is_rejected() {
    let env = Env::new("lifecycle_bad_time");
    let row = env.start("D1", "01/01/2024 08:00");

    env.cmd("01/01/2024 10:00")
        .args(["depart", &row, "--at", "tomorrow"])
        .assert()
        .failure()
        .stdout(contains("not a valid date-time"));
}

#[test]
fn test_skipped_departure_is_backfilled() {
    let env = Env::new("lifecycle_backfill");
    let row = env.start("D1", "01/01/2024 08:00");

    let end = env.json(
        "01/01/2024 16:00",
        &["end", &row, "--at", "01/01/2024 16:00", "--odometer", "1100", "--photo", &env.photo],
    );
    assert_eq!(end["departureAutoFilled"], true);

    let detail = env.json("02/01/2024 09:00", &["detail", "--date", "01/01/2024"]);
    let gap = &detail["stageGaps"][0];
    assert!(gap["arrivalToDeparture"].is_null());
    assert_eq!(gap["departureAutoFilled"], true);
    assert_eq!(gap["isComplete"], true);
    assert_eq!(detail["vehicleKm"][0]["totalKm"], 100.0);
}

#[test]
fn test_pending_lists_follow_stages() {
    let env = Env::new("lifecycle_pending");
    let old = env.start("OLD", "01/03/2024 08:00");
    env.start("NEW", "10/03/2024 08:00");

    let now = "10/03/2024 12:00";
    let stage2 = env.json(now, &["pending", "--stage", "2"]);
    let drivers = stage2["drivers"].as_array().unwrap();
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0]["driverId"], "NEW");

    let stage3 = env.json(now, &["pending", "--stage", "3"]);
    assert_eq!(stage3["drivers"].as_array().unwrap().len(), 2);

    env.json(
        now,
        &["last-drop", &old, "--at", "01/03/2024 15:00", "--photo", &env.photo],
    );
    let stage4 = env.json(now, &["pending", "--stage", "4"]);
    assert_eq!(stage4["drivers"][0]["rowId"], old.as_str());

    env.cmd(now)
        .args(["pending", "--stage", "1"])
        .assert()
        .failure();
}

#[test]
fn test_rpc_accepts_raw_requests() {
    let env = Env::new("lifecycle_rpc");
    let row = env.start("D1", "01/01/2024 08:00");

    let req = format!(
        r#"{{"op":"saveDeparture","rowId":"{row}","departureTime":"01/01/2024 08:45"}}"#
    );
    let v = env.json("01/01/2024 09:00", &["rpc", &req]);
    assert_eq!(v["departureTime"], "01/01/2024 08:45");

    env.cmd("01/01/2024 09:00")
        .args(["rpc"])
        .write_stdin(r#"{"op":"getDashboardData"}"#)
        .assert()
        .success()
        .stdout(contains("\"activeCount\": 1"));

    env.cmd("01/01/2024 09:00")
        .args(["rpc", r#"{"op":"deleteEverything"}"#])
        .assert()
        .failure()
        .stdout(contains("Invalid request"));
}
