//! End-to-end tests of the ground truth job on a synthetic home folder

use chrono::NaiveDate;
use hpd_tools::domain::{HomeId, InputError};
use hpd_tools::infra::Config;
use hpd_tools::services::{DateRange, GroundTruthJob, HomeSchedule};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_log(home_dir: &Path, name: &str, rows: &[(&str, &str)]) {
    let dir = home_dir.join("GroundTruth");
    fs::create_dir_all(&dir).unwrap();
    let content: String =
        rows.iter().map(|(status, when)| format!("{name},{status},\"{when}\"\n")).collect();
    fs::write(dir.join(format!("H1-{name}.csv")), content).unwrap();
}

fn config_for_h1(start: &str, end: &str) -> Config {
    let mut schedule = HomeSchedule::new();
    schedule.insert("H1", vec![DateRange::parse(start, end).unwrap()]);
    Config::default().with_schedule(schedule)
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let content = fs::read_to_string(path).unwrap();
    content.lines().skip(1).map(|l| l.split(',').map(str::to_string).collect()).collect()
}

#[test]
fn test_two_occupants_to_daily_files() {
    let root = tempdir().unwrap();
    let home_dir = root.path().join("H1-red");
    write_log(
        &home_dir,
        "Alice",
        &[("entered", "January 1, 2019 at 8:00AM"), ("exited", "January 1, 2019 at 8:20AM")],
    );
    write_log(
        &home_dir,
        "Bob",
        &[("entered", "January 1, 2019 at 8:10AM"), ("exited", "January 2, 2019 at 7:00AM")],
    );

    let save = root.path().join("out");
    let job = GroundTruthJob::new(&home_dir, Some(&save));
    let report = job.run(&config_for_h1("2019-01-01", "2019-01-02")).unwrap();

    assert_eq!(report.home, HomeId("H1".to_string()));
    assert_eq!(report.occupants, 2);
    assert_eq!(report.days_written, 2);
    assert_eq!(report.empty_days, 0);

    let day1 = job.daily_path(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
    let day2 = job.daily_path(NaiveDate::from_ymd_opt(2019, 1, 2).unwrap());
    assert!(day1.exists());
    assert!(day2.exists());
    let daily_files = fs::read_dir(&job.daily_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with("_groundtruth.csv"))
        .count();
    assert_eq!(daily_files, 2);

    // Someone is home from 08:00 on Jan 1 until 07:00 on Jan 2
    let rows = read_rows(&day1);
    assert_eq!(rows[0][0], "2019-01-01 08:00:00");
    assert!(rows.iter().all(|r| r[1] == "1"));
    assert_eq!(rows[60][2], "2", "both home at 08:10");

    let rows = read_rows(&day2);
    assert_eq!(rows.last().unwrap()[0], "2019-01-02 07:00:00");
    assert!(rows.iter().all(|r| r[1] == "1"));

    let buffered = fs::read_to_string(job.buffered_path()).unwrap();
    assert!(buffered.starts_with("timestamp,occupied\n"));
    let raw = fs::read_to_string(job.raw_path()).unwrap();
    assert!(raw.starts_with("timestamp,Alice,Bob,occupied\n"));
}

#[test]
fn test_short_absence_is_buffered() {
    let root = tempdir().unwrap();
    let home_dir = root.path().join("H1-red");
    write_log(
        &home_dir,
        "Alice",
        &[
            ("entered", "2019-01-01 08:00:00"),
            ("exited", "2019-01-01 09:00:00"),
            ("entered", "2019-01-01 09:04:00"),
            ("exited", "2019-01-01 12:00:00"),
            ("entered", "2019-01-01 18:00:00"),
        ],
    );

    let job = GroundTruthJob::new(&home_dir, None);
    job.run(&config_for_h1("2019-01-01", "2019-01-01")).unwrap();

    let rows = read_rows(&job.buffered_path());
    let at = |t: &str| rows.iter().find(|r| r[0] == t).map(|r| r[1].clone()).unwrap();

    // Four minute absence is absorbed, six hour absence only at its edges
    assert_eq!(at("2019-01-01 09:02:00"), "1");
    assert_eq!(at("2019-01-01 12:04:50"), "1");
    assert_eq!(at("2019-01-01 12:05:00"), "0");
    assert_eq!(at("2019-01-01 15:00:00"), "0");
    assert_eq!(at("2019-01-01 17:55:00"), "1");
    assert_eq!(at("2019-01-01 17:54:50"), "0");
}

#[test]
fn test_missing_logs_is_fatal() {
    let root = tempdir().unwrap();
    let home_dir = root.path().join("H1-red");
    fs::create_dir_all(&home_dir).unwrap();

    let job = GroundTruthJob::new(&home_dir, None);
    let err = job.run(&config_for_h1("2019-01-01", "2019-01-01")).unwrap_err();
    assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::NoOccupantLogs(_))));
}

#[test]
fn test_malformed_timestamp_is_fatal() {
    let root = tempdir().unwrap();
    let home_dir = root.path().join("H1-red");
    write_log(&home_dir, "Alice", &[("entered", "sometime on Tuesday")]);

    let job = GroundTruthJob::new(&home_dir, None);
    let err = job.run(&config_for_h1("2019-01-01", "2019-01-01")).unwrap_err();
    assert!(format!("{err:#}").contains("unparsable timestamp"));
}

#[test]
fn test_unscheduled_home_is_fatal() {
    let root = tempdir().unwrap();
    let home_dir = root.path().join("H7-green");
    let dir = home_dir.join("GroundTruth");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("H7-Ann.csv"), "Ann,entered,\"May 1, 2019 at 8:00AM\"\n").unwrap();

    let job = GroundTruthJob::new(&home_dir, None);
    let err = job.run(&Config::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::UnknownHome(_))));
    assert!(!job.buffered_path().exists());
    assert!(!job.raw_path().exists());
    assert!(!job.daily_dir.exists());
}
