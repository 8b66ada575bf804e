use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const NOW: &str = "2023-05-28T18:00:00Z";

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").unwrap();
    cmd.env("FINANCE_CORE_HOME", home.path())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off")
        .args(["--now", NOW]);
    cmd
}

#[test]
fn transactions_filtered_by_category_and_type() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["transactions", "--category", "Food & Dining", "--sort", "amount"])
        .assert()
        .success()
        .stdout(contains("Grocery Shopping"))
        .stdout(contains("Coffee Shop"))
        .stdout(contains("Monthly Rent").not())
        .stdout(contains("Showing 3 of 3"));

    cli(&home)
        .args(["transactions", "--type", "credit"])
        .assert()
        .success()
        .stdout(contains("Monthly Salary"))
        .stdout(contains("Freelance Payment"))
        .stdout(contains("Uber Ride").not());
}

#[test]
fn flagged_tab_and_range() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["transactions", "--tab", "flagged"])
        .assert()
        .success()
        .stdout(contains("Phone Bill"))
        .stdout(contains("pending"));

    cli(&home)
        .args(["transactions", "--range", "7d", "--tab", "flagged"])
        .assert()
        .success()
        .stdout(contains("No transactions match"));
}

#[test]
fn unknown_sort_field_is_reported() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["transactions", "--sort", "color"])
        .assert()
        .failure()
        .stderr(contains("color"));

    cli(&home)
        .args(["accounts", "--sort", "date"])
        .assert()
        .failure()
        .stderr(contains("account"));
}

#[test]
fn budgets_and_goals_render() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["budgets", "--status", "over-budget"])
        .assert()
        .success()
        .stdout(contains("Transportation"))
        .stdout(contains("over-budget"))
        .stdout(contains("Total $3,050.00 of $3,200.00 spent"));

    cli(&home)
        .arg("goals")
        .assert()
        .success()
        .stdout(contains("New Laptop"))
        .stdout(contains("90%"));
}

#[test]
fn summary_and_notifications() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["summary", "--range", "all"])
        .assert()
        .success()
        .stdout(contains("Total balance:  $47,722.27"))
        .stdout(contains("Housing"));

    cli(&home)
        .args(["notifications", "--filter", "unread"])
        .assert()
        .success()
        .stdout(contains("2 unread"))
        .stdout(contains("Upcoming Bill"))
        .stdout(contains("Budget Alert").not());
}

#[test]
fn config_set_changes_later_runs() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "--currency", "eur", "--range", "30d"])
        .assert()
        .success()
        .stdout(contains("Preferences saved: EUR"));
    assert!(home.path().join("config.json").exists());

    cli(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("\"EUR\""))
        .stdout(contains("\"30d\""));

    cli(&home)
        .args(["budgets"])
        .assert()
        .success()
        .stdout(contains("€1,500.00"));
}

#[test]
fn invalid_arguments_exit_with_error() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["summary", "--range", "2w"])
        .assert()
        .code(1)
        .stderr(contains("Error:"));

    cli(&home)
        .args(["notifications", "--filter", "urgent"])
        .assert()
        .failure();
}
