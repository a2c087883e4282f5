use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn shell(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("homebudget").unwrap();
    cmd.env("HOMEBUDGET_SCRIPT", "1")
        .env("HOMEBUDGET_HOME", home)
        .env("HOMEBUDGET_TODAY", "2024-06-15")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Fresh home directory with sample seeding switched off.
fn empty_home() -> TempDir {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.json"),
        r#"{ "seed_sample_data": false }"#,
    )
    .unwrap();
    home
}

fn backup_names(home: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(home.join("data").join("backups"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn stored_entries(home: &Path) -> Vec<Value> {
    let raw = fs::read_to_string(home.join("data").join("entries.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn add_log_and_balance() {
    let home = empty_home();
    shell(home.path())
        .write_stdin(
            "add expense home 12.5 --note \"light bulbs\"\n\
             add income salary 1000 --date 2024-06-01\n\
             log\n\
             balance\n\
             exit\n",
        )
        .assert()
        .success()
        .stdout(contains("Saved 1 entry (balance -12.50 USD)"))
        .stdout(contains("Saved 1 entry (balance +1000.00 USD)"))
        .stdout(contains("light bulbs"))
        .stdout(contains("987.50 USD"));

    let entries = stored_entries(home.path());
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["categoryId"], "home");
    assert_eq!(entries[0]["date"], "2024-06-15");
    assert_eq!(entries[1]["kind"], "income");
}

#[test]
fn repeating_expense_feeds_dashboard_and_histogram() {
    let home = empty_home();
    shell(home.path())
        .write_stdin(
            "add expense insurance 120 --date 2024-01-15 --repeat monthly --until 2024-12-31\n\
             range 2024-01-01 2024-07-01\n\
             select insurance\n\
             dashboard\n\
             histogram\n",
        )
        .assert()
        .success()
        .stdout(contains("Saved 12 entries (balance -120.00 USD)"))
        .stdout(contains("Range set to 2024-01-01 .. 2024-07-01"))
        .stdout(contains("720.00 USD"))
        .stdout(contains("Insurance"))
        .stdout(contains("Jun 2024"))
        .stdout(predicate::str::is_match(r"(?m)^Jun 2024 +120\.00 +120\.00 \*$").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^Jul 2024 +120\.00 +120\.00$").unwrap());

    assert_eq!(stored_entries(home.path()).len(), 12);
}

#[test]
fn several_amounts_share_one_category_and_date() {
    let home = empty_home();
    shell(home.path())
        .write_stdin("add expense home 10 20 --note bulbs --date 2024-05-03\n")
        .assert()
        .success()
        .stdout(contains("Saved 2 entries (balance -30.00 USD)"));

    let entries = stored_entries(home.path());
    let amounts: Vec<f64> = entries.iter().map(|e| e["amount"].as_f64().unwrap()).collect();
    assert_eq!(amounts, vec![10.0, 20.0]);
    assert!(entries.iter().all(|e| e["date"] == "2024-05-03"
        && e["categoryId"] == "home"
        && e["description"] == "bulbs"));
    assert_ne!(entries[0]["id"], entries[1]["id"]);
}

#[test]
fn select_and_clear_category() {
    let home = empty_home();
    shell(home.path())
        .write_stdin("select tech\nselect\nselect clear\nselect\n")
        .assert()
        .success()
        .stdout(contains("Selected Technology"))
        .stdout(contains("Selected category: tech"))
        .stdout(contains("Category selection cleared."))
        .stdout(contains("No category selected."));
}

#[test]
fn seed_appends_sample_entries() {
    let home = empty_home();
    shell(home.path())
        .env("HOMEBUDGET_SAMPLE_SEED", "11")
        .write_stdin("add income salary 50\nseed 5\nlog 1\n")
        .assert()
        .success()
        .stdout(contains("Added 5 sample entries."))
        .stdout(contains("Entries (6 total)"));

    assert_eq!(stored_entries(home.path()).len(), 6);
}

#[test]
fn remove_by_id_prefix() {
    let home = empty_home();
    shell(home.path())
        .write_stdin("add expense pets 40\n")
        .assert()
        .success();
    let id = stored_entries(home.path())[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    shell(home.path())
        .write_stdin(format!("remove {}\nlog\n", &id[..8]))
        .assert()
        .success()
        .stdout(contains("Removed Pets expense on 2024-06-15 (40.00 USD)"))
        .stdout(contains("No entries recorded yet."));

    assert!(stored_entries(home.path()).is_empty());
}

#[test]
fn invalid_input_is_reported_without_aborting() {
    let home = empty_home();
    shell(home.path())
        .write_stdin(
            "add expense home 0\n\
             add expense nowhere 5\n\
             add income home 5\n\
             add expense home 5 --repeat weekly\n\
             range 2024-05-01 2024-01-01\n\
             dashbord\n\
             balance\n",
        )
        .assert()
        .success()
        .stdout(contains("at least one amount must be greater than zero"))
        .stdout(contains("Category not found: nowhere"))
        .stdout(contains("Category not found: home"))
        .stdout(contains("entries need an end date"))
        .stdout(contains("range end must be after start"))
        .stdout(contains("Suggestion: `dashboard`?"))
        .stdout(contains("0.00 USD"));
}

#[test]
fn config_changes_persist_and_reformat_amounts() {
    let home = empty_home();
    shell(home.path())
        .write_stdin("config set currency eur\nconfig set currency_precision 1\nadd expense tech 9.99\n")
        .assert()
        .success()
        .stdout(contains("currency = EUR"))
        .stdout(contains("Saved 1 entry (balance -10.0 EUR)"));

    shell(home.path())
        .write_stdin("config show\nconfig set color purple\n")
        .assert()
        .success()
        .stdout(contains("EUR"))
        .stdout(contains("Unknown configuration key `color`"));
}

#[test]
fn first_start_seeds_sample_data() {
    let home = TempDir::new().unwrap();
    shell(home.path())
        .env("HOMEBUDGET_SAMPLE_SEED", "7")
        .write_stdin("log 3\n")
        .assert()
        .success()
        .stdout(contains("Entries (1000 total)"));

    let entries = stored_entries(home.path());
    assert_eq!(entries.len(), 1000);
    assert!(entries
        .iter()
        .all(|entry| entry["description"] == "Lorem ipsum dolor sit amet."));
}

#[test]
fn backups_can_be_restored() {
    let home = empty_home();
    shell(home.path())
        .write_stdin("add expense gifts 10\nadd expense gifts 20\nbackups\nrestore 1\nbalance\n")
        .assert()
        .success()
        .stdout(contains("Backups (newest first)"))
        .stdout(contains("Restored 1 entries"))
        .stdout(contains("10.00 USD"));

    let entries = stored_entries(home.path());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["amount"], 10.0);
}

#[test]
fn restore_leaves_the_backup_set_alone() {
    let home = empty_home();
    shell(home.path())
        .write_stdin("add expense gifts 10\nadd expense gifts 20\nadd expense gifts 30\n")
        .assert()
        .success();
    let before = backup_names(home.path());
    assert_eq!(before.len(), 2);

    shell(home.path())
        .write_stdin("restore 2\nlog\n")
        .assert()
        .success()
        .stdout(contains("Restored 1 entries"))
        .stdout(contains("Entries (1 total)"));

    assert_eq!(backup_names(home.path()), before);
    assert_eq!(stored_entries(home.path()).len(), 1);
}

#[test]
fn help_and_categories() {
    let home = empty_home();
    shell(home.path())
        .write_stdin("help\nhelp add\ncategories income\n")
        .assert()
        .success()
        .stdout(contains("Available commands"))
        .stdout(contains("add <income|expense> <category> <amount...>"))
        .stdout(contains("salary"))
        .stdout(contains("Health/medical").not());
}
