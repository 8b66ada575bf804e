#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use finance_core::{
    config::ConfigManager,
    domain::{Transaction, TransactionKind},
    store::{seed, FinanceStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Fixed clock shared by every integration test.
pub static NOW: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2023, 5, 28, 18, 0, 0).unwrap());

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn now() -> DateTime<Utc> {
    *NOW
}

pub fn demo_store() -> FinanceStore {
    seed::demo(now()).expect("seed demo store")
}

/// Creates a config manager backed by a unique directory.
pub fn temp_config() -> (ConfigManager, std::path::PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    let manager = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (manager, base)
}

pub fn txn(id: &str, amount: f64, kind: TransactionKind, category: &str, days_ago: i64) -> Transaction {
    Transaction::new(
        format!("Transaction {id}"),
        amount,
        kind,
        category,
        "Main Checking",
        now() - chrono::Duration::days(days_ago),
    )
    .with_id(id)
}
