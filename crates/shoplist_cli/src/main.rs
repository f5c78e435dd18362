//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `shoplist_core` linkage.
//! - Optionally print summary counts of an existing item database.
//!
//! Usage: `shoplist_cli [DB_PATH]`

use shoplist_core::{ItemStore, SharingPolicy, StoreResult, SummaryCounts};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("shoplist_core ping={}", shoplist_core::ping());
    println!("shoplist_core version={}", shoplist_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match summarize(&db_path) {
        Ok(counts) => {
            println!("items all={}", counts.all_items);
            println!("items important={}", counts.important_items);
            println!("items bought={}", counts.bought_items);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("summary failed for `{db_path}`: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(db_path: &str) -> StoreResult<SummaryCounts> {
    let store = ItemStore::open(db_path, SharingPolicy::default())?;
    let bought_items = store
        .observe_all()
        .current()
        .iter()
        .filter(|item| item.is_bought)
        .count();
    Ok(SummaryCounts {
        all_items: store.count_all()?,
        important_items: store.count_high_priority()?,
        bought_items: i64::try_from(bought_items).unwrap_or(i64::MAX),
    })
}
