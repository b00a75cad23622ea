//! Terminal views over the bot database.

use anyhow::Result;

use crate::assoc;
use crate::config::KarmacatConfig;
use crate::karma::{self, denominations};

/// Display ledger and store statistics in the terminal.
pub fn stats(config: &KarmacatConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let targets: i64 = conn.query_row("SELECT COUNT(*) FROM karma", [], |row| row.get(0))?;
    let associations = assoc::association_count(&conn)?;
    let denominations = denominations::list(&conn)?;

    println!("karmacat statistics");
    println!("{}", "=".repeat(40));
    println!("  Karma targets:       {targets}");
    println!("  Associations:        {associations}");
    println!("  Denominations:       {}", denominations.len());
    println!();

    let top = karma::top_targets(&conn, 10)?;
    if !top.is_empty() {
        println!("Top karma:");
        for (target, count) in top {
            println!("  {target:<20} {count}");
        }
    }

    Ok(())
}
