//! The associative memory store — learn/unlearn/recall.
//!
//! Associations map a normalized target to any number of values; duplicates
//! are kept and make a value proportionally more likely to surface on
//! recall. Recall substitutes nested `?token` references exactly once — a
//! recalled value is never re-scanned, so `?a → ?b → ?c` chains stop after
//! one hop and cyclic associations cannot loop.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::directory::Directory;
use crate::error::CommandError;
use crate::mentions;

/// `?token`: a `?` followed by a run of non-whitespace.
static RECALL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?(\S+)").unwrap());

/// The command words themselves can never become targets — `?learn` would
/// otherwise shadow the command that created it.
const CONTROL_WORDS: [&str; 2] = ["learn", "unlearn"];

fn normalized_target(
    dir: &dyn Directory,
    raw_target: &str,
) -> Result<String, CommandError> {
    let target = mentions::resolve_target(raw_target, dir);
    if CONTROL_WORDS.contains(&target.as_str()) {
        return Err(CommandError::InvalidArgument(format!(
            "\"{target}\" is not something I can learn about"
        )));
    }
    Ok(target)
}

/// Store an association. Duplicate pairs are inserted as-is.
pub fn learn(
    conn: &Connection,
    dir: &dyn Directory,
    raw_target: &str,
    value: &str,
) -> Result<String, CommandError> {
    let target = normalized_target(dir, raw_target)?;
    conn.execute(
        "INSERT INTO associations (target, value) VALUES (?1, ?2)",
        params![target, value],
    )?;
    Ok(target)
}

/// Delete every row matching the exact `(target, value)` pair. Deleting a
/// pair that was never learned is a no-op.
pub fn unlearn(
    conn: &Connection,
    dir: &dyn Directory,
    raw_target: &str,
    value: &str,
) -> Result<String, CommandError> {
    let target = normalized_target(dir, raw_target)?;
    conn.execute(
        "DELETE FROM associations WHERE target = ?1 AND value = ?2",
        params![target, value],
    )?;
    Ok(target)
}

/// One uniformly random value for `target`, or `None` if nothing is learned.
/// The target is expected to be normalized already.
pub fn recall(conn: &Connection, target: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM associations WHERE target = ?1 ORDER BY RANDOM() LIMIT 1",
        params![target],
        |row| row.get(0),
    )
    .optional()
}

/// Recall with one substitution pass.
///
/// Every `?token` occurrence found in the *original* recalled string gets
/// one nested [`recall`]; a hit replaces that occurrence, a miss leaves the
/// token text untouched. Values produced by nested recalls are not scanned
/// again.
pub fn recall_rendered(conn: &Connection, target: &str) -> rusqlite::Result<Option<String>> {
    let Some(value) = recall(conn, target)? else {
        return Ok(None);
    };

    let mut out = value.clone();
    for cap in RECALL_TOKEN.captures_iter(&value) {
        let whole = &cap[0];
        let token = cap[1].to_lowercase();
        if let Some(nested) = recall(conn, &token)? {
            out = out.replacen(whole, &nested, 1);
        }
    }

    Ok(Some(out))
}

/// Whether any association exists for a normalized target. Cheaper than
/// [`recall`] for the catch-all match probe.
pub fn has_associations(conn: &Connection, target: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM associations WHERE target = ?1)",
        params![target],
        |row| row.get(0),
    )
}

/// Number of stored associations, for the stats view.
pub fn association_count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM associations", [], |row| row.get(0))
}
