//! The karma ledger — a signed counter per normalized target.
//!
//! [`adjust`] is the single mutation entry point. The source-of-truth update
//! is one atomic `INSERT .. ON CONFLICT .. RETURNING` statement, so two
//! handlers adjusting the same target from concurrent message dispatches can
//! never lose an increment to a stale read.

pub mod denominations;

use rusqlite::{params, Connection, OptionalExtension};

use crate::directory::Directory;
use crate::mentions;

/// Fixed reply for a user trying to plus themselves.
pub const SELF_PLUS_REBUKE: &str = "You'll go blind that way.";

/// Result of a karma adjustment.
#[derive(Debug)]
pub enum AdjustOutcome {
    /// Self-increment refused; nothing was written.
    Rebuked { message: String },
    /// Counter adjusted (or, on a write failure, computed in memory).
    Adjusted {
        target: String,
        count: i64,
        message: String,
        /// Set when the write failed. The message is still usable, but the
        /// count may not have been saved.
        write_error: Option<rusqlite::Error>,
    },
}

impl AdjustOutcome {
    /// The reply text for the originating channel.
    pub fn message(&self) -> &str {
        match self {
            Self::Rebuked { message } => message,
            Self::Adjusted { message, .. } => message,
        }
    }
}

/// Apply a `+1`/`-1` adjustment to `raw_target` on behalf of `actor`.
///
/// The target is normalized through the mention resolver first, so
/// `?++ <@U123>` and `?++ alice` land on the same row. An actor plussing
/// their own normalized name gets [`SELF_PLUS_REBUKE`] and no mutation;
/// taking a plus from yourself is allowed.
pub fn adjust(
    conn: &Connection,
    dir: &dyn Directory,
    raw_target: &str,
    delta: i64,
    actor: &str,
) -> AdjustOutcome {
    debug_assert!(delta == 1 || delta == -1);

    let target = mentions::resolve_target(raw_target, dir);

    if delta > 0 && target == actor.trim().to_lowercase() {
        return AdjustOutcome::Rebuked {
            message: SELF_PLUS_REBUKE.to_string(),
        };
    }

    let (count, write_error) = match upsert_count(conn, &target, delta) {
        Ok(count) => (count, None),
        Err(e) => {
            // Keep answering even when the write fails: report the count we
            // would have landed on, computed from a best-effort read.
            let current = read_count(conn, &target).ok().flatten().unwrap_or(0);
            (current + delta, Some(e))
        }
    };

    let mut message = if delta > 0 {
        format!("{actor} gave a plus to {target}, ")
    } else {
        format!("{actor} took a plus from {target}, ")
    };
    message.push_str(&format!(
        "{target} now has {}.",
        pluralize(count, "plus")
    ));

    // Denomination table errors degrade to a plain count, never a failure.
    let exchange = denominations::decompose(conn, count).unwrap_or_default();
    if !exchange.is_empty() {
        message.push_str(&format!("\n\nThat's equivalent to {exchange}"));
    }

    AdjustOutcome::Adjusted {
        target,
        count,
        message,
        write_error,
    }
}

/// Atomic read-modify-write: insert the row at `delta`, or bump an existing
/// row by `delta`, returning the new count.
fn upsert_count(conn: &Connection, target: &str, delta: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "INSERT INTO karma (target, count) VALUES (?1, ?2)
         ON CONFLICT(target) DO UPDATE SET count = count + ?2
         RETURNING count",
        params![target, delta],
        |row| row.get(0),
    )
}

/// Current count for a normalized target, `None` if never adjusted.
pub fn read_count(conn: &Connection, target: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT count FROM karma WHERE target = ?1",
        params![target],
        |row| row.get(0),
    )
    .optional()
}

/// The targets with the highest counts, for the stats view.
pub fn top_targets(conn: &Connection, limit: usize) -> rusqlite::Result<Vec<(String, i64)>> {
    let mut stmt =
        conn.prepare("SELECT target, count FROM karma ORDER BY count DESC LIMIT ?1")?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// `1 plus`, `2 pluses`, `3 beers`. Labels already ending in `s` take `es`.
pub(crate) fn pluralize(count: i64, label: &str) -> String {
    if count == 1 {
        return format!("{count} {label}");
    }
    if label.ends_with('s') {
        format!("{count} {label}es")
    } else {
        format!("{count} {label}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::directory::StaticDirectory;

    fn test_db() -> Connection {
        db::open_memory_database().unwrap()
    }

    #[test]
    fn adjust_creates_row_lazily() {
        let conn = test_db();
        let dir = StaticDirectory::empty();

        let outcome = adjust(&conn, &dir, "gopher", 1, "alice");
        match outcome {
            AdjustOutcome::Adjusted {
                count, write_error, ..
            } => {
                assert_eq!(count, 1);
                assert!(write_error.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(read_count(&conn, "gopher").unwrap(), Some(1));
    }

    #[test]
    fn sequential_adjusts_sum_deltas() {
        let conn = test_db();
        let dir = StaticDirectory::empty();

        for _ in 0..5 {
            adjust(&conn, &dir, "gopher", 1, "alice");
        }
        for _ in 0..7 {
            adjust(&conn, &dir, "gopher", -1, "alice");
        }
        assert_eq!(read_count(&conn, "gopher").unwrap(), Some(-2));
    }

    #[test]
    fn counts_go_negative_without_clamping() {
        let conn = test_db();
        let dir = StaticDirectory::empty();

        adjust(&conn, &dir, "gopher", -1, "alice");
        assert_eq!(read_count(&conn, "gopher").unwrap(), Some(-1));
    }

    #[test]
    fn self_plus_is_rebuked_without_mutation() {
        let conn = test_db();
        let dir = StaticDirectory::empty();

        let outcome = adjust(&conn, &dir, "Alice", 1, "alice");
        assert!(matches!(outcome, AdjustOutcome::Rebuked { .. }));
        assert_eq!(outcome.message(), SELF_PLUS_REBUKE);
        assert_eq!(read_count(&conn, "alice").unwrap(), None);
    }

    #[test]
    fn self_plus_via_mention_is_rebuked() {
        let conn = test_db();
        let dir = StaticDirectory::new(
            std::collections::HashMap::from([("U1".to_string(), "Alice".to_string())]),
            Default::default(),
        );

        let outcome = adjust(&conn, &dir, "<@U1>", 1, "Alice");
        assert!(matches!(outcome, AdjustOutcome::Rebuked { .. }));
        assert_eq!(read_count(&conn, "alice").unwrap(), None);
    }

    #[test]
    fn self_minus_is_allowed() {
        let conn = test_db();
        let dir = StaticDirectory::empty();

        let outcome = adjust(&conn, &dir, "alice", -1, "alice");
        assert!(matches!(outcome, AdjustOutcome::Adjusted { .. }));
        assert_eq!(read_count(&conn, "alice").unwrap(), Some(-1));
    }

    #[test]
    fn message_pluralizes_count() {
        let conn = test_db();
        let dir = StaticDirectory::empty();

        let outcome = adjust(&conn, &dir, "gopher", 1, "alice");
        assert_eq!(
            outcome.message(),
            "alice gave a plus to gopher, gopher now has 1 plus."
        );

        let outcome = adjust(&conn, &dir, "gopher", 1, "alice");
        assert_eq!(
            outcome.message(),
            "alice gave a plus to gopher, gopher now has 2 pluses."
        );
    }

    #[test]
    fn message_includes_exchange_when_denominations_apply() {
        let conn = test_db();
        let dir = StaticDirectory::empty();

        denominations::upsert(&conn, 1, "nickel").unwrap();
        adjust(&conn, &dir, "gopher", 1, "alice");
        let outcome = adjust(&conn, &dir, "gopher", 1, "alice");
        assert_eq!(
            outcome.message(),
            "alice gave a plus to gopher, gopher now has 2 pluses.\n\n\
             That's equivalent to 2 nickels"
        );
    }

    #[test]
    fn pluralize_rules() {
        assert_eq!(pluralize(1, "plus"), "1 plus");
        assert_eq!(pluralize(2, "plus"), "2 pluses");
        assert_eq!(pluralize(2, "nickel"), "2 nickels");
        assert_eq!(pluralize(0, "plus"), "0 pluses");
    }
}
