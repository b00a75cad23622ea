//! The denomination table and greedy decomposition.
//!
//! Denominations are operator-managed exchange units: `{5: "nickel",
//! 25: "beer", -5: "penalty"}`. [`decompose`] renders a karma count as an
//! exchange phrase, consuming the largest-magnitude applicable denomination
//! first. Positive denominations only apply to positive counts, negative
//! ones to negative counts.

use std::collections::HashMap;

use rusqlite::{params, Connection};

use crate::error::CommandError;

/// One exchange unit. `value` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denomination {
    pub value: i64,
    pub label: String,
}

/// Insert a denomination, replacing any existing rule with the same value.
/// Zero is rejected — it can never be consumed by decomposition.
pub fn upsert(conn: &Connection, value: i64, label: &str) -> Result<(), CommandError> {
    if value == 0 {
        return Err(CommandError::InvalidArgument(
            "0 ain't no denomination!".to_string(),
        ));
    }
    conn.execute("DELETE FROM denominations WHERE value = ?1", params![value])?;
    conn.execute(
        "INSERT INTO denominations (value, label) VALUES (?1, ?2)",
        params![value, label],
    )?;
    Ok(())
}

/// Remove the denomination with this value. Removing an absent value is a
/// no-op.
pub fn remove(conn: &Connection, value: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM denominations WHERE value = ?1", params![value])?;
    Ok(())
}

/// All denominations, ordered by value ascending.
pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Denomination>> {
    let mut stmt = conn.prepare("SELECT value, label FROM denominations ORDER BY value ASC")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Denomination {
                value: row.get(0)?,
                label: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Render a count as an exchange phrase, e.g. `"1 beer and 2 nickels"`.
///
/// Reads the table fresh on every call, so rule changes take effect on the
/// next decomposition. Returns `""` for zero, for an empty table, and when
/// no denomination matches the count's sign.
pub fn decompose(conn: &Connection, value: i64) -> rusqlite::Result<String> {
    let rules = list(conn)?;
    Ok(decompose_with(&rules, value))
}

/// Greedy decomposition against an in-memory rule set.
///
/// Denominations are consumed largest-magnitude first: descending for a
/// positive count, most-negative first for a negative count. A denomination
/// is consumed while the remainder still reaches it (same-sign comparison).
/// Pieces are joined with `", "`; the piece that empties the remainder is
/// joined with `" and "`; a surviving remainder gets `" and a little
/// extra"` appended.
pub fn decompose_with(rules: &[Denomination], value: i64) -> String {
    let labels: HashMap<i64, &str> = rules
        .iter()
        .map(|d| (d.value, d.label.as_str()))
        .collect();

    let mut keys: Vec<i64> = labels.keys().copied().collect();
    if value < 0 {
        keys.sort_unstable();
    } else {
        keys.sort_unstable_by(|a, b| b.cmp(a));
    }

    let mut remainder = value;
    let mut out = String::new();

    for denom in keys {
        let same_sign =
            (remainder > 0 && denom > 0) || (remainder < 0 && denom < 0);
        if !same_sign {
            continue;
        }

        // Truncating division counts how many times the remainder reaches
        // this denomination; sign matching keeps the quotient non-negative.
        let coins = remainder / denom;
        if coins == 0 {
            continue;
        }
        remainder %= denom;

        let piece = super::pluralize(coins, labels[&denom]);
        if out.is_empty() {
            out.push_str(&piece);
            continue;
        }
        if remainder == 0 {
            out.push_str(" and ");
        } else {
            out.push_str(", ");
        }
        out.push_str(&piece);
    }

    // Approximation marker for gaps the table cannot express.
    if remainder != 0 && !out.is_empty() {
        out.push_str(" and a little extra");
    }

    out
}

/// The full table as a code-block reply, values aligned right.
pub fn render_table(conn: &Connection) -> rusqlite::Result<String> {
    let rules = list(conn)?;

    let width = rules
        .iter()
        .map(|d| d.value.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::from("Here's the current plus exchange rate\n```\n");
    for rule in &rules {
        out.push_str(&format!(
            "{:>width$}: {}\n",
            rule.value,
            rule.label,
            width = width
        ));
    }
    out.push_str("```");
    Ok(out)
}
