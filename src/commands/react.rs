//! `?react :emoji: to <text>` / `?unreact :emoji: to <text>` — emoji
//! auto-reaction rules.
//!
//! The auto-react side is a pure side effect: it fires reactions through the
//! transport and falls through, so the same message can still reach later
//! commands.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection};

use crate::commands::BotContext;
use crate::error::CommandError;
use crate::router::{Command, MatchOutcome};
use crate::transport::{Message, Response, Transport};

static TRIGGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)\?(react|unreact) :(\w+?): to (.+)$").unwrap());

pub struct ReactCommand {
    ctx: BotContext,
    transport: Arc<dyn Transport>,
}

impl ReactCommand {
    pub fn new(ctx: BotContext, transport: Arc<dyn Transport>) -> Self {
        Self { ctx, transport }
    }
}

fn emojis_for(conn: &Connection, target: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT emoji FROM reactions WHERE target = ?1")?;
    let rows = stmt
        .query_map(params![target], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

impl Command for ReactCommand {
    fn name(&self) -> &'static str {
        "react"
    }

    fn matches(&self, msg: &Message) -> MatchOutcome {
        if TRIGGER.is_match(&msg.text) {
            return MatchOutcome::stop();
        }

        let target = msg.text.trim().to_lowercase();
        if target.is_empty() {
            return MatchOutcome::NoMatch;
        }
        let Ok(conn) = self.ctx.conn() else {
            return MatchOutcome::NoMatch;
        };
        match emojis_for(&conn, &target) {
            Ok(emojis) if !emojis.is_empty() => MatchOutcome::fall_through(),
            _ => MatchOutcome::NoMatch,
        }
    }

    fn execute(&self, msg: &Message) -> Result<Option<Response>, CommandError> {
        let conn = self.ctx.conn()?;

        if let Some(caps) = TRIGGER.captures(&msg.text) {
            let removing = caps[1].eq_ignore_ascii_case("unreact");
            let emoji = &caps[2];
            let target = caps[3].to_lowercase();

            let reply = if removing {
                conn.execute(
                    "DELETE FROM reactions WHERE target = ?1 AND emoji = ?2",
                    params![target, emoji],
                )?;
                format!("Removed :{emoji}: reaction")
            } else {
                conn.execute(
                    "INSERT INTO reactions (target, emoji) VALUES (?1, ?2)",
                    params![target, emoji],
                )?;
                "Got it.".to_string()
            };
            return Ok(Some(Response::new(&msg.channel, reply)));
        }

        let target = msg.text.trim().to_lowercase();
        for emoji in emojis_for(&conn, &target)? {
            if let Err(e) = self.transport.react(&msg.channel, &msg.timestamp, &emoji) {
                tracing::error!(emoji = %emoji, error = %e, "failed to add reaction");
            }
        }

        Ok(None)
    }

    fn syntax(&self) -> &'static str {
        "?(un)react <emoji> to <string>"
    }

    fn description(&self) -> &'static str {
        "React with an emoji whenever a message exactly matches a learned string"
    }
}
