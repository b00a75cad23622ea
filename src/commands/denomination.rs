//! `?++d <value> <label>` / `?--d <value> <label>` — denomination table
//! management, plus the bare `?++d` exchange-rate display.

use crate::commands::BotContext;
use crate::error::CommandError;
use crate::karma::denominations;
use crate::router::{Command, MatchOutcome};
use crate::transport::{Message, Response};

pub struct DenominationCommand {
    ctx: BotContext,
}

impl DenominationCommand {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }
}

impl Command for DenominationCommand {
    fn name(&self) -> &'static str {
        "denomination"
    }

    fn matches(&self, msg: &Message) -> MatchOutcome {
        if msg.text.starts_with("?++d") || msg.text.starts_with("?--d") {
            MatchOutcome::stop()
        } else {
            MatchOutcome::NoMatch
        }
    }

    fn execute(&self, msg: &Message) -> Result<Option<Response>, CommandError> {
        let parts: Vec<&str> = msg.text.splitn(3, ' ').collect();
        let adding = parts[0].starts_with("?++d");

        // Bare trigger renders the table.
        if parts.len() == 1 {
            let conn = self.ctx.conn()?;
            let table = denominations::render_table(&conn)?;
            return Ok(Some(Response::new(&msg.channel, table)));
        }

        if parts.len() < 3 {
            return Ok(Some(Response::new(&msg.channel, self.syntax())));
        }

        let Ok(value) = parts[1].parse::<i64>() else {
            return Ok(Some(Response::new(&msg.channel, self.syntax())));
        };

        let label = parts[2];
        let conn = self.ctx.conn()?;

        let reply = if adding {
            denominations::upsert(&conn, value, label)?;
            format!("OK, added plus denomination {label}")
        } else {
            if value == 0 {
                return Err(CommandError::InvalidArgument(
                    "0 ain't no denomination!".to_string(),
                ));
            }
            denominations::remove(&conn, value)?;
            format!("OK, removed plus denomination {label}")
        };

        Ok(Some(Response::new(&msg.channel, reply)))
    }

    fn syntax(&self) -> &'static str {
        "?(++|--)d <plus count> <name>"
    }

    fn description(&self) -> &'static str {
        "Add or remove a plus denomination; bare ?++d shows the exchange rate"
    }
}
