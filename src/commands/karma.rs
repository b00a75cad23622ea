//! `?++ <target>` / `?-- <target>` — karma adjustment.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::commands::BotContext;
use crate::error::CommandError;
use crate::karma::{self, AdjustOutcome};
use crate::router::{Command, MatchOutcome};
use crate::transport::{Message, Response};

static TRIGGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\?(\+\+|--) ([\w@<>|#]+).*$").unwrap());

pub struct KarmaCommand {
    ctx: BotContext,
}

impl KarmaCommand {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }
}

impl Command for KarmaCommand {
    fn name(&self) -> &'static str {
        "karma"
    }

    fn matches(&self, msg: &Message) -> MatchOutcome {
        if TRIGGER.is_match(&msg.text) {
            MatchOutcome::stop()
        } else {
            MatchOutcome::NoMatch
        }
    }

    fn execute(&self, msg: &Message) -> Result<Option<Response>, CommandError> {
        let caps = TRIGGER
            .captures(&msg.text)
            .ok_or_else(|| CommandError::Internal("matched message stopped matching".into()))?;
        let delta = if &caps[1] == "++" { 1 } else { -1 };
        let raw_target = caps[2].to_string();

        let conn = self.ctx.conn()?;
        let outcome = karma::adjust(
            &conn,
            self.ctx.directory.as_ref(),
            &raw_target,
            delta,
            &msg.user,
        );

        if let AdjustOutcome::Adjusted {
            target,
            write_error: Some(e),
            ..
        } = &outcome
        {
            // Reply anyway; the count may not have been saved.
            tracing::error!(target = %target, error = %e, "karma write failed");
        }

        Ok(Some(Response::new(&msg.channel, outcome.message())))
    }

    fn syntax(&self) -> &'static str {
        "?++|-- <target>"
    }

    fn description(&self) -> &'static str {
        "Give a plus to (or take one from) a target, and show the exchange value"
    }
}
