//! `?learn <target> <value>` / `?unlearn <target> <value>`, plus the
//! catch-all `?<target>` recall.
//!
//! The recall side matches any other `?`-prefixed word that has at least one
//! learned association, so this command must be registered after every
//! command with a specific trigger.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::assoc;
use crate::commands::BotContext;
use crate::error::CommandError;
use crate::mentions;
use crate::router::{Command, MatchOutcome};
use crate::transport::{Message, Response};

static TRIGGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)\?(learn|unlearn) ([\w@<>|#]+) (.+)$").unwrap());

pub struct LearnCommand {
    ctx: BotContext,
}

impl LearnCommand {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// The normalized recall key for a `?<target>` message, if the text has
    /// that shape.
    fn recall_target(&self, text: &str) -> Option<String> {
        let first = text.split(' ').next()?;
        let rest = first.strip_prefix('?')?;
        if rest.is_empty() {
            return None;
        }
        Some(mentions::resolve_target(
            &rest.to_lowercase(),
            self.ctx.directory.as_ref(),
        ))
    }
}

impl Command for LearnCommand {
    fn name(&self) -> &'static str {
        "learn"
    }

    fn matches(&self, msg: &Message) -> MatchOutcome {
        if TRIGGER.is_match(&msg.text) {
            return MatchOutcome::stop();
        }

        // Recall probe: only claim `?<target>` when something is learned.
        let Some(target) = self.recall_target(&msg.text) else {
            return MatchOutcome::NoMatch;
        };
        let Ok(conn) = self.ctx.conn() else {
            return MatchOutcome::NoMatch;
        };
        match assoc::has_associations(&conn, &target) {
            Ok(true) => MatchOutcome::stop(),
            _ => MatchOutcome::NoMatch,
        }
    }

    fn execute(&self, msg: &Message) -> Result<Option<Response>, CommandError> {
        let conn = self.ctx.conn()?;
        let dir = self.ctx.directory.as_ref();

        if let Some(caps) = TRIGGER.captures(&msg.text) {
            let verb = caps[1].to_lowercase();
            let raw_target = &caps[2];
            let value = &caps[3];

            let reply = if verb == "unlearn" {
                let target = assoc::unlearn(&conn, dir, raw_target, value)?;
                format!("Unlearned {target}")
            } else {
                let target = assoc::learn(&conn, dir, raw_target, value)?;
                format!("OK, learned {target}")
            };
            return Ok(Some(Response::new(&msg.channel, reply)));
        }

        let Some(target) = self.recall_target(&msg.text) else {
            return Ok(None);
        };
        match assoc::recall_rendered(&conn, &target)? {
            Some(text) => Ok(Some(Response::new(&msg.channel, text))),
            None => Ok(None),
        }
    }

    fn syntax(&self) -> &'static str {
        "?(un)learn <target> <value>"
    }

    fn description(&self) -> &'static str {
        "Associate two things; recall one at random later with ?<target>"
    }
}
