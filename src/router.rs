//! The command trait and dispatch loop.
//!
//! A [`Router`] holds commands in registration order. For each inbound
//! message it asks every command in turn whether it matches; matched
//! commands execute and may produce one reply each. A matched command
//! normally ends the iteration — a command that only wants a side effect
//! reports `fall_through: true` so later commands still see the message.
//!
//! Registration order is load-bearing: narrow triggers (explicit command
//! words) must precede the catch-all recall command, or a learned
//! association could shadow a real command.

use crate::error::CommandError;
use crate::transport::{Message, Response};

/// Whether a command claims a message, and whether the message should keep
/// flowing to later commands after this one executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    NoMatch,
    Matched { fall_through: bool },
}

impl MatchOutcome {
    /// Claim the message and end iteration after executing.
    pub fn stop() -> Self {
        Self::Matched {
            fall_through: false,
        }
    }

    /// Claim the message but let later commands inspect it too.
    pub fn fall_through() -> Self {
        Self::Matched { fall_through: true }
    }
}

/// One command handler. Implementations get their store handles and
/// directory at construction.
pub trait Command: Send + Sync {
    /// Short name shown in the help listing.
    fn name(&self) -> &'static str;

    /// Decide whether this command handles `msg`.
    fn matches(&self, msg: &Message) -> MatchOutcome;

    /// Run the command. `Ok(None)` means the command was side-effect only.
    fn execute(&self, msg: &Message) -> Result<Option<Response>, CommandError>;

    /// Usage line shown in help and in malformed-input replies.
    fn syntax(&self) -> &'static str;

    /// One-line description for the help listing.
    fn description(&self) -> &'static str;
}

/// Ordered command list plus the dispatch loop.
pub struct Router {
    commands: Vec<Box<dyn Command>>,
}

impl Router {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Box<dyn Command>] {
        &self.commands
    }

    /// Run one message through the command list.
    ///
    /// Errors never halt the iteration: malformed input becomes a usage
    /// reply for the user, store failures are logged and skipped. Iteration
    /// ends after the first matched command that does not fall through.
    pub fn dispatch(&self, msg: &Message) -> Vec<Response> {
        let mut responses = Vec::new();

        for cmd in &self.commands {
            let MatchOutcome::Matched { fall_through } = cmd.matches(msg) else {
                continue;
            };

            tracing::debug!(command = cmd.name(), message_id = msg.id, "command matched");

            match cmd.execute(msg) {
                Ok(Some(response)) => responses.push(response),
                Ok(None) => {}
                Err(e) if e.is_invalid_argument() => {
                    responses.push(Response::new(&msg.channel, e.to_string()));
                }
                Err(e) => {
                    tracing::error!(command = cmd.name(), error = %e, "command failed");
                }
            }

            if !fall_through {
                break;
            }
        }

        responses
    }
}
