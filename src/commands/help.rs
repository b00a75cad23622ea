//! `?help` — the meta command. Registered first and non-continuing, so it
//! can never double-fire with another command in the same dispatch.

use crate::error::CommandError;
use crate::router::{Command, MatchOutcome};
use crate::transport::{Message, Response};

pub struct HelpCommand {
    /// `(name, syntax)` pairs captured from the registered commands.
    entries: Vec<(&'static str, &'static str)>,
}

impl HelpCommand {
    /// Snapshot the help listing from a command list, before this command
    /// is prepended to it.
    pub fn for_commands(commands: &[Box<dyn Command>]) -> Self {
        let entries = commands
            .iter()
            .map(|cmd| (cmd.name(), cmd.syntax()))
            .collect();
        Self { entries }
    }
}

impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn matches(&self, msg: &Message) -> MatchOutcome {
        if msg.text == "?help" {
            MatchOutcome::stop()
        } else {
            MatchOutcome::NoMatch
        }
    }

    fn execute(&self, msg: &Message) -> Result<Option<Response>, CommandError> {
        let width = self
            .entries
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);

        let mut out = String::from("Here are all my known commands...\n```\n");
        for (name, syntax) in &self.entries {
            out.push_str(&format!("{name:>width$}: {syntax}\n"));
        }
        out.push_str("```");

        Ok(Some(Response::new(&msg.channel, out)))
    }

    fn syntax(&self) -> &'static str {
        "?help"
    }

    fn description(&self) -> &'static str {
        "List every command and its syntax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::msg;

    fn help() -> HelpCommand {
        HelpCommand {
            entries: vec![("karma", "?++|-- <target>"), ("learn", "?(un)learn <target> <value>")],
        }
    }

    #[test]
    fn matches_exact_help_text_only() {
        let cmd = help();
        assert_eq!(cmd.matches(&msg("?help")), MatchOutcome::stop());
        assert_eq!(cmd.matches(&msg("?help me")), MatchOutcome::NoMatch);
        assert_eq!(cmd.matches(&msg("help")), MatchOutcome::NoMatch);
    }

    #[test]
    fn lists_every_command() {
        let cmd = help();
        let response = cmd.execute(&msg("?help")).unwrap().unwrap();
        assert!(response.text.contains("karma: ?++|-- <target>"));
        assert!(response.text.contains("learn: ?(un)learn <target> <value>"));
        assert!(response.text.starts_with("Here are all my known commands..."));
    }
}
