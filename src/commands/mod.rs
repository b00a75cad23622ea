//! Built-in command handlers and router wiring.
//!
//! Every handler receives its collaborators (connection, directory,
//! transport) at construction, so each one tests in isolation against an
//! in-memory store.

pub mod denomination;
pub mod help;
pub mod karma;
pub mod learn;
pub mod react;

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::directory::Directory;
use crate::error::CommandError;
use crate::router::{Command, Router};
use crate::transport::Transport;

/// Shared handles injected into every command.
#[derive(Clone)]
pub struct BotContext {
    pub db: Arc<Mutex<Connection>>,
    pub directory: Arc<dyn Directory>,
}

impl BotContext {
    pub fn new(db: Arc<Mutex<Connection>>, directory: Arc<dyn Directory>) -> Self {
        Self { db, directory }
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, CommandError> {
        self.db
            .lock()
            .map_err(|e| CommandError::Internal(format!("db lock poisoned: {e}")))
    }
}

/// Build the standard router.
///
/// Order matters: help is the meta command and goes first; karma and
/// denominations have narrow triggers; learn is the catch-all recall and
/// must come after them; react only auto-fires on plain text nothing else
/// claimed.
pub fn build_router(ctx: BotContext, transport: Arc<dyn Transport>) -> Router {
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(karma::KarmaCommand::new(ctx.clone())),
        Box::new(denomination::DenominationCommand::new(ctx.clone())),
        Box::new(learn::LearnCommand::new(ctx.clone())),
        Box::new(react::ReactCommand::new(ctx, transport)),
    ];

    let help = help::HelpCommand::for_commands(&commands);

    let mut all: Vec<Box<dyn Command>> = vec![Box::new(help)];
    all.extend(commands);
    Router::new(all)
}
