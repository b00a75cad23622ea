//! Chat-bot command core — karma ledger, associative memory, and
//! mention-aware command routing.
//!
//! karmacat listens to a channel of inbound messages and runs each one
//! through an ordered list of command handlers. The interesting parts:
//!
//! - **Karma ledger** — a signed counter per target (`?++ alice`), rendered
//!   against an operator-managed denomination table ("that's equivalent to
//!   1 beer and 2 nickels").
//! - **Associative memory** — `?learn`/`?unlearn`/`?<target>` key→multi-value
//!   store with random recall and single-level `?token` substitution.
//! - **Mention transcoding** — `<@U123>`-style wire tokens resolved to
//!   display names (and back) through an injected directory.
//! - **Command router** — handlers expose a match/fall-through protocol so
//!   side-effect handlers can share a message with later handlers while
//!   specific commands preempt the catch-all recall.
//!
//! # Architecture
//!
//! - **Storage**: SQLite via rusqlite; one table per subsystem, all access
//!   behind an `Arc<Mutex<Connection>>`
//! - **Transport**: a trait — the real-time connection is a collaborator,
//!   not part of this crate; a console transport ships for local use
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, and migrations
//! - [`directory`] — id⇄name lookup contracts for users and channels
//! - [`mentions`] — wire-token ⇄ display-name transcoding
//! - [`karma`] — the karma ledger and denomination decomposition
//! - [`assoc`] — the associative learn/unlearn/recall store
//! - [`router`] — the command trait and dispatch loop
//! - [`commands`] — the built-in command handlers
//! - [`server`] — message ingestion and the console transport

pub mod assoc;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod karma;
pub mod mentions;
pub mod router;
pub mod server;
pub mod transport;
