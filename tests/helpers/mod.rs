#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use karmacat::commands::{build_router, BotContext};
use karmacat::db;
use karmacat::directory::StaticDirectory;
use karmacat::router::Router;
use karmacat::transport::{Message, Response, Transport};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// A directory with one user (`U1` → `Alice`) and one channel
/// (`C1` → `general`).
pub fn test_directory() -> StaticDirectory {
    StaticDirectory::new(
        HashMap::from([("U1".to_string(), "Alice".to_string())]),
        HashMap::from([("C1".to_string(), "general".to_string())]),
    )
}

/// Transport that records everything instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Response>>,
    pub reactions: Mutex<Vec<(String, String, String)>>,
}

impl Transport for RecordingTransport {
    fn send(&self, response: &Response) -> Result<()> {
        self.sent.lock().unwrap().push(response.clone());
        Ok(())
    }

    fn react(&self, channel: &str, timestamp: &str, emoji: &str) -> Result<()> {
        self.reactions.lock().unwrap().push((
            channel.to_string(),
            timestamp.to_string(),
            emoji.to_string(),
        ));
        Ok(())
    }
}

/// A full standard router over an in-memory database, plus the shared
/// handles the test can poke at directly.
pub struct TestBot {
    pub router: Router,
    pub db: Arc<Mutex<Connection>>,
    pub transport: Arc<RecordingTransport>,
}

pub fn test_bot() -> TestBot {
    let db = Arc::new(Mutex::new(test_db()));
    let transport = Arc::new(RecordingTransport::default());
    let ctx = BotContext::new(Arc::clone(&db), Arc::new(test_directory()));
    let router = build_router(ctx, transport.clone());
    TestBot {
        router,
        db,
        transport,
    }
}

impl TestBot {
    /// Dispatch `text` as a message from `user` and return the reply texts.
    pub fn say_as(&self, user: &str, text: &str) -> Vec<String> {
        let msg = Message {
            id: 1,
            channel: "general".to_string(),
            user: user.to_string(),
            text: text.to_string(),
            timestamp: "1700000000.000100".to_string(),
        };
        self.router
            .dispatch(&msg)
            .into_iter()
            .map(|r| r.text)
            .collect()
    }

    /// Dispatch `text` from the default test user.
    pub fn say(&self, text: &str) -> Vec<String> {
        self.say_as("bob", text)
    }
}
