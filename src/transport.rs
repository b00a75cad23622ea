//! Inbound/outbound message types and the transport contract.
//!
//! The real-time connection (websocket framing, reconnects, auth) lives
//! outside this crate. The core only consumes an ordered stream of
//! [`Message`] values and pushes replies through a [`Transport`].

use anyhow::Result;

/// An inbound chat message. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Wire-assigned sequence id.
    pub id: u64,
    /// Channel the message arrived on.
    pub channel: String,
    /// Sender's display name.
    pub user: String,
    /// Raw message text, wire mention tokens included.
    pub text: String,
    /// Wire timestamp, opaque to the core (used to address reactions).
    pub timestamp: String,
}

/// A reply produced by a command handler. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub channel: String,
    pub text: String,
}

impl Response {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
        }
    }
}

/// Outbound side of the chat connection.
pub trait Transport: Send + Sync {
    /// Send a reply to its channel.
    fn send(&self, response: &Response) -> Result<()>;

    /// Attach an emoji reaction to the message at `timestamp` in `channel`.
    fn react(&self, channel: &str, timestamp: &str, emoji: &str) -> Result<()>;
}
