//! Message ingestion and the console transport.
//!
//! [`run`] is the dispatch loop: messages are read in delivery order from a
//! channel, and each one is handed to its own blocking task so a slow
//! handler never blocks ingestion of later messages. Completion order across
//! distinct messages is unordered; within one message, handler iteration is
//! strictly sequential inside [`Router::dispatch`]. There is no mid-dispatch
//! cancellation — an executing handler always runs to completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::commands::{build_router, BotContext};
use crate::config::KarmacatConfig;
use crate::db;
use crate::router::Router;
use crate::transport::{Message, Response, Transport};

/// Consume messages until the sender side closes, dispatching each in its
/// own task. Completed tasks are reaped as later messages arrive, so the
/// task set stays bounded by the number of in-flight dispatches.
pub async fn run(
    router: Arc<Router>,
    transport: Arc<dyn Transport>,
    mut rx: mpsc::Receiver<Message>,
) {
    let mut tasks = tokio::task::JoinSet::new();

    loop {
        tokio::select! {
            msg = rx.recv() => {
                let Some(msg) = msg else { break };
                let router = Arc::clone(&router);
                let transport = Arc::clone(&transport);

                tasks.spawn_blocking(move || {
                    for response in router.dispatch(&msg) {
                        if let Err(e) = transport.send(&response) {
                            tracing::error!(channel = %response.channel, error = %e, "failed to send response");
                        }
                    }
                });
            }
            Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "dispatch task panicked");
                }
            }
        }
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            tracing::error!(error = %e, "dispatch task panicked");
        }
    }
}

/// Transport that prints to stdout, for local runs without a chat network.
pub struct ConsoleTransport;

impl Transport for ConsoleTransport {
    fn send(&self, response: &Response) -> Result<()> {
        println!("[{}] {}", response.channel, response.text);
        Ok(())
    }

    fn react(&self, channel: &str, _timestamp: &str, emoji: &str) -> Result<()> {
        println!("[{channel}] *reacts with :{emoji}:*");
        Ok(())
    }
}

/// Run the bot against stdin/stdout: every line read becomes a message on
/// the `console` channel.
pub async fn serve_console(config: KarmacatConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let ctx = BotContext::new(
        Arc::new(Mutex::new(conn)),
        Arc::new(config.build_directory()),
    );
    let transport: Arc<dyn Transport> = Arc::new(ConsoleTransport);
    let router = Arc::new(build_router(ctx, Arc::clone(&transport)));

    let (tx, rx) = mpsc::channel(64);
    let loop_task = tokio::spawn(run(router, transport, rx));

    let user = config.bot.console_user.clone();
    let counter = AtomicU64::new(0);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(user = %user, "console transport ready — type messages, ctrl-d to quit");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let id = counter.fetch_add(1, Ordering::Relaxed) + 1;
        let msg = Message {
            id,
            channel: "console".to_string(),
            user: user.clone(),
            text: line,
            timestamp: id.to_string(),
        };
        if tx.send(msg).await.is_err() {
            break;
        }
    }

    drop(tx);
    loop_task.await?;
    tracing::info!("console transport shut down");

    Ok(())
}
