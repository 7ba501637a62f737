//! Notifier adapters.
//!
//! Messages are composed once in [`Notification`] and then either logged or
//! appended to an outbox file. Nothing here ever reports an error back to the
//! onboarding pipeline.

use crate::domain::ports::Notifier;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub const SUCCESS_SUBJECT: &str = "ABC Bank Onboarding Successful";
pub const FAILURE_SUBJECT: &str = "ABC Bank Onboarding Failure";

/// A composed message, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn success(to: &str, account_number: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: SUCCESS_SUBJECT.to_string(),
            body: format!(
                "Your account has been created successfully!\nAccount Number: {}\n",
                account_number
            ),
        }
    }

    pub fn failure(to: &str, reason: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: FAILURE_SUBJECT.to_string(),
            body: format!("Onboarding failed: {}", reason),
        }
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify_success(&self, _email: &str, _account_number: &str) {}
    fn notify_failure(&self, _email: &str, _reason: &str) {}
}

/// Writes every message to the log instead of delivering it.
///
/// Used when no sender address is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    fn log(notification: &Notification) {
        warn!(
            to = %notification.to,
            subject = %notification.subject,
            body = %notification.body,
            "Email sender not configured, falling back to logging"
        );
    }
}

impl Notifier for LogNotifier {
    fn notify_success(&self, email: &str, account_number: &str) {
        Self::log(&Notification::success(email, account_number));
    }

    fn notify_failure(&self, email: &str, reason: &str) {
        Self::log(&Notification::failure(email, reason));
    }
}

#[derive(Serialize)]
struct OutboxEntry<'a> {
    from: &'a str,
    #[serde(flatten)]
    notification: &'a Notification,
}

/// Appends every message as one JSON line to an outbox file for a mail relay
/// to pick up.
///
/// Messages are handed to a background writer task over an unbounded channel,
/// so callers never wait on disk I/O. The writer drains remaining messages and
/// exits once every clone of the notifier has been dropped.
#[derive(Clone)]
pub struct OutboxNotifier {
    queue: mpsc::UnboundedSender<Notification>,
}

impl OutboxNotifier {
    /// Starts the writer task. Must be called from within a `tokio` runtime.
    ///
    /// # Arguments
    ///
    /// * `path` - The outbox file; created on first write.
    /// * `sender` - The `from` address stamped on every message.
    pub fn spawn(path: impl Into<PathBuf>, sender: impl Into<String>) -> (Self, JoinHandle<()>) {
        let (queue, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_outbox(path.into(), sender.into(), rx));
        (Self { queue }, worker)
    }

    fn dispatch(&self, notification: Notification) {
        if let Err(mpsc::error::SendError(dropped)) = self.queue.send(notification) {
            error!(to = %dropped.to, "Outbox writer has stopped, notification dropped");
        }
    }
}

impl Notifier for OutboxNotifier {
    fn notify_success(&self, email: &str, account_number: &str) {
        self.dispatch(Notification::success(email, account_number));
    }

    fn notify_failure(&self, email: &str, reason: &str) {
        self.dispatch(Notification::failure(email, reason));
    }
}

async fn run_outbox(path: PathBuf, from: String, mut rx: mpsc::UnboundedReceiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        let entry = OutboxEntry {
            from: &from,
            notification: &notification,
        };
        match append_line(&path, &entry).await {
            Ok(()) => info!(to = %notification.to, "Notification queued"),
            Err(e) => error!(
                to = %notification.to,
                path = %path.display(),
                error = %e,
                "Error occurred while queueing notification"
            ),
        }
    }
}

async fn append_line(path: &Path, entry: &OutboxEntry<'_>) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(entry)?;
    line.push(b'\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(&line).await?;
    file.flush().await
}
