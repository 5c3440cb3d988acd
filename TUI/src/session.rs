use chrono::{DateTime, Utc};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, warn};

use crate::command::{CommandParser, ParseError};
use crate::executor::{Executor, Outcome};
use crate::store::FileStore;

pub const GREETING: &str = "👋 Hi! I'm your drive assistant. Send me commands like:\n\n\
• LIST /ProjectX\n\
• DELETE /ProjectX/report.pdf\n\
• MOVE /ProjectX/report.pdf /Archive\n\
• SUMMARY /ProjectX\n\
• HELP for more commands";

pub const UNRECOGNIZED_TEXT: &str =
    "❌ Command not recognized. Type HELP to see available commands.";
pub const FAILURE_TEXT: &str = "❌ Error processing command. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    File,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Error,
    Warning,
}

impl ActionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ActionStatus::Success => "success",
            ActionStatus::Error => "error",
            ActionStatus::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionLogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub details: String,
    pub status: ActionStatus,
}

/// Append-only chat transcript.
#[derive(Debug, Default, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation opened by the assistant greeting.
    pub fn with_greeting() -> Self {
        let mut conversation = Self::new();
        conversation.push(GREETING.to_string(), Sender::Assistant, MessageKind::Text);
        conversation
    }

    pub fn push(&mut self, content: String, sender: Sender, kind: MessageKind) -> &Message {
        let id = self.messages.len() as u64 + 1;
        self.messages.push(Message {
            id,
            content,
            sender,
            timestamp: Utc::now(),
            kind,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Aggregate counters shown on the dashboard
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogStats {
    pub total: usize,
    pub successes: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl LogStats {
    /// Rounded percentage of successful entries; 0 when empty.
    pub fn success_rate(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.successes as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ActionLog {
    entries: Vec<ActionLogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: String, details: String, status: ActionStatus) {
        let id = self.entries.len() as u64 + 1;
        self.entries.push(ActionLogEntry {
            id,
            timestamp: Utc::now(),
            action,
            details,
            status,
        });
    }

    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn stats(&self) -> LogStats {
        self.entries.iter().fold(
            LogStats {
                total: self.entries.len(),
                ..LogStats::default()
            },
            |mut stats, entry| {
                match entry.status {
                    ActionStatus::Success => stats.successes += 1,
                    ActionStatus::Error => stats.errors += 1,
                    ActionStatus::Warning => stats.warnings += 1,
                }
                stats
            },
        )
    }
}

/// One store, one transcript, one action log.
pub struct Session {
    pub store: FileStore,
    pub conversation: Conversation,
    pub log: ActionLog,
}

impl Session {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            conversation: Conversation::with_greeting(),
            log: ActionLog::new(),
        }
    }

    /// Handle one user submission. Blank input is ignored and yields `None`;
    /// otherwise returns the assistant reply.
    pub fn submit(&mut self, input: &str) -> Option<&Message> {
        self.submit_with(input, respond)
    }

    /// Record a submission whose reply comes from `work`. A panic inside
    /// `work` becomes the generic failure reply with status error.
    fn submit_with<F>(&mut self, input: &str, work: F) -> Option<&Message>
    where
        F: FnOnce(&mut FileStore, &str) -> (String, Outcome),
    {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.conversation
            .push(input.to_string(), Sender::User, MessageKind::Text);

        let store = &mut self.store;
        let (action, outcome) = panic::catch_unwind(AssertUnwindSafe(|| work(store, input)))
            .unwrap_or_else(|_| {
                warn!(input = %input, "command handling panicked");
                let outcome = Outcome {
                    response: FAILURE_TEXT.to_string(),
                    status: ActionStatus::Error,
                    lists_files: false,
                };
                ("Processing failed".to_string(), outcome)
            });

        info!(action = %action, status = outcome.status.label(), "handled submission");
        self.log
            .record(action, format!("User sent: {}", input), outcome.status);

        let kind = if outcome.lists_files {
            MessageKind::File
        } else {
            MessageKind::Text
        };
        Some(
            self.conversation
                .push(outcome.response, Sender::Assistant, kind),
        )
    }
}

/// Parse and execute one input, returning the log action and the outcome.
fn respond(store: &mut FileStore, input: &str) -> (String, Outcome) {
    match CommandParser::parse(input) {
        Ok(command) => {
            if command.is_destructive() {
                info!(command = %command.describe(), "running destructive command");
            }
            let outcome = Executor::new(store).execute(&command);
            (command.describe(), outcome)
        }
        Err(err) => {
            let (action, response) = match err {
                ParseError::Unrecognized => ("Unrecognized input", UNRECOGNIZED_TEXT),
                ParseError::MissingArgument { usage } => ("Incomplete command", usage),
            };
            let outcome = Outcome {
                response: response.to_string(),
                status: ActionStatus::Error,
                lists_files: false,
            };
            (action.to_string(), outcome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DELETE_USAGE;
    use crate::executor::GUARD_TEXT;

    fn session() -> Session {
        Session::new(FileStore::demo())
    }

    #[test]
    fn test_starts_with_greeting() {
        let session = session();
        assert_eq!(session.conversation.len(), 1);
        let greeting = &session.conversation.messages()[0];
        assert_eq!(greeting.sender, Sender::Assistant);
        assert_eq!(greeting.content, GREETING);
        assert!(session.log.is_empty());
    }

    #[test]
    fn test_submit_appends_pair_and_log_entry() {
        let mut session = session();
        let reply = session.submit("LIST /ProjectX").unwrap();
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.kind, MessageKind::File);

        let messages = session.conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].content, "LIST /ProjectX");

        assert_eq!(session.log.len(), 1);
        let entry = &session.log.entries()[0];
        assert_eq!(entry.action, "LIST /ProjectX");
        assert_eq!(entry.details, "User sent: LIST /ProjectX");
        assert_eq!(entry.status, ActionStatus::Success);
    }

    #[test]
    fn test_blank_submission_ignored() {
        let mut session = session();
        assert!(session.submit("   ").is_none());
        assert_eq!(session.conversation.len(), 1);
        assert!(session.log.is_empty());
    }

    #[test]
    fn test_unrecognized_input() {
        let mut session = session();
        let reply = session.submit("make me a sandwich").unwrap();
        assert_eq!(reply.content, UNRECOGNIZED_TEXT);
        assert_eq!(reply.kind, MessageKind::Text);
        let entry = &session.log.entries()[0];
        assert_eq!(entry.action, "Unrecognized input");
        assert_eq!(entry.status, ActionStatus::Error);
    }

    #[test]
    fn test_missing_argument_shows_usage() {
        let mut session = session();
        let reply = session.submit("DELETE").unwrap();
        assert_eq!(reply.content, DELETE_USAGE);
        assert_eq!(session.log.entries()[0].status, ActionStatus::Error);
    }

    #[test]
    fn test_status_reflects_outcome_not_text() {
        let mut session = session();
        session.submit("DELETE *");
        session.submit("DELETE /Archive/old_report.pdf");
        session.submit("DELETE /Archive/old_report.pdf");

        let statuses: Vec<ActionStatus> = session.log.entries().iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![ActionStatus::Warning, ActionStatus::Success, ActionStatus::Error]
        );
        assert_eq!(session.conversation.messages()[2].content, GUARD_TEXT);
    }

    #[test]
    fn test_natural_language_wildcard_delete_is_guarded() {
        let mut session = session();
        let before = session.store.len();
        let reply = session.submit("please delete /ProjectX*").unwrap();
        assert_eq!(reply.content, GUARD_TEXT);
        assert_eq!(session.store.len(), before);
        assert!(session.store.get("/ProjectX").is_some());
        assert_eq!(session.log.entries()[0].status, ActionStatus::Warning);
    }

    #[test]
    fn test_panic_becomes_failure_reply() {
        let mut session = session();
        let reply = session
            .submit_with("LIST /ProjectX", |_, _| panic!("store exploded"))
            .unwrap();
        assert_eq!(reply.content, FAILURE_TEXT);
        assert_eq!(reply.kind, MessageKind::Text);

        assert_eq!(session.conversation.len(), 3);
        assert_eq!(session.log.len(), 1);
        let entry = &session.log.entries()[0];
        assert_eq!(entry.action, "Processing failed");
        assert_eq!(entry.details, "User sent: LIST /ProjectX");
        assert_eq!(entry.status, ActionStatus::Error);
    }

    #[test]
    fn test_round_trip_delete_then_list() {
        let mut session = session();
        session.submit("DELETE /Documents/contract.pdf");
        let reply = session.submit("LIST /Documents").unwrap();
        assert!(reply.content.contains("is empty or doesn't exist"));
        assert!(session.store.get("/Documents/contract.pdf").is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut first = session();
        let second = session();
        first.submit("DELETE /Documents/contract.pdf");
        assert!(second.store.get("/Documents/contract.pdf").is_some());
    }

    #[test]
    fn test_message_ids_increase() {
        let mut session = session();
        session.submit("HELP");
        session.submit("LIST");
        let ids: Vec<u64> = session.conversation.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_stats_and_recent() {
        let mut log = ActionLog::new();
        assert_eq!(log.stats().success_rate(), 0);

        log.record("LIST /".to_string(), String::new(), ActionStatus::Success);
        log.record("DELETE /x".to_string(), String::new(), ActionStatus::Error);
        log.record("DELETE *".to_string(), String::new(), ActionStatus::Warning);

        let stats = log.stats();
        assert_eq!(
            stats,
            LogStats { total: 3, successes: 1, errors: 1, warnings: 1 }
        );
        assert_eq!(stats.success_rate(), 33);

        let recent: Vec<&str> = log.recent(2).map(|e| e.action.as_str()).collect();
        assert_eq!(recent, vec!["DELETE *", "DELETE /x"]);
    }
}
