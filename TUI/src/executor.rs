// Runs parsed commands against a file store and renders the reply text

use tracing::{info, warn};

use crate::action::Command;
use crate::session::ActionStatus;
use crate::store::{summary_for, FileKind, FileStore, StoreError};

pub const HELP_TEXT: &str = "🤖 Available Commands:\n\n\
• LIST /path - List files in a folder\n\
• DELETE /path/file.ext - Delete a specific file\n\
• MOVE /source /destination - Move file/folder\n\
• SUMMARY /path - Get AI summary of documents\n\
• HELP - Show this help message\n\n\
Example:\n\
LIST /ProjectX\n\
DELETE /ProjectX/old_report.pdf\n\
MOVE /ProjectX/report.pdf /Archive/\n\
SUMMARY /ProjectX";

pub const GUARD_TEXT: &str =
    "⚠️ For safety, bulk deletion requires confirmation. Add CONFIRM to your command.";
pub const GUARD_CONFIRMED_TEXT: &str =
    "⚠️ Bulk deletion is disabled, even with CONFIRM. Delete files one at a time.";
pub const MOVE_FAILED_TEXT: &str = "❌ Could not move file. Check if paths exist.";

/// Reply text plus the real result of the operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub response: String,
    pub status: ActionStatus,
    /// Reply enumerates files
    pub lists_files: bool,
}

impl Outcome {
    fn new(response: String, status: ActionStatus) -> Self {
        Self {
            response,
            status,
            lists_files: false,
        }
    }

    fn success(response: String) -> Self {
        Self::new(response, ActionStatus::Success)
    }

    fn warning(response: String) -> Self {
        Self::new(response, ActionStatus::Warning)
    }

    fn error(response: String) -> Self {
        Self::new(response, ActionStatus::Error)
    }

    fn with_files(mut self) -> Self {
        self.lists_files = true;
        self
    }
}

pub struct Executor<'a> {
    store: &'a mut FileStore,
}

impl<'a> Executor<'a> {
    pub fn new(store: &'a mut FileStore) -> Self {
        Self { store }
    }

    pub fn execute(&mut self, command: &Command) -> Outcome {
        match command {
            Command::List { path } => self.list(path),
            Command::Delete { path, confirm } => self.delete(path, *confirm),
            Command::Move { source, destination } => self.move_file(source, destination),
            Command::Summary { path } => self.summary(path),
            Command::Help => Outcome::success(HELP_TEXT.to_string()),
        }
    }

    fn list(&self, path: &str) -> Outcome {
        let files = self.store.list(path);
        if files.is_empty() {
            return Outcome::warning(format!(
                "📁 Folder \"{}\" is empty or doesn't exist.",
                path
            ));
        }

        let entries: Vec<String> = files
            .iter()
            .map(|f| format!("{} {}", f.kind.icon(), f.name))
            .collect();
        Outcome::success(format!("📁 Files in \"{}\":\n\n{}", path, entries.join("\n"))).with_files()
    }

    fn delete(&mut self, path: &str, confirm: bool) -> Outcome {
        match self.store.delete(path) {
            Ok(_) => Outcome::success(format!("✅ Deleted \"{}\" successfully.", path)),
            Err(StoreError::UnsafePath(_)) => {
                warn!(path = %path, confirm, "blocked bulk delete");
                let text = if confirm { GUARD_CONFIRMED_TEXT } else { GUARD_TEXT };
                Outcome::warning(text.to_string())
            }
            Err(_) => Outcome::error(format!("❌ File \"{}\" not found.", path)),
        }
    }

    fn move_file(&mut self, source: &str, destination: &str) -> Outcome {
        match self.store.move_to(source, destination) {
            Ok(_) => Outcome::success(format!("✅ Moved \"{}\" to \"{}\"", source, destination)),
            Err(StoreError::AlreadyExists(path)) => Outcome::error(format!(
                "❌ Could not move file. \"{}\" already exists.",
                path
            )),
            Err(e) => {
                info!(error = %e, "move failed");
                Outcome::error(MOVE_FAILED_TEXT.to_string())
            }
        }
    }

    fn summary(&self, path: &str) -> Outcome {
        let files = self.store.list(path);
        if files.is_empty() {
            return Outcome::warning(format!("📁 No files found in \"{}\"", path));
        }

        let documents: Vec<String> = files
            .iter()
            .filter(|f| f.kind == FileKind::Document)
            .map(|f| format!("📄 {}\n• {}\n", f.name, summary_for(&f.name)))
            .collect();

        if documents.is_empty() {
            return Outcome::warning(format!(
                "📁 No documents found in \"{}\" to summarize.",
                path
            ));
        }

        Outcome::success(format!(
            "📋 Document Summary for \"{}\":\n\n{}",
            path,
            documents.join("\n")
        ))
        .with_files()
    }
}
