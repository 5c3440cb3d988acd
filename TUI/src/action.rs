/// Commands the assistant understands, produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List direct children of a folder
    List {
        path: String,
    },
    /// Delete a single file; `confirm` is set when the text carried CONFIRM
    Delete {
        path: String,
        confirm: bool,
    },
    /// Move a file or folder record under another folder
    Move {
        source: String,
        destination: String,
    },
    /// Summarize the documents in a folder
    Summary {
        path: String,
    },
    /// Show help message
    Help,
}

impl Command {
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::List { .. } => "LIST",
            Command::Delete { .. } => "DELETE",
            Command::Move { .. } => "MOVE",
            Command::Summary { .. } => "SUMMARY",
            Command::Help => "HELP",
        }
    }

    /// One-line description used for the action log.
    pub fn describe(&self) -> String {
        match self {
            Command::List { path } | Command::Summary { path } => {
                format!("{} {}", self.keyword(), path)
            }
            Command::Delete { path, confirm: true } => format!("DELETE {} (confirmed)", path),
            Command::Delete { path, confirm: false } => format!("DELETE {}", path),
            Command::Move { source, destination } => {
                format!("MOVE {} -> {}", source, destination)
            }
            Command::Help => "HELP".to_string(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::Delete { .. } | Command::Move { .. })
    }
}
