use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{Config, COMMANDS};
use crate::session::{ActionLogEntry, Message, Session};
use crate::store::FileStore;
use crate::ui_state::UIState;

const SEND_ANIMATION_TICKS: u8 = 20;

/// JSON shape written by the F3 export
#[derive(Serialize)]
struct Transcript<'a> {
    exported_at: DateTime<Utc>,
    messages: &'a [Message],
    actions: &'a [ActionLogEntry],
}

pub struct App {
    pub ui: UIState,
    pub session: Session,
    pub config: Config,
    pub animation_frame: usize,
    pub animation_tick: u64,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            ui: UIState::new(),
            session: Session::new(FileStore::demo()),
            config,
            animation_frame: 0,
            animation_tick: 0,
        }
    }

    /// Check if command popup should be shown
    pub fn showing_command_popup(&self) -> bool {
        self.ui.input.starts_with('/') && !self.ui.input.contains(' ')
    }

    /// Get presets matching the text typed after "/"
    pub fn get_filtered_commands(&self) -> Vec<(&'static str, &'static str)> {
        if !self.ui.input.starts_with('/') {
            return vec![];
        }
        let filter = self.ui.input[1..].to_uppercase();
        COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.to_uppercase().starts_with(&filter))
            .copied()
            .collect()
    }

    /// Move selection up in command popup
    pub fn command_select_up(&mut self) {
        let filtered = self.get_filtered_commands();
        if filtered.is_empty() {
            return;
        }

        // Cycle: None -> last command -> ... -> 0 -> None
        self.ui.command_selection = match self.ui.command_selection {
            None => Some(filtered.len() - 1),
            Some(0) => None,
            Some(n) => Some(n - 1),
        };
    }

    /// Move selection down in command popup
    pub fn command_select_down(&mut self) {
        let filtered = self.get_filtered_commands();
        if filtered.is_empty() {
            return;
        }

        // Cycle: None -> 0 -> 1 -> ... -> last -> None
        self.ui.command_selection = match self.ui.command_selection {
            None => Some(0),
            Some(n) if n >= filtered.len() - 1 => None,
            Some(n) => Some(n + 1),
        };
    }

    /// Apply selected preset to input
    pub fn apply_command_selection(&mut self) {
        if let Some(idx) = self.ui.command_selection {
            let filtered = self.get_filtered_commands();
            if let Some((cmd, _)) = filtered.get(idx) {
                self.ui.input = cmd.to_string();
            }
        }
        self.reset_command_selection();
    }

    /// Reset command selection when input changes
    pub fn reset_command_selection(&mut self) {
        self.ui.command_selection = None;
        self.ui.completion = None;
    }

    /// Append pasted text, flattening newlines for the single-line input
    pub fn push_input(&mut self, text: &str) {
        let filtered: String = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        self.ui.input.push_str(&filtered);
        self.reset_command_selection();
    }

    pub fn next_tab(&mut self) {
        self.ui.tab = self.ui.tab.next();
        self.reset_command_selection();
    }

    pub fn tick(&mut self) {
        self.animation_tick += 1;
        self.animation_frame = (self.animation_frame + 1) % 360;
        self.ui.send_animation = self.ui.send_animation.saturating_sub(1);

        if self.config.status_timeout_ticks > 0
            && self.animation_tick % self.config.status_timeout_ticks == 0
        {
            self.ui.status_message = None;
        }
    }

    pub fn submit_message(&mut self) {
        if self.ui.input.trim().is_empty() {
            return;
        }

        let input = std::mem::take(&mut self.ui.input);
        if let Some(reply) = self.session.submit(&input) {
            debug!(reply_id = reply.id, "assistant replied");
        }

        self.ui.send_animation = SEND_ANIMATION_TICKS;
        self.ui.scroll_offset = 0;
        self.reset_command_selection();
    }

    /// Complete the trailing path token from the store. Repeated calls cycle
    /// through the matches for the originally typed prefix. Returns false
    /// when nothing matches.
    pub fn complete_path(&mut self) -> bool {
        let split_at = self.ui.input.rfind(' ').map(|i| i + 1).unwrap_or(0);
        let token = self.ui.input[split_at..].to_string();

        // Keep cycling only while the token is still the one we inserted
        let (prefix, next_idx) = match self.ui.completion.take() {
            Some((prefix, idx)) if self.path_candidates(&prefix).get(idx) == Some(&token) => {
                (prefix, idx + 1)
            }
            _ => (token, 0),
        };
        if !prefix.starts_with('/') {
            return false;
        }

        let candidates = self.path_candidates(&prefix);
        if candidates.is_empty() {
            return false;
        }
        let idx = next_idx % candidates.len();

        self.ui.input.truncate(split_at);
        self.ui.input.push_str(&candidates[idx]);
        self.ui.completion = Some((prefix, idx));
        true
    }

    /// Store paths starting with `prefix` (case-insensitive), sorted
    fn path_candidates(&self, prefix: &str) -> Vec<String> {
        let lowered = prefix.to_lowercase();
        let mut candidates: Vec<String> = self
            .session
            .store
            .search(prefix)
            .into_iter()
            .map(|r| r.path.clone())
            .filter(|p| p.to_lowercase().starts_with(&lowered))
            .collect();
        candidates.sort_unstable();
        candidates
    }

    /// Rough line count of the transcript, used to bound scrolling
    fn transcript_lines(&self) -> usize {
        self.session
            .conversation
            .messages()
            .iter()
            .map(|m| m.content.lines().count() + 1)
            .sum()
    }

    pub fn scroll_up(&mut self) {
        let max = self.transcript_lines();
        self.ui.scroll_offset = (self.ui.scroll_offset + self.config.scroll_step).min(max);
    }

    pub fn scroll_down(&mut self) {
        self.ui.scroll_offset = self.ui.scroll_offset.saturating_sub(self.config.scroll_step);
    }

    /// Write messages and action log as pretty JSON into the export dir
    pub fn export_transcript(&self) -> Result<PathBuf> {
        let now = Utc::now();
        let transcript = Transcript {
            exported_at: now,
            messages: self.session.conversation.messages(),
            actions: self.session.log.entries(),
        };

        let json = serde_json::to_string_pretty(&transcript)
            .context("Failed to serialize transcript")?;
        let path = self
            .config
            .export_dir
            .join(format!("drivechat-{}.json", now.format("%Y%m%d-%H%M%S")));
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), "exported transcript");
        Ok(path)
    }

    pub fn export(&mut self) {
        self.ui.status_message = Some(match self.export_transcript() {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(e) => format!("Export failed: {:#}", e),
        });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Sender;
    use crate::ui_state::Tab;

    #[test]
    fn test_popup_filters_presets_case_insensitively() {
        let mut app = App::default();
        app.ui.input = "/li".to_string();
        assert!(app.showing_command_popup());
        let filtered = app.get_filtered_commands();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|(cmd, _)| cmd.starts_with("LIST")));

        app.ui.input = "/show".to_string();
        assert_eq!(app.get_filtered_commands()[0].0, "Show me files in /Documents");
    }

    #[test]
    fn test_popup_hidden_after_space() {
        let mut app = App::default();
        app.ui.input = "LIST /ProjectX".to_string();
        assert!(!app.showing_command_popup());
        assert!(app.get_filtered_commands().is_empty());
    }

    #[test]
    fn test_selection_cycles_and_applies() {
        let mut app = App::default();
        app.ui.input = "/sum".to_string();
        app.command_select_down();
        assert_eq!(app.ui.command_selection, Some(0));
        app.command_select_down();
        assert_eq!(app.ui.command_selection, None);
        app.command_select_up();
        app.apply_command_selection();
        assert_eq!(app.ui.input, "SUMMARY /ProjectX");
        assert_eq!(app.ui.command_selection, None);
    }

    #[test]
    fn test_submit_clears_input_and_records() {
        let mut app = App::default();
        app.ui.input = "LIST /Archive".to_string();
        app.ui.scroll_offset = 6;
        app.submit_message();

        assert!(app.ui.input.is_empty());
        assert_eq!(app.ui.scroll_offset, 0);
        assert_eq!(app.ui.send_animation, SEND_ANIMATION_TICKS);
        let messages = app.session.conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].sender, Sender::Assistant);
        assert!(messages[2].content.contains("old_report.pdf"));
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut app = App::default();
        app.ui.input = "   ".to_string();
        app.submit_message();
        assert_eq!(app.session.conversation.len(), 1);
        assert!(app.session.log.is_empty());
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut app = App::default();
        app.push_input("MOVE /a\r\n/b");
        assert_eq!(app.ui.input, "MOVE /a /b");
    }

    #[test]
    fn test_complete_path_cycles() {
        let mut app = App::default();
        app.ui.input = "LIST /proj".to_string();
        assert!(app.complete_path());
        assert_eq!(app.ui.input, "LIST /ProjectX");

        assert!(app.complete_path());
        assert_eq!(app.ui.input, "LIST /ProjectX/budget_analysis.xlsx");
    }

    #[test]
    fn test_complete_path_wraps_around() {
        let mut app = App::default();
        app.ui.input = "LIST /proj".to_string();

        let seen: Vec<String> = (0..7)
            .map(|_| {
                assert!(app.complete_path());
                app.ui.input.clone()
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                "LIST /ProjectX",
                "LIST /ProjectX/budget_analysis.xlsx",
                "LIST /ProjectX/meeting_notes.docx",
                "LIST /ProjectX/presentation.pptx",
                "LIST /ProjectX/project_images",
                "LIST /ProjectX/quarterly_report.pdf",
                "LIST /ProjectX",
            ]
        );
    }

    #[test]
    fn test_editing_restarts_completion() {
        let mut app = App::default();
        app.ui.input = "LIST /proj".to_string();
        assert!(app.complete_path());
        assert!(app.complete_path());
        assert_eq!(app.ui.input, "LIST /ProjectX/budget_analysis.xlsx");

        app.ui.input = "LIST /ar".to_string();
        app.reset_command_selection();
        assert!(app.complete_path());
        assert_eq!(app.ui.input, "LIST /Archive");
        assert!(app.complete_path());
        assert_eq!(app.ui.input, "LIST /Archive/old_report.pdf");
    }

    #[test]
    fn test_complete_path_without_match() {
        let mut app = App::default();
        app.ui.input = "LIST /zzz".to_string();
        assert!(!app.complete_path());
        assert_eq!(app.ui.input, "LIST /zzz");

        app.ui.input = "LIST".to_string();
        assert!(!app.complete_path());
    }

    #[test]
    fn test_tab_toggle() {
        let mut app = App::default();
        assert_eq!(app.ui.tab, Tab::Chat);
        app.next_tab();
        assert_eq!(app.ui.tab, Tab::Dashboard);
        app.next_tab();
        assert_eq!(app.ui.tab, Tab::Chat);
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut app = App::default();
        app.scroll_down();
        assert_eq!(app.ui.scroll_offset, 0);
        for _ in 0..100 {
            app.scroll_up();
        }
        assert_eq!(app.ui.scroll_offset, app.transcript_lines());
    }

    #[test]
    fn test_status_message_expires() {
        let mut app = App::default();
        app.ui.status_message = Some("hello".to_string());
        for _ in 0..app.config.status_timeout_ticks {
            app.tick();
        }
        assert!(app.ui.status_message.is_none());
    }

    #[test]
    fn test_export_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            export_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut app = App::new(config);
        app.ui.input = "DELETE *".to_string();
        app.submit_message();

        let path = app.export_transcript().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["messages"].as_array().unwrap().len(), 3);
        assert_eq!(value["messages"][1]["sender"], "user");
        assert_eq!(value["actions"][0]["status"], "warning");
        assert_eq!(value["actions"][0]["action"], "DELETE *");
    }

    #[test]
    fn test_export_failure_sets_status() {
        let config = Config {
            export_dir: PathBuf::from("/definitely/not/a/dir"),
            ..Config::default()
        };
        let mut app = App::new(config);
        app.export();
        assert!(app
            .ui
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Export failed"));
    }
}
