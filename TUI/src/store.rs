// In-memory mock drive backing the assistant

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Folder,
    Document,
    Image,
    Other,
}

impl FileKind {
    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Folder => "📁",
            _ => "📄",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    pub size: Option<u64>,
    pub modified_at: NaiveDate,
}

impl FileRecord {
    pub fn new(path: &str, kind: FileKind, size: Option<u64>, modified_at: NaiveDate) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            name,
            path: path.to_string(),
            kind,
            size,
            modified_at,
        }
    }

    /// Path of the containing folder; "" for top-level entries.
    pub fn parent(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("no record at {0}")]
    NotFound(String),

    #[error("a record already exists at {0}")]
    AlreadyExists(String),

    #[error("refusing bulk operation on {0:?}")]
    UnsafePath(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Canned document summaries keyed by file name
const SUMMARIES: &[(&str, &str)] = &[
    ("quarterly_report.pdf", "Q4 financial performance shows 15% growth with key metrics exceeding targets. Revenue increased significantly in cloud services division."),
    ("meeting_notes.docx", "Weekly team meeting covering project milestones, budget allocation, and upcoming deadlines. Action items assigned to team members."),
    ("budget_analysis.xlsx", "Comprehensive financial analysis showing cost breakdowns, ROI calculations, and resource allocation for next quarter."),
    ("presentation.pptx", "Executive presentation outlining project goals, current progress, and strategic recommendations for stakeholder review."),
    ("contract.pdf", "Legal agreement with vendor specifications, payment terms, deliverables, and compliance requirements."),
    ("old_report.pdf", "Historical analysis from previous quarter showing baseline metrics and comparative performance data."),
];

const GENERIC_SUMMARY: &str =
    "Document contains business information and data relevant to project objectives.";

pub fn summary_for(name: &str) -> &'static str {
    SUMMARIES
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, summary)| *summary)
        .unwrap_or(GENERIC_SUMMARY)
}

/// True for paths a single delete must never touch.
pub fn is_bulk_path(path: &str) -> bool {
    path.is_empty() || path == "/" || path.contains('*')
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct FileStore {
    records: Vec<FileRecord>,
}

impl FileStore {
    pub fn with_records(records: Vec<FileRecord>) -> Self {
        Self { records }
    }

    /// The mock drive every session starts with.
    pub fn demo() -> Self {
        use FileKind::*;
        Self::with_records(vec![
            FileRecord::new("/ProjectX", Folder, None, date(2024, 1, 15)),
            FileRecord::new("/Archive", Folder, None, date(2024, 1, 10)),
            FileRecord::new("/Documents", Folder, None, date(2024, 1, 20)),
            FileRecord::new("/ProjectX/quarterly_report.pdf", Document, Some(2_048_576), date(2024, 1, 15)),
            FileRecord::new("/ProjectX/meeting_notes.docx", Document, Some(524_288), date(2024, 1, 14)),
            FileRecord::new("/ProjectX/budget_analysis.xlsx", Document, Some(1_048_576), date(2024, 1, 13)),
            FileRecord::new("/ProjectX/presentation.pptx", Document, Some(3_145_728), date(2024, 1, 12)),
            FileRecord::new("/ProjectX/project_images", Folder, None, date(2024, 1, 11)),
            FileRecord::new("/Archive/old_report.pdf", Document, Some(1_572_864), date(2023, 12, 20)),
            FileRecord::new("/Documents/contract.pdf", Document, Some(2_097_152), date(2024, 1, 18)),
        ])
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.path == path)
    }

    /// Direct children of `path`. Root lists top-level entries.
    pub fn list(&self, path: &str) -> Vec<&FileRecord> {
        let normalized = path.trim_end_matches('/');

        if normalized.is_empty() {
            return self
                .records
                .iter()
                .filter(|r| !r.path.trim_start_matches('/').contains('/'))
                .collect();
        }

        self.records
            .iter()
            .filter(|r| r.parent() == normalized)
            .collect()
    }

    pub fn delete(&mut self, path: &str) -> Result<FileRecord> {
        if is_bulk_path(path) {
            return Err(StoreError::UnsafePath(path.to_string()));
        }

        let idx = self
            .records
            .iter()
            .position(|r| r.path == path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        let removed = self.records.remove(idx);
        info!(path = %removed.path, "deleted record");
        Ok(removed)
    }

    /// Re-home a record under `destination`. Returns the new path.
    pub fn move_to(&mut self, source: &str, destination: &str) -> Result<String> {
        let idx = self
            .records
            .iter()
            .position(|r| r.path == source)
            .ok_or_else(|| StoreError::NotFound(source.to_string()))?;

        let new_path = format!(
            "{}/{}",
            destination.trim_end_matches('/'),
            self.records[idx].name
        );

        if new_path != source && self.get(&new_path).is_some() {
            return Err(StoreError::AlreadyExists(new_path));
        }

        info!(from = %source, to = %new_path, "moved record");
        self.records[idx].path = new_path.clone();
        Ok(new_path)
    }

    pub fn search(&self, query: &str) -> Vec<&FileRecord> {
        let query = query.to_lowercase();
        let hits: Vec<&FileRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&query) || r.path.to_lowercase().contains(&query)
            })
            .collect();
        debug!(query = %query, hits = hits.len(), "searched store");
        hits
    }

    pub fn by_kind(&self, kind: FileKind) -> Vec<&FileRecord> {
        self.records.iter().filter(|r| r.kind == kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(records: &[&FileRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_list_root_returns_top_level_only() {
        let store = FileStore::demo();
        let root = store.list("/");
        assert_eq!(names(&root), vec!["ProjectX", "Archive", "Documents"]);
    }

    #[test]
    fn test_list_folder_strips_trailing_slash() {
        let store = FileStore::demo();
        let plain = names(&store.list("/ProjectX"));
        let slashed = names(&store.list("/ProjectX/"));
        assert_eq!(plain.len(), 5);
        assert_eq!(plain, slashed);
        assert!(plain.contains(&"project_images".to_string()));
    }

    #[test]
    fn test_list_missing_folder_is_empty() {
        let store = FileStore::demo();
        assert!(store.list("/Nope").is_empty());
        assert!(store.list("/ProjectX/project_images").is_empty());
    }

    #[test]
    fn test_list_does_not_descend() {
        let store = FileStore::with_records(vec![
            FileRecord::new("/a", FileKind::Folder, None, date(2024, 1, 1)),
            FileRecord::new("/a/b", FileKind::Folder, None, date(2024, 1, 1)),
            FileRecord::new("/a/b/c.txt", FileKind::Other, Some(1), date(2024, 1, 1)),
        ]);
        assert_eq!(names(&store.list("/a")), vec!["b"]);
        assert_eq!(names(&store.list("/a/b")), vec!["c.txt"]);
    }

    #[test]
    fn test_delete_removes_exact_match() {
        let mut store = FileStore::demo();
        let before = store.len();
        let removed = store.delete("/Archive/old_report.pdf").unwrap();
        assert_eq!(removed.name, "old_report.pdf");
        assert_eq!(store.len(), before - 1);
        assert!(store.get("/Archive/old_report.pdf").is_none());
    }

    #[test]
    fn test_delete_missing() {
        let mut store = FileStore::demo();
        assert_eq!(
            store.delete("/Archive/nothing.pdf"),
            Err(StoreError::NotFound("/Archive/nothing.pdf".to_string()))
        );
    }

    #[test]
    fn test_delete_refuses_bulk_paths() {
        let mut store = FileStore::demo();
        let before = store.len();
        for path in ["", "/", "*", "/ProjectX/*"] {
            assert!(matches!(store.delete(path), Err(StoreError::UnsafePath(_))));
        }
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_delete_folder_leaves_children() {
        let mut store = FileStore::demo();
        store.delete("/Documents").unwrap();
        assert!(store.get("/Documents/contract.pdf").is_some());
        assert_eq!(names(&store.list("/Documents")), vec!["contract.pdf"]);
    }

    #[test]
    fn test_move_rewrites_path_only() {
        let mut store = FileStore::demo();
        let original = store.get("/ProjectX/presentation.pptx").unwrap().clone();

        let new_path = store.move_to("/ProjectX/presentation.pptx", "/Archive/").unwrap();
        assert_eq!(new_path, "/Archive/presentation.pptx");

        let moved = store.get("/Archive/presentation.pptx").unwrap();
        assert_eq!(moved.name, original.name);
        assert_eq!(moved.size, original.size);
        assert_eq!(moved.modified_at, original.modified_at);
        assert!(store.get("/ProjectX/presentation.pptx").is_none());
    }

    #[test]
    fn test_move_to_root() {
        let mut store = FileStore::demo();
        let new_path = store.move_to("/Documents/contract.pdf", "/").unwrap();
        assert_eq!(new_path, "/contract.pdf");
        assert!(names(&store.list("/")).contains(&"contract.pdf".to_string()));
    }

    #[test]
    fn test_move_missing_source() {
        let mut store = FileStore::demo();
        assert!(matches!(
            store.move_to("/ProjectX/ghost.pdf", "/Archive"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_move_keeps_paths_unique() {
        let mut clash = FileStore::with_records(vec![
            FileRecord::new("/a/x.pdf", FileKind::Document, None, date(2024, 1, 1)),
            FileRecord::new("/b/x.pdf", FileKind::Document, None, date(2024, 1, 1)),
        ]);
        assert_eq!(
            clash.move_to("/a/x.pdf", "/b"),
            Err(StoreError::AlreadyExists("/b/x.pdf".to_string()))
        );
        assert!(clash.get("/a/x.pdf").is_some());
    }

    #[test]
    fn test_move_onto_itself_is_noop() {
        let mut store = FileStore::demo();
        let path = store.move_to("/Archive/old_report.pdf", "/Archive").unwrap();
        assert_eq!(path, "/Archive/old_report.pdf");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = FileStore::demo();
        let hits = store.search("REPORT");
        assert_eq!(names(&hits), vec!["quarterly_report.pdf", "old_report.pdf"]);
        assert_eq!(store.search("projectx").len(), 6);
    }

    #[test]
    fn test_by_kind() {
        let store = FileStore::demo();
        assert_eq!(store.by_kind(FileKind::Folder).len(), 4);
        assert_eq!(store.by_kind(FileKind::Document).len(), 6);
        assert!(store.by_kind(FileKind::Image).is_empty());
    }

    #[test]
    fn test_summary_lookup() {
        assert!(summary_for("contract.pdf").starts_with("Legal agreement"));
        assert_eq!(summary_for("unknown.doc"), GENERIC_SUMMARY);
    }

    #[test]
    fn test_record_name_and_parent() {
        let record = FileRecord::new("/ProjectX/a.pdf", FileKind::Document, None, date(2024, 1, 1));
        assert_eq!(record.name, "a.pdf");
        assert_eq!(record.parent(), "/ProjectX");

        let top = FileRecord::new("/ProjectX", FileKind::Folder, None, date(2024, 1, 1));
        assert_eq!(top.parent(), "");
    }
}
