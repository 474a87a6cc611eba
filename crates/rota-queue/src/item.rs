use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Blocked,
    Done,
    Retired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Complexity {
    S,
    #[default]
    M,
    L,
}

/// Where an item came from. Auto-promoted items carry their origin so
/// later audits can tell committed work from machine suggestions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    #[default]
    Manual,
    BrainstormingAuto,
    IntelAuto,
    TodoScan,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressNote {
    pub session: u64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocker_check: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub progress_notes: Vec<ProgressNote>,
}

impl QueueItem {
    pub fn new(id: String, title: String, description: String, source: Source) -> Self {
        Self {
            id,
            title,
            description,
            status: Status::Pending,
            priority: 0,
            complexity: Complexity::default(),
            deps: Vec::new(),
            tags: Vec::new(),
            source,
            blocker_check: None,
            progress_notes: Vec::new(),
        }
    }

    pub fn note(&mut self, session: u64, text: impl Into<String>) {
        self.progress_notes.push(ProgressNote {
            session,
            text: text.into(),
        });
    }
}

/// The persisted queue document (`work-queue.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueueFile {
    #[serde(default)]
    pub queue: Vec<QueueItem>,
    /// Highest id ever assigned; ids are never reused.
    #[serde(default)]
    pub next_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_intake_session: Option<u64>,
}

impl QueueFile {
    /// Mint the next stable item id (`wq-<n>`).
    pub fn mint_id(&mut self) -> String {
        self.next_id += 1;
        format!("wq-{}", self.next_id)
    }

    pub fn get(&self, id: &str) -> Option<&QueueItem> {
        self.queue.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut QueueItem> {
        self.queue.iter_mut().find(|i| i.id == id)
    }
}

/// Long-term archive for retired and completed items (`queue-archive.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArchiveFile {
    #[serde(default)]
    pub items: Vec<QueueItem>,
}
