//! The once-per-tick queue pipeline: dedup, readiness, auto-unblock,
//! promotion, budget-aware selection, and a single deferred write-back.

use crate::ideas::{self, Idea};
use crate::intel::IntelEntry;
use crate::item::{ArchiveFile, QueueFile, QueueItem, Source, Status};
use crate::normalize::normalize_title;
use crate::{
    unblock, BLOCKER_TIMEOUT_SECS, HEALTHY_FLOOR, IDEA_BUFFER, LOW_BUDGET_THRESHOLD,
    MAX_INTEL_PER_TICK, MAX_QUEUE_SIZE, STARVED_BUFFER,
};
use anyhow::Result;
use rota_store::Budget;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub fn queue_path(root: &Path) -> PathBuf {
    root.join("work-queue.json")
}

pub fn archive_path(root: &Path) -> PathBuf {
    root.join("archive").join("queue-archive.json")
}

/// Missing file starts empty; an unreadable one is renamed to
/// `*.json.corrupt` for inspection and replaced with defaults.
fn load_or_quarantine<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    match rota_store::load_json::<T>(path) {
        Ok(found) => found.unwrap_or_default(),
        Err(e) => {
            eprintln!("warning: {e}; starting empty");
            let aside = path.with_extension("json.corrupt");
            match std::fs::rename(path, &aside) {
                Ok(()) => eprintln!("unreadable file kept at {}", aside.display()),
                Err(e) => eprintln!("warning: could not move unreadable file aside: {e}"),
            }
            T::default()
        }
    }
}

/// What the tick should work on.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Item(QueueItem),
    /// Queue was empty; an idea is offered as a lower-commitment substitute.
    /// Downstream consumers must treat this as uncommitted work.
    IdeaFallback(Idea),
}

/// Summary of one housekeeping pass, for diagnostics.
#[derive(Debug, Default)]
pub struct HousekeepReport {
    pub duplicates_removed: Vec<(String, String)>,
    pub unblocked: Vec<String>,
    pub promoted_ideas: Vec<String>,
    pub promoted_intel: Vec<String>,
}

/// In-memory queue state for one tick. All mutations set a dirty flag;
/// `commit` writes each backing file at most once.
pub struct Pipeline {
    root: PathBuf,
    pub file: QueueFile,
    pub archive: ArchiveFile,
    pub ideas: Vec<Idea>,
    ideas_raw: String,
    dirty: bool,
    ideas_dirty: bool,
}

impl Pipeline {
    /// Read the queue, archive, and idea list once at tick start.
    /// Missing files start empty; a corrupt queue or archive file is
    /// reported, moved aside so `commit` cannot clobber it, and replaced
    /// with an empty document rather than aborting the tick.
    pub fn load(root: &Path) -> Result<Self> {
        let file = load_or_quarantine::<QueueFile>(&queue_path(root));
        let archive = load_or_quarantine::<ArchiveFile>(&archive_path(root));
        let (ideas, ideas_raw) = ideas::load(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            file,
            archive,
            ideas,
            ideas_raw,
            dirty: false,
            ideas_dirty: false,
        })
    }

    // ── Mutation helpers ──

    pub fn add_item(
        &mut self,
        title: &str,
        description: &str,
        priority: i32,
        source: Source,
    ) -> String {
        let id = self.file.mint_id();
        let mut item = QueueItem::new(id.clone(), title.to_string(), description.to_string(), source);
        item.priority = priority;
        self.file.queue.push(item);
        self.dirty = true;
        id
    }

    pub fn add_idea(&mut self, title: &str, description: &str, session: u64) {
        self.ideas.push(Idea {
            title: title.to_string(),
            description: description.to_string(),
            added_session: session,
        });
        self.ideas_dirty = true;
    }

    pub fn set_status(&mut self, id: &str, status: Status, session: u64, note: &str) -> Result<()> {
        let item = self
            .file
            .get_mut(id)
            .ok_or_else(|| anyhow::anyhow!("queue item not found: \"{id}\""))?;
        item.status = status;
        if !note.is_empty() {
            item.note(session, note);
        }
        self.dirty = true;
        Ok(())
    }

    pub fn set_blocker(&mut self, id: &str, check: Option<String>) -> Result<()> {
        let item = self
            .file
            .get_mut(id)
            .ok_or_else(|| anyhow::anyhow!("queue item not found: \"{id}\""))?;
        item.blocker_check = check;
        self.dirty = true;
        Ok(())
    }

    // ── Dedup ──

    /// Remove later items whose normalized title collides with an earlier
    /// one. Earlier (higher-priority) occurrences win. Removed duplicates
    /// are retired into the archive, never silently dropped. Idempotent.
    pub fn dedup(&mut self, session: u64) -> Vec<(String, String)> {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.file.queue.len());

        for mut item in std::mem::take(&mut self.file.queue) {
            let key = normalize_title(&item.title);
            let earlier = if key.is_empty() {
                None
            } else {
                seen.get(&key).cloned()
            };
            if let Some(earlier_id) = earlier {
                removed.push((item.id.clone(), item.title.clone()));
                item.status = Status::Retired;
                item.note(session, format!("duplicate of {earlier_id}"));
                self.archive.items.push(item);
            } else {
                seen.insert(key, item.id.clone());
                kept.push(item);
            }
        }

        self.file.queue = kept;
        if !removed.is_empty() {
            self.dirty = true;
        }
        removed
    }

    // ── Readiness ──

    /// Pending with every dependency done. A dep id that resolves to no
    /// known item counts as unmet.
    pub fn is_ready(&self, item: &QueueItem) -> bool {
        if item.status != Status::Pending {
            return false;
        }
        item.deps.iter().all(|dep| {
            self.file
                .get(dep)
                .map(|d| d.status == Status::Done)
                .unwrap_or(false)
        })
    }

    pub fn ready_items(&self) -> Vec<&QueueItem> {
        self.file.queue.iter().filter(|i| self.is_ready(i)).collect()
    }

    // ── Auto-unblock ──

    /// Poll every blocked item's blocker check. Purely advisory: a passing
    /// check flips the item to pending; anything else leaves it untouched.
    pub async fn auto_unblock(&mut self, session: u64) -> Vec<String> {
        let candidates: Vec<(String, String)> = self
            .file
            .queue
            .iter()
            .filter(|i| i.status == Status::Blocked)
            .filter_map(|i| i.blocker_check.as_ref().map(|c| (i.id.clone(), c.clone())))
            .collect();

        let mut unblocked = Vec::new();
        for (id, check) in candidates {
            if unblock::blocker_cleared(&check, BLOCKER_TIMEOUT_SECS, &self.root).await {
                if let Some(item) = self.file.get_mut(&id) {
                    item.status = Status::Pending;
                    item.blocker_check = None;
                    item.note(session, format!("auto-unblocked: `{check}` passed"));
                    self.dirty = true;
                    unblocked.push(id);
                }
            }
        }
        unblocked
    }

    // ── Selection ──

    /// Pick the next task. Ready items by priority (descending, stable);
    /// under a tight budget, small/medium items are preferred over large
    /// ones. An empty queue falls back to the oldest idea, explicitly
    /// flagged as such.
    pub fn select_next(&self, budget: &Budget) -> Option<Selection> {
        let mut ready = self.ready_items();
        ready.sort_by(|a, b| b.priority.cmp(&a.priority));

        if !ready.is_empty() {
            let pick = if budget.is_low(LOW_BUDGET_THRESHOLD) {
                ready
                    .iter()
                    .find(|i| i.complexity != crate::Complexity::L)
                    .or_else(|| ready.first())
            } else {
                ready.first()
            };
            return pick.map(|i| Selection::Item((*i).clone()));
        }

        self.ideas
            .iter()
            .min_by_key(|i| i.added_session)
            .map(|i| Selection::IdeaFallback(i.clone()))
    }

    // ── Idea promotion ──

    /// Promote ideas into the queue when the ready backlog runs thin.
    /// The buffer of retained ideas shrinks to one under starvation; the
    /// promotion count never lifts the ready count above the healthy floor
    /// in a single pass.
    pub fn promote_from_ideas(&mut self, session: u64) -> Vec<String> {
        let ready_count = self.ready_items().len();
        if ready_count >= HEALTHY_FLOOR {
            return Vec::new();
        }
        let buffer = if ready_count == 0 {
            STARVED_BUFFER
        } else {
            IDEA_BUFFER
        };

        let beyond_buffer = self.ideas.len().saturating_sub(buffer);
        let budget = HEALTHY_FLOOR - ready_count;
        let mut remaining = beyond_buffer.min(budget);
        if remaining == 0 {
            return Vec::new();
        }

        self.ideas.sort_by_key(|i| i.added_session);

        let mut queue_keys: HashSet<String> = self
            .file
            .queue
            .iter()
            .map(|i| normalize_title(&i.title))
            .collect();

        let mut promoted = Vec::new();
        let mut kept = Vec::new();
        for idea in std::mem::take(&mut self.ideas) {
            let key = normalize_title(&idea.title);
            let idea_key_elsewhere = kept
                .iter()
                .any(|k: &Idea| normalize_title(&k.title) == key);
            if remaining == 0 || queue_keys.contains(&key) || idea_key_elsewhere {
                kept.push(idea);
                continue;
            }
            let id = self.file.mint_id();
            let mut item = QueueItem::new(
                id,
                idea.title.clone(),
                idea.description.clone(),
                Source::BrainstormingAuto,
            );
            item.note(session, format!("promoted from idea list (added s{})", idea.added_session));
            queue_keys.insert(key);
            promoted.push(idea.title.clone());
            self.file.queue.push(item);
            remaining -= 1;
        }
        self.ideas = kept;

        if !promoted.is_empty() {
            self.dirty = true;
            self.ideas_dirty = true;
        }
        promoted
    }

    // ── Intelligence promotion ──

    /// Promote actionable intelligence entries, capped per tick and bounded
    /// by queue capacity. Non-actionable entries are discarded, not queued.
    pub fn promote_from_intel(&mut self, entries: &[IntelEntry], session: u64) -> Vec<String> {
        let mut queue_keys: HashSet<String> = self
            .file
            .queue
            .iter()
            .map(|i| normalize_title(&i.title))
            .collect();

        let mut promoted = Vec::new();
        for entry in entries {
            if promoted.len() >= MAX_INTEL_PER_TICK || self.file.queue.len() >= MAX_QUEUE_SIZE {
                break;
            }
            if !entry.is_actionable() {
                continue;
            }
            let title = entry.derive_title();
            let key = normalize_title(&title);
            if queue_keys.contains(&key) {
                continue;
            }
            let id = self.file.mint_id();
            let mut item = QueueItem::new(id, title.clone(), entry.actionable.clone(), Source::IntelAuto);
            item.tags.push(entry.kind.clone());
            item.note(session, format!("promoted from intelligence (origin s{})", entry.session));
            queue_keys.insert(key);
            self.file.queue.push(item);
            promoted.push(title);
        }

        if !promoted.is_empty() {
            self.file.last_intake_session = Some(session);
            self.dirty = true;
        }
        promoted
    }

    // ── Archive sweep ──

    /// Move done and retired items into the long-term archive.
    pub fn archive_sweep(&mut self) -> usize {
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.file.queue)
            .into_iter()
            .partition(|i| matches!(i.status, Status::Done | Status::Retired));
        self.file.queue = kept;
        let n = gone.len();
        if n > 0 {
            self.archive.items.extend(gone);
            self.dirty = true;
        }
        n
    }

    // ── Full housekeeping pass ──

    /// One tick's housekeeping, in dependency order. Individual item
    /// failures are absorbed; the pass always runs to completion.
    pub async fn housekeep(&mut self, session: u64, intel: &[IntelEntry]) -> HousekeepReport {
        let duplicates_removed = self.dedup(session);
        let unblocked = self.auto_unblock(session).await;
        let promoted_ideas = self.promote_from_ideas(session);
        let promoted_intel = self.promote_from_intel(intel, session);
        HousekeepReport {
            duplicates_removed,
            unblocked,
            promoted_ideas,
            promoted_intel,
        }
    }

    // ── Write-back ──

    /// Persist pending mutations, each backing file written at most once.
    /// Returns true when anything was written.
    pub fn commit(&mut self) -> Result<bool> {
        let mut wrote = false;
        if self.dirty {
            rota_store::save_json(&queue_path(&self.root), &self.file)?;
            rota_store::save_json(&archive_path(&self.root), &self.archive)?;
            self.dirty = false;
            wrote = true;
        }
        if self.ideas_dirty {
            ideas::save(&self.root, &self.ideas, &self.ideas_raw)?;
            self.ideas_dirty = false;
            wrote = true;
        }
        Ok(wrote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complexity;

    fn pipeline() -> (tempfile::TempDir, Pipeline) {
        let dir = tempfile::tempdir().unwrap();
        let p = Pipeline::load(dir.path()).unwrap();
        (dir, p)
    }

    fn intel(kind: &str, actionable: &str) -> IntelEntry {
        IntelEntry {
            kind: kind.into(),
            summary: String::new(),
            actionable: actionable.into(),
            session: 1,
        }
    }

    #[test]
    fn dedup_removes_later_duplicates() {
        let (_dir, mut p) = pipeline();
        p.add_item("Add RSS feed", "", 5, Source::Manual);
        p.add_item("add rss FEED!", "", 1, Source::Manual);
        p.add_item("Something else", "", 0, Source::Manual);

        let removed = p.dedup(7);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].0, "wq-2");
        assert_eq!(p.file.queue.len(), 2);
        // The earlier occurrence survives.
        assert_eq!(p.file.queue[0].id, "wq-1");
        // The duplicate landed in the archive, retired, with the removal
        // attributed to the session that ran the pass.
        assert_eq!(p.archive.items.len(), 1);
        assert_eq!(p.archive.items[0].status, Status::Retired);
        let note = p.archive.items[0].progress_notes.last().unwrap();
        assert_eq!(note.session, 7);
        assert!(note.text.contains("duplicate of wq-1"));
    }

    #[test]
    fn dedup_is_idempotent() {
        let (_dir, mut p) = pipeline();
        p.add_item("Fix the poller", "", 0, Source::Manual);
        p.add_item("fix the poller", "", 0, Source::Manual);
        assert_eq!(p.dedup(1).len(), 1);
        assert_eq!(p.dedup(2).len(), 0);
    }

    #[test]
    fn post_dedup_keys_are_unique() {
        let (_dir, mut p) = pipeline();
        for t in ["A thing", "a THING", "Another thing", "another thing!"] {
            p.add_item(t, "", 0, Source::Manual);
        }
        p.dedup(1);
        let keys: HashSet<String> = p
            .file
            .queue
            .iter()
            .map(|i| normalize_title(&i.title))
            .collect();
        assert_eq!(keys.len(), p.file.queue.len());
    }

    #[test]
    fn readiness_requires_done_deps() {
        let (_dir, mut p) = pipeline();
        let a = p.add_item("A", "", 0, Source::Manual);
        let b = p.add_item("B", "", 0, Source::Manual);
        p.file.get_mut(&b).unwrap().deps.push(a.clone());

        let ready: Vec<String> = p.ready_items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ready, vec![a.clone()]);

        p.set_status(&a, Status::Done, 1, "done").unwrap();
        let ready: Vec<String> = p.ready_items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ready, vec![b]);
    }

    #[test]
    fn missing_dep_is_unmet() {
        let (_dir, mut p) = pipeline();
        let a = p.add_item("A", "", 0, Source::Manual);
        p.file.get_mut(&a).unwrap().deps.push("wq-999".into());
        assert!(p.ready_items().is_empty());
    }

    #[test]
    fn select_prefers_priority() {
        let (_dir, mut p) = pipeline();
        p.add_item("low", "", 1, Source::Manual);
        let hi = p.add_item("high", "", 9, Source::Manual);
        match p.select_next(&Budget::new(None)).unwrap() {
            Selection::Item(item) => assert_eq!(item.id, hi),
            other => panic!("expected item, got {other:?}"),
        }
    }

    #[test]
    fn tight_budget_defers_large_items() {
        let (_dir, mut p) = pipeline();
        let big = p.add_item("big refactor", "", 9, Source::Manual);
        p.file.get_mut(&big).unwrap().complexity = Complexity::L;
        let small = p.add_item("small fix", "", 1, Source::Manual);

        let mut tight = Budget::new(Some(10.0));
        tight.record(8.0); // 2.0 remaining, under the threshold
        match p.select_next(&tight).unwrap() {
            Selection::Item(item) => assert_eq!(item.id, small),
            other => panic!("expected item, got {other:?}"),
        }

        // With budget to spare the large item wins on priority.
        match p.select_next(&Budget::new(Some(10.0))).unwrap() {
            Selection::Item(item) => assert_eq!(item.id, big),
            other => panic!("expected item, got {other:?}"),
        }
    }

    #[test]
    fn all_large_under_tight_budget_still_selects() {
        let (_dir, mut p) = pipeline();
        let big = p.add_item("only big", "", 5, Source::Manual);
        p.file.get_mut(&big).unwrap().complexity = Complexity::L;
        let mut tight = Budget::new(Some(3.0));
        tight.record(2.0);
        assert!(matches!(
            p.select_next(&tight),
            Some(Selection::Item(i)) if i.id == big
        ));
    }

    #[test]
    fn empty_queue_falls_back_to_idea() {
        let (_dir, mut p) = pipeline();
        p.add_idea("Webhook relay", "forward mentions", 19);
        p.add_idea("RSS exporter", "publish digests", 12);
        match p.select_next(&Budget::new(None)).unwrap() {
            Selection::IdeaFallback(idea) => assert_eq!(idea.title, "RSS exporter"),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn auto_unblock_flips_passing_checks_only() {
        let (dir, mut p) = pipeline();
        let a = p.add_item("waits on flag", "", 0, Source::Manual);
        p.set_status(&a, Status::Blocked, 1, "blocked on flag").unwrap();
        p.set_blocker(&a, Some("test -f ready.flag".into())).unwrap();
        let b = p.add_item("never clears", "", 0, Source::Manual);
        p.set_status(&b, Status::Blocked, 1, "").unwrap();
        p.set_blocker(&b, Some("false".into())).unwrap();

        assert!(p.auto_unblock(2).await.is_empty());

        std::fs::write(dir.path().join("ready.flag"), "").unwrap();
        let unblocked = p.auto_unblock(3).await;
        assert_eq!(unblocked, vec![a.clone()]);

        let item = p.file.get(&a).unwrap();
        assert_eq!(item.status, Status::Pending);
        assert!(item.blocker_check.is_none());
        assert!(item.progress_notes.iter().any(|n| n.text.contains("auto-unblocked")));
        assert_eq!(p.file.get(&b).unwrap().status, Status::Blocked);
    }

    #[test]
    fn starvation_shrinks_buffer_to_one() {
        let (_dir, mut p) = pipeline();
        p.add_idea("first", "d", 1);
        p.add_idea("second", "d", 2);

        let promoted = p.promote_from_ideas(10);
        assert_eq!(promoted, vec!["first".to_string()]);
        assert_eq!(p.ideas.len(), 1);
        assert_eq!(p.ideas[0].title, "second");
        assert_eq!(p.file.queue.len(), 1);
        assert_eq!(p.file.queue[0].source, Source::BrainstormingAuto);
    }

    #[test]
    fn healthy_queue_skips_promotion() {
        let (_dir, mut p) = pipeline();
        for i in 0..HEALTHY_FLOOR {
            p.add_item(&format!("task {i}"), "", 0, Source::Manual);
        }
        p.add_idea("spare", "d", 1);
        assert!(p.promote_from_ideas(10).is_empty());
        assert_eq!(p.ideas.len(), 1);
    }

    #[test]
    fn promotion_never_exceeds_healthy_floor() {
        let (_dir, mut p) = pipeline();
        for i in 0..8 {
            p.add_idea(&format!("idea {i}"), "d", i);
        }
        let promoted = p.promote_from_ideas(10);
        assert_eq!(promoted.len(), HEALTHY_FLOOR);
        assert_eq!(p.ready_items().len(), HEALTHY_FLOOR);
        assert_eq!(p.ideas.len(), 8 - HEALTHY_FLOOR);
    }

    #[test]
    fn promotion_skips_titles_already_queued() {
        let (_dir, mut p) = pipeline();
        p.add_item("RSS exporter", "", 0, Source::Manual);
        p.set_status("wq-1", Status::Done, 1, "").unwrap(); // queue has 0 ready
        p.add_idea("rss EXPORTER", "dup of queue item", 1);
        p.add_idea("fresh idea", "d", 2);
        p.add_idea("another one", "d", 3);

        let promoted = p.promote_from_ideas(10);
        assert!(!promoted.contains(&"rss EXPORTER".to_string()));
        // The duplicate idea stays in the list, unpromoted.
        assert!(p.ideas.iter().any(|i| i.title == "rss EXPORTER"));
    }

    #[test]
    fn intel_promotion_filters_and_caps() {
        let (_dir, mut p) = pipeline();
        let entries = vec![
            intel("tool_idea", "Build a markdown exporter for thread X"),
            intel("tool_idea", "Monitor the leaderboard for changes"),
            intel("pattern", "Implement retry backoff for the feed poller"),
            intel("tool_idea", "Create a digest view for quiet days as well"),
        ];
        let promoted = p.promote_from_intel(&entries, 42);
        // The monitoring entry is rejected; the cap stops at two.
        assert_eq!(
            promoted,
            vec![
                "Build a markdown exporter for thread X".to_string(),
                "Implement retry backoff for the feed poller".to_string(),
            ]
        );
        assert_eq!(p.file.last_intake_session, Some(42));
        assert!(p.file.queue.iter().all(|i| i.source == Source::IntelAuto));
    }

    #[test]
    fn intel_promotion_respects_capacity() {
        let (_dir, mut p) = pipeline();
        for i in 0..MAX_QUEUE_SIZE {
            p.add_item(&format!("filler {i}"), "", 0, Source::Manual);
        }
        let promoted = p.promote_from_intel(
            &[intel("tool_idea", "Build a markdown exporter for thread X")],
            42,
        );
        assert!(promoted.is_empty());
    }

    #[test]
    fn intel_promotion_dedups_against_queue() {
        let (_dir, mut p) = pipeline();
        p.add_item("Build a markdown exporter for thread X", "", 0, Source::Manual);
        let promoted = p.promote_from_intel(
            &[intel("tool_idea", "Build a markdown exporter for thread X")],
            42,
        );
        assert!(promoted.is_empty());
    }

    #[test]
    fn archive_sweep_moves_finished_items() {
        let (_dir, mut p) = pipeline();
        let a = p.add_item("done soon", "", 0, Source::Manual);
        p.add_item("stays", "", 0, Source::Manual);
        p.set_status(&a, Status::Done, 1, "").unwrap();

        assert_eq!(p.archive_sweep(), 1);
        assert_eq!(p.file.queue.len(), 1);
        assert_eq!(p.archive.items.len(), 1);
        assert_eq!(p.archive.items[0].id, a);
    }

    #[test]
    fn commit_writes_once_and_clears_dirty() {
        let (dir, mut p) = pipeline();
        p.add_item("persist me", "", 0, Source::Manual);
        assert!(p.commit().unwrap());
        assert!(!p.commit().unwrap()); // nothing dirty anymore

        let reloaded = Pipeline::load(dir.path()).unwrap();
        assert_eq!(reloaded.file.queue.len(), 1);
        assert_eq!(reloaded.file.next_id, 1);
    }

    #[test]
    fn corrupt_queue_file_starts_empty_and_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(queue_path(dir.path()), "{oops").unwrap();
        let p = Pipeline::load(dir.path()).unwrap();
        assert!(p.file.queue.is_empty());
        // The unreadable original survives for inspection.
        let aside = dir.path().join("work-queue.json.corrupt");
        assert_eq!(std::fs::read_to_string(aside).unwrap(), "{oops");
        assert!(!queue_path(dir.path()).exists());
    }

    #[test]
    fn corrupt_archive_file_does_not_abort_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("archive")).unwrap();
        std::fs::write(archive_path(dir.path()), "not json").unwrap();

        let mut p = Pipeline::load(dir.path()).unwrap();
        assert!(p.archive.items.is_empty());
        // A later commit writes a fresh archive without touching the
        // quarantined original.
        p.add_item("survives", "", 0, Source::Manual);
        p.commit().unwrap();
        let aside = dir.path().join("archive").join("queue-archive.json.corrupt");
        assert_eq!(std::fs::read_to_string(aside).unwrap(), "not json");
        let reloaded = Pipeline::load(dir.path()).unwrap();
        assert_eq!(reloaded.file.queue.len(), 1);
    }

    #[tokio::test]
    async fn housekeep_runs_full_pass() {
        let (_dir, mut p) = pipeline();
        p.add_item("Fix the poller", "", 0, Source::Manual);
        p.add_item("fix the poller", "", 0, Source::Manual);
        p.add_idea("spare idea", "d", 1);
        p.add_idea("second idea", "d", 2);

        let report = p
            .housekeep(5, &[intel("tool_idea", "Wire the webhook relay into intake")])
            .await;
        assert_eq!(report.duplicates_removed.len(), 1);
        assert!(report.promoted_ideas.len() + report.promoted_intel.len() >= 1);
        assert!(p.commit().unwrap());
    }
}
