use rota_queue::{IntelEntry, Pipeline, Selection, Source, Status};
use rota_store::Budget;
use std::path::{Path, PathBuf};

/// Externally captured intelligence awaiting intake.
fn intel_path(root: &Path) -> PathBuf {
    root.join("intelligence.json")
}

fn load_intel(root: &Path) -> Vec<IntelEntry> {
    match rota_store::load_json::<Vec<IntelEntry>>(&intel_path(root)) {
        Ok(entries) => entries.unwrap_or_default(),
        Err(e) => {
            eprintln!("warning: {e}; skipping intelligence intake");
            Vec::new()
        }
    }
}

fn session_counter(root: &Path) -> u64 {
    rota_rotation_counter(root).unwrap_or(0)
}

fn rota_rotation_counter(root: &Path) -> Option<u64> {
    rota_rotation::load_or_init(root)
        .ok()
        .map(|s| s.session_counter)
}

pub fn next(root: &Path) -> anyhow::Result<()> {
    let pipeline = Pipeline::load(root)?;
    let budget = Budget::from_env();
    match pipeline.select_next(&budget) {
        Some(Selection::Item(item)) => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Some(Selection::IdeaFallback(idea)) => {
            // Flagged so downstream consumers know this was not committed work.
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "fallback": true,
                    "title": idea.title,
                    "description": idea.description,
                    "added_session": idea.added_session,
                }))?
            );
        }
        None => println!("{{}}"),
    }
    Ok(())
}

pub fn list(root: &Path) -> anyhow::Result<()> {
    let pipeline = Pipeline::load(root)?;
    if pipeline.file.queue.is_empty() {
        println!("queue is empty");
        return Ok(());
    }
    for item in &pipeline.file.queue {
        let ready = if pipeline.is_ready(item) { " ready" } else { "" };
        println!(
            "{}  [{:?}]{} p{} {}",
            item.id, item.status, ready, item.priority, item.title
        );
    }
    Ok(())
}

pub fn add(root: &Path, title: &str, desc: &str, priority: i32) -> anyhow::Result<()> {
    let mut pipeline = Pipeline::load(root)?;
    let id = pipeline.add_item(title, desc, priority, Source::Manual);
    pipeline.commit()?;
    println!("added {id}: {title}");
    Ok(())
}

pub fn idea(root: &Path, title: &str, desc: &str) -> anyhow::Result<()> {
    let mut pipeline = Pipeline::load(root)?;
    pipeline.add_idea(title, desc, session_counter(root));
    pipeline.commit()?;
    println!("idea noted: {title}");
    Ok(())
}

fn transition(root: &Path, id: &str, status: Status, note: &str) -> anyhow::Result<()> {
    let mut pipeline = Pipeline::load(root)?;
    pipeline.set_status(id, status, session_counter(root), note)?;
    pipeline.commit()?;
    println!("{id} is now {status:?}");
    Ok(())
}

pub fn start(root: &Path, id: &str) -> anyhow::Result<()> {
    transition(root, id, Status::InProgress, "started")
}

pub fn done(root: &Path, id: &str) -> anyhow::Result<()> {
    transition(root, id, Status::Done, "completed")
}

pub fn retire(root: &Path, id: &str) -> anyhow::Result<()> {
    transition(root, id, Status::Retired, "retired without completion")
}

pub fn block(root: &Path, id: &str, check: Option<String>) -> anyhow::Result<()> {
    let mut pipeline = Pipeline::load(root)?;
    let session = session_counter(root);
    pipeline.set_status(id, Status::Blocked, session, "blocked")?;
    pipeline.set_blocker(id, check)?;
    pipeline.commit()?;
    println!("{id} is now Blocked");
    Ok(())
}

pub async fn housekeep(root: &Path) -> anyhow::Result<()> {
    let mut pipeline = Pipeline::load(root)?;
    let intel = load_intel(root);
    let report = pipeline.housekeep(session_counter(root), &intel).await;
    pipeline.commit()?;

    for (id, title) in &report.duplicates_removed {
        println!("removed duplicate {id}: {title}");
    }
    for id in &report.unblocked {
        println!("unblocked {id}");
    }
    for title in &report.promoted_ideas {
        println!("promoted idea: {title}");
    }
    for title in &report.promoted_intel {
        println!("promoted intel: {title}");
    }
    println!(
        "housekeeping done: {} duplicates, {} unblocked, {} ideas, {} intel",
        report.duplicates_removed.len(),
        report.unblocked.len(),
        report.promoted_ideas.len(),
        report.promoted_intel.len()
    );
    Ok(())
}

pub fn archive(root: &Path) -> anyhow::Result<()> {
    let mut pipeline = Pipeline::load(root)?;
    let n = pipeline.archive_sweep();
    pipeline.commit()?;
    println!("archived {n} items");
    Ok(())
}
