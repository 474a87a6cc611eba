use rota_launch::{run_tick, ProcessRunner, Tier};
use rota_queue::{Pipeline, Selection};
use rota_rotation::{load_or_init, save, Advance, RotationPattern};
use rota_store::Budget;
use std::path::Path;

/// One orchestration tick: decide the rotation slot, run queue
/// housekeeping, then launch the worker through the degradation tiers.
pub async fn execute(
    root: &Path,
    safe_mode: bool,
    emergency: bool,
    worker_args: &[String],
) -> anyhow::Result<()> {
    let forced_tier = if emergency {
        Some(Tier::Emergency)
    } else if safe_mode {
        Some(Tier::Safe)
    } else {
        None
    };

    // One tick at a time; the state files assume a single writer.
    let _lock = rota_store::lock_file(&root.join("tick.lock"))?;

    // Rotation decision first; it reads the previous tick's outcome.
    let mut state = load_or_init(root)?;
    match state.advance() {
        Advance::Advanced => {}
        Advance::Retried { retry } => {
            eprintln!("retrying rotation slot (attempt {retry})");
        }
        Advance::Forced => eprintln!("retry cap exceeded; rotation forced forward"),
    }
    save(root, &mut state)?;

    let pattern = RotationPattern::load(root);
    let slot = pattern.slot(state.rotation_index);
    println!(
        "tick s{}: session type {} (slot {})",
        state.session_counter,
        slot.letter(),
        state.rotation_index
    );

    // Queue housekeeping is best-effort; a failing pass must not stop the
    // launch.
    match housekeep_and_assign(root, state.session_counter).await {
        Ok(Some(assignment)) => println!("assigned: {assignment}"),
        Ok(None) => println!("queue empty, no assignment"),
        Err(e) => eprintln!("warning: queue housekeeping failed: {e}"),
    }

    let runner = ProcessRunner::new(root);
    let report = run_tick(root, &runner, slot, worker_args, forced_tier).await?;
    println!("worker launched at tier {}", report.tier.label());
    Ok(())
}

async fn housekeep_and_assign(root: &Path, session: u64) -> anyhow::Result<Option<String>> {
    let mut pipeline = Pipeline::load(root)?;
    let intel: Vec<rota_queue::IntelEntry> =
        rota_store::load_json(&root.join("intelligence.json"))
            .unwrap_or_default()
            .unwrap_or_default();
    pipeline.housekeep(session, &intel).await;

    let budget = Budget::from_env();
    let assignment = match pipeline.select_next(&budget) {
        Some(Selection::Item(item)) => Some(format!("{} {}", item.id, item.title)),
        Some(Selection::IdeaFallback(idea)) => Some(format!("(idea fallback) {}", idea.title)),
        None => None,
    };
    pipeline.commit()?;
    Ok(assignment)
}
