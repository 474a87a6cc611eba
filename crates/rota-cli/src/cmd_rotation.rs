use rota_rotation::{load_or_init, save, Advance, Outcome, RotationPattern, RotationState};
use std::path::Path;

fn print_state(root: &Path, state: &RotationState, shell: bool) -> anyhow::Result<()> {
    let pattern = RotationPattern::load(root);
    let slot = pattern.slot(state.rotation_index);
    if shell {
        println!("ROTA_SESSION={}", state.session_counter);
        println!("ROTA_ROTATION_INDEX={}", state.rotation_index);
        println!("ROTA_RETRY_COUNT={}", state.retry_count);
        println!("ROTA_LAST_OUTCOME={}", state.last_outcome);
        println!("ROTA_SESSION_TYPE={}", slot.letter());
    } else {
        let mut doc = serde_json::to_value(state)?;
        doc["session_type"] = serde_json::Value::String(slot.letter().to_string());
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }
    Ok(())
}

pub fn read(root: &Path, shell: bool) -> anyhow::Result<()> {
    let state = load_or_init(root)?;
    print_state(root, &state, shell)
}

pub fn advance(root: &Path, shell: bool) -> anyhow::Result<()> {
    let mut state = load_or_init(root)?;
    match state.advance() {
        Advance::Advanced => {}
        Advance::Retried { retry } => {
            eprintln!(
                "retrying slot {} after {} (attempt {retry})",
                state.rotation_index, state.last_outcome
            );
        }
        Advance::Forced => {
            eprintln!(
                "retry cap exceeded; forcing rotation past a failing slot to index {}",
                state.rotation_index
            );
        }
    }
    save(root, &mut state)?;
    print_state(root, &state, shell)
}

pub fn set_outcome(root: &Path, outcome: &str) -> anyhow::Result<()> {
    let outcome: Outcome = outcome.parse()?;
    let mut state = load_or_init(root)?;
    state.set_outcome(outcome);
    save(root, &mut state)?;
    println!("recorded outcome: {outcome}");
    Ok(())
}

pub fn increment_counter(root: &Path) -> anyhow::Result<()> {
    let mut state = load_or_init(root)?;
    state.increment_counter();
    save(root, &mut state)?;
    println!("session counter: {}", state.session_counter);
    Ok(())
}
