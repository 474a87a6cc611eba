use rota_queue::seed::{self, default_rules};
use rota_queue::Pipeline;
use std::path::Path;

/// Scan a file of unstructured notes for queue seed suggestions.
/// With `--apply` the matched suggestion lands on the idea list, where the
/// normal promotion path picks it up when the queue runs thin.
pub fn execute(root: &Path, file: &str, apply: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("reading {file}: {e}"))?;

    let rules = default_rules();
    let Some(rule) = seed::evaluate(&rules, &text) else {
        println!("no seed rule matched");
        return Ok(());
    };

    println!("matched keywords {:?}", rule.keywords);
    println!("suggestion: {}", rule.suggestion);

    if apply {
        let mut pipeline = Pipeline::load(root)?;
        let session = rota_rotation::load_or_init(root)
            .map(|s| s.session_counter)
            .unwrap_or(0);
        pipeline.add_idea(rule.suggestion, &format!("seeded from {file}"), session);
        pipeline.commit()?;
        println!("recorded as idea");
    }
    Ok(())
}
