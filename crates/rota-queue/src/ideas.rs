//! The idea list: a cheap, markdown-like staging area for work that has not
//! earned a queue slot yet. One bullet per active idea:
//!
//! ```text
//! - **Title**: short description (added s42)
//! ```
//!
//! Struck-through bullets (`- ~~...~~`) are retired and kept only for the
//! historical record.

use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Idea {
    pub title: String,
    pub description: String,
    /// Tick at which the idea was captured. Oldest ideas promote first.
    pub added_session: u64,
}

pub fn ideas_path(root: &Path) -> PathBuf {
    root.join("ideas.md")
}

fn idea_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^- \*\*(?P<title>.+?)\*\*: (?P<desc>.*?) \(added s(?P<session>\d+)\)\s*$")
            .unwrap()
    })
}

/// Parse active ideas out of the list. Retired (struck-through) lines and
/// anything that does not match the bullet shape are skipped.
pub fn parse_ideas(content: &str) -> Vec<Idea> {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("- ~~"))
        .filter_map(|line| {
            let caps = idea_re().captures(line)?;
            Some(Idea {
                title: caps["title"].to_string(),
                description: caps["desc"].to_string(),
                added_session: caps["session"].parse().ok()?,
            })
        })
        .collect()
}

/// Render active ideas back to the bullet format, preserving any retired
/// lines from the previous content verbatim.
pub fn render_ideas(ideas: &[Idea], previous: &str) -> String {
    let mut out = String::new();
    for line in previous.lines() {
        if line.trim_start().starts_with("- ~~") {
            out.push_str(line);
            out.push('\n');
        }
    }
    for idea in ideas {
        out.push_str(&format!(
            "- **{}**: {} (added s{})\n",
            idea.title, idea.description, idea.added_session
        ));
    }
    out
}

pub fn load(root: &Path) -> Result<(Vec<Idea>, String)> {
    let path = ideas_path(root);
    if !path.exists() {
        return Ok((Vec::new(), String::new()));
    }
    let content = std::fs::read_to_string(&path)?;
    let ideas = parse_ideas(&content);
    Ok((ideas, content))
}

pub fn save(root: &Path, ideas: &[Idea], previous: &str) -> Result<()> {
    let rendered = render_ideas(ideas, previous);
    rota_store::write_atomic(&ideas_path(root), rendered.as_bytes())
}
