use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Fixed repertoire of session types the rotation cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    Build,
    Engage,
    Reflect,
}

impl SessionType {
    pub fn letter(&self) -> char {
        match self {
            SessionType::Build => 'B',
            SessionType::Engage => 'E',
            SessionType::Reflect => 'R',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionType::Build => "build",
            SessionType::Engage => "engage",
            SessionType::Reflect => "reflect",
        }
    }

    pub fn from_letter(c: char) -> Result<Self> {
        match c {
            'B' => Ok(SessionType::Build),
            'E' => Ok(SessionType::Engage),
            'R' => Ok(SessionType::Reflect),
            other => bail!("unknown session type letter: \"{other}\""),
        }
    }
}

/// The externally-defined rotation sequence, e.g. `BBRE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPattern {
    types: Vec<SessionType>,
}

pub const DEFAULT_PATTERN: &str = "BBRE";

pub fn pattern_path(root: &Path) -> PathBuf {
    root.join("rotation.conf")
}

impl Default for RotationPattern {
    fn default() -> Self {
        Self::parse(DEFAULT_PATTERN).unwrap()
    }
}

impl RotationPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            bail!("rotation pattern must not be empty");
        }
        let types = pattern
            .chars()
            .map(SessionType::from_letter)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { types })
    }

    /// Read the pattern from `rotation.conf` (`PATTERN=BBRE` line).
    /// Missing file or missing line falls back to the default.
    pub fn load(root: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(pattern_path(root)) else {
            return Self::default();
        };
        Self::from_conf(&content)
    }

    pub fn from_conf(content: &str) -> Self {
        content
            .lines()
            .filter_map(|line| line.strip_prefix("PATTERN="))
            .find_map(|p| Self::parse(p.trim()).ok())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Session type for a rotation index (wraps around the pattern).
    pub fn slot(&self, rotation_index: u64) -> SessionType {
        self.types[(rotation_index % self.types.len() as u64) as usize]
    }

    pub fn as_string(&self) -> String {
        self.types.iter().map(|t| t.letter()).collect()
    }
}
