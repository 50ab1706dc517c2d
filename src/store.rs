//! Best-score persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub trait ScoreStore {
    /// `None` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<u32>>;

    fn save(&mut self, best: u32) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    best_score: u32,
}

/// Keeps `{"best_score": N}` in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonScoreStore { path: path.into() }
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&mut self) -> Result<Option<u32>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };

        let record: Record = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(record.best_score))
    }

    fn save(&mut self, best: u32) -> Result<()> {
        let raw = serde_json::to_string_pretty(&Record { best_score: best })?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))
    }
}

/// In-process store, for tests and throwaway runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    pub best: Option<u32>,
    pub saves: usize,
}

impl MemoryScoreStore {
    pub fn with_best(best: u32) -> Self {
        MemoryScoreStore { best: Some(best), saves: 0 }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<Option<u32>> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<()> {
        self.best = Some(best);
        self.saves += 1;
        Ok(())
    }
}
