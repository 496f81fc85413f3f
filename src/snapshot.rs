use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::world::World;

/// Writes the similarity layer to `<dir>/<scenario>/tick_NNNNNN.json` every
/// `interval_ticks` ticks. An interval of zero disables output.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn is_due(&self, tick: u64) -> bool {
        self.interval_ticks != 0 && tick != 0 && tick % self.interval_ticks == 0
    }

    pub fn maybe_write(&self, world: &World, scenario_name: &str) -> Result<Option<PathBuf>> {
        if !self.is_due(world.tick()) {
            return Ok(None);
        }
        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", world.tick()));
        let json = serde_json::to_string_pretty(&world.snapshot(scenario_name))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_never_fires() {
        let writer = SnapshotWriter::new("unused", 0);
        assert!(!writer.is_due(0));
        assert!(!writer.is_due(10));
    }

    #[test]
    fn fires_on_multiples_only() {
        let writer = SnapshotWriter::new("unused", 5);
        assert!(!writer.is_due(0));
        assert!(!writer.is_due(4));
        assert!(writer.is_due(5));
        assert!(writer.is_due(10));
    }
}
