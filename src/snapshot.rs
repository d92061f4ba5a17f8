//! Periodic JSON checkpoints of a running farm.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::farm::FarmSnapshot;

/// Writes `frame_XXXXXXXX.json` files every `interval_frames` frames.
/// An interval of zero disables writing.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval_frames: u64,
    last_frame: u64,
}

impl SnapshotWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P, interval_frames: u64) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        if interval_frames > 0 {
            fs::create_dir_all(&output_dir).with_context(|| {
                format!("failed to create snapshot dir {}", output_dir.display())
            })?;
        }
        Ok(Self {
            output_dir,
            interval_frames,
            last_frame: 0,
        })
    }

    pub fn should_write(&self, frame: u64) -> bool {
        if self.interval_frames == 0 {
            return false;
        }
        frame > 0 && frame - self.last_frame >= self.interval_frames
    }

    pub fn maybe_write(&mut self, frame: u64, snapshot: &FarmSnapshot) -> Result<Option<PathBuf>> {
        if !self.should_write(frame) {
            return Ok(None);
        }
        self.write(frame, snapshot).map(Some)
    }

    pub fn write(&mut self, frame: u64, snapshot: &FarmSnapshot) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("frame_{frame:08}.json"));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        self.last_frame = frame;
        tracing::debug!(frame, path = %path.display(), "snapshot written");
        Ok(path)
    }

    /// Snapshot files already in the output directory, in frame order.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !self.output_dir.exists() {
            return Ok(files);
        }
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            let is_frame = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with("frame_") && name.ends_with(".json"))
                .unwrap_or(false);
            if is_frame {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
