//! On-disk layout of one processing run.
//!
//! Every per-segment artifact is named by its 1-based segment index; this
//! module is the single place those names are minted and parsed back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};

const SCRIPT_SUFFIX: &str = "_AD_script.csv";

/// Directory holding the artifacts of one segmentation run.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create the workspace directory (and parents) if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create workspace directory {:?}", root))?;
        Ok(Self { root })
    }

    /// Open an existing workspace without touching the filesystem layout.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure!(root.is_dir(), "workspace {:?} is not a directory", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The global (pre-split) gap file.
    pub fn global_gap_path(&self) -> PathBuf {
        self.root.join("gaps.csv")
    }

    /// Newline-delimited cut-point registry, kept for audit.
    pub fn cut_points_path(&self) -> PathBuf {
        self.root.join("divide_timestamps.txt")
    }

    /// Trimmed proxy video for segment `index`.
    pub fn video_path(&self, index: usize) -> PathBuf {
        self.root.join(format!("segment_{index}.mp4"))
    }

    /// Segment-local gap file for segment `index`.
    pub fn gap_path(&self, index: usize) -> PathBuf {
        self.root.join(format!("segment_{index}.csv"))
    }

    /// Filled-in description script for segment `index`.
    pub fn script_path(&self, index: usize) -> PathBuf {
        self.root.join(format!("segment_{index}{SCRIPT_SUFFIX}"))
    }

    /// The merged, globally re-based description script.
    pub fn merged_script_path(&self) -> PathBuf {
        self.root.join("merged_AD_scripts.csv")
    }

    /// Discover filled-in description scripts, ordered by parsed segment
    /// index so `segment_10` sorts after `segment_9`, never between
    /// `segment_1` and `segment_2`.
    pub fn discover_scripts(&self) -> Result<Vec<(usize, PathBuf)>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("failed to list workspace {:?}", self.root))?;
        let mut scripts = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("failed to list workspace {:?}", self.root))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(index) = parse_script_index(name) {
                scripts.push((index, entry.path()));
            }
        }
        scripts.sort_by_key(|(index, _)| *index);
        Ok(scripts)
    }
}

fn parse_script_index(name: &str) -> Option<usize> {
    name.strip_prefix("segment_")?
        .strip_suffix(SCRIPT_SUFFIX)?
        .parse()
        .ok()
}
