//! Gap rebasing: partition the global gap list into segment-local clocks.

use anyhow::{Context, Result};

use crate::types::{round_tenth, Gap};
use crate::vad::gaps::write_gap_file;
use crate::workspace::Workspace;

/// Tolerance for window membership of rounded gap starts at cut boundaries.
const MEMBERSHIP_EPS: f64 = 1e-5;

/// Partition gaps into per-window lists, re-expressing each start in the
/// owning window's local clock.
///
/// Both inputs are sorted ascending, so a single forward cursor suffices: for
/// each window in order, gaps are consumed while they fall inside it, and the
/// first gap past the window is left for the next one. O(n) across all
/// windows. A gap whose end overhangs the boundary stays wholly in the window
/// that owns its start.
pub fn rebase_gaps(gaps: &[Gap], cut_points: &[f64]) -> Vec<Vec<Gap>> {
    let mut segments = Vec::with_capacity(cut_points.len().saturating_sub(1));
    let mut cursor = 0;
    for pair in cut_points.windows(2) {
        let (window_start, window_end) = (pair[0], pair[1]);
        let mut local = Vec::new();
        while cursor < gaps.len() {
            let gap = gaps[cursor];
            let inside = window_start - MEMBERSHIP_EPS <= gap.start
                && gap.start < window_end - MEMBERSHIP_EPS;
            if !inside {
                break;
            }
            local.push(Gap {
                start: round_tenth(gap.start - window_start),
                duration: gap.duration,
            });
            cursor += 1;
        }
        segments.push(local);
    }
    segments
}

/// Write one `segment_{i}.csv` per window, including empty ones, so every
/// segment the planner produced has its gap file alongside the video.
pub fn write_segment_gap_files(workspace: &Workspace, per_segment: &[Vec<Gap>]) -> Result<()> {
    for (window, gaps) in per_segment.iter().enumerate() {
        let index = window + 1;
        let path = workspace.gap_path(index);
        write_gap_file(&path, gaps)
            .with_context(|| format!("failed to write gap file for segment {index}"))?;
    }
    Ok(())
}
