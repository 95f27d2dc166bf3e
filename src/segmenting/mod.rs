//! Threshold-aligned segment planning.
//!
//! Cut points are chosen where speech ends, never mid-sentence: the first
//! span end at or past each multiple of the step becomes a cut. The planner
//! owns the registry of cuts; rendering each segment's proxy video is
//! delegated to the transcoder collaborator and tolerated per segment.

pub mod rebase;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::media::{DurationProbe, SegmentTranscoder};
use crate::types::VoiceSpan;
use crate::workspace::Workspace;

/// One planned segment window and the fate of its rendered video.
#[derive(Debug)]
pub struct SegmentOutcome {
    /// 1-based segment index.
    pub index: usize,
    /// Global window start in seconds.
    pub start: f64,
    /// Global window end in seconds (exclusive).
    pub end: f64,
    /// Rendered proxy video, or why rendering failed.
    pub video: Result<PathBuf>,
}

/// The registry produced by planning: cut points plus per-segment outcomes.
///
/// `cut_points` always starts at 0.0 and ends at the probed video duration,
/// strictly increasing, even when transcoding failed for some windows.
#[derive(Debug)]
pub struct SegmentPlan {
    pub cut_points: Vec<f64>,
    pub outcomes: Vec<SegmentOutcome>,
}

impl SegmentPlan {
    pub fn window_count(&self) -> usize {
        self.cut_points.len().saturating_sub(1)
    }

    /// Indices of segments whose video failed to render.
    pub fn failed_segments(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.video.is_err())
            .map(|outcome| outcome.index)
            .collect()
    }
}

/// Choose threshold-aligned cut points from ordered span end-times.
///
/// The first end-time at or past the current threshold becomes a cut and the
/// threshold advances by one step. The returned list always starts with 0.0
/// and ends with `duration`, so a video shorter than the step yields a single
/// window.
pub fn plan_cut_points(span_ends: &[f64], duration: f64, step: f64) -> Vec<f64> {
    let mut cuts = vec![0.0];
    let mut threshold = step;
    for &end in span_ends {
        if end >= threshold {
            cuts.push(end);
            threshold += step;
        }
    }
    // Tail window: whatever is left after the last aligned cut.
    if *cuts.last().expect("cuts starts non-empty") < duration {
        cuts.push(duration);
    }
    cuts
}

/// Plan cut points for `source_video` and render each window's proxy video.
///
/// A failed duration probe aborts: without it no segmentation is possible. A
/// failed transcode does not: the cut point is kept, the failure is logged
/// and recorded in the outcome report, and planning continues - a corrupted
/// segment file is preferable to losing the alignment registry.
pub fn plan_segments(
    spans: &[VoiceSpan],
    source_video: &Path,
    workspace: &Workspace,
    config: &PipelineConfig,
    probe: &dyn DurationProbe,
    transcoder: &dyn SegmentTranscoder,
) -> Result<SegmentPlan> {
    let duration = probe
        .duration_secs(source_video)
        .with_context(|| format!("cannot segment {:?} without its duration", source_video))?;
    let span_ends: Vec<f64> = spans.iter().map(|span| span.end).collect();
    let cut_points = plan_cut_points(&span_ends, duration, config.threshold_step_secs);
    info!(
        "planned {} segment(s) over {:.1}s of video",
        cut_points.len() - 1,
        duration
    );

    let mut outcomes = Vec::with_capacity(cut_points.len().saturating_sub(1));
    for (window, pair) in cut_points.windows(2).enumerate() {
        let index = window + 1;
        let (start, end) = (pair[0], pair[1]);
        let dest = workspace.video_path(index);
        let video = transcoder
            .transcode(source_video, start, end, &dest)
            .map(|_| dest);
        if let Err(err) = &video {
            error!("segment {index} [{start:.2}s - {end:.2}s] transcode failed: {err:#}");
        }
        outcomes.push(SegmentOutcome {
            index,
            start,
            end,
            video,
        });
    }

    write_cut_points(&workspace.cut_points_path(), &cut_points)?;
    Ok(SegmentPlan {
        cut_points,
        outcomes,
    })
}

/// Persist the cut-point registry, one float per line, for audit.
pub fn write_cut_points(path: &Path, cut_points: &[f64]) -> Result<()> {
    let mut out = String::new();
    for value in cut_points {
        out.push_str(&format!("{value:?}\n"));
    }
    fs::write(path, out).with_context(|| format!("failed to write cut points to {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_cuts_to_span_ends_past_thresholds() {
        // First end >= 600 is 605; after resetting, first end >= 1200 is
        // 1215; the 1300 s tail closes the list.
        let cuts = plan_cut_points(&[590.0, 605.0, 1190.0, 1215.0], 1300.0, 600.0);
        assert_eq!(cuts, vec![0.0, 605.0, 1215.0, 1300.0]);
    }

    #[test]
    fn short_video_is_a_single_window() {
        let cuts = plan_cut_points(&[120.0, 240.0], 450.0, 600.0);
        assert_eq!(cuts, vec![0.0, 450.0]);
    }

    #[test]
    fn no_spans_still_covers_the_video() {
        let cuts = plan_cut_points(&[], 450.0, 600.0);
        assert_eq!(cuts, vec![0.0, 450.0]);
    }

    #[test]
    fn end_exactly_on_threshold_is_a_cut() {
        let cuts = plan_cut_points(&[600.0, 900.0], 900.0, 600.0);
        assert_eq!(cuts, vec![0.0, 600.0, 900.0]);
    }

    #[test]
    fn final_cut_at_duration_is_not_duplicated() {
        // Last aligned cut already equals the duration: no zero-width tail.
        let cuts = plan_cut_points(&[650.0], 650.0, 600.0);
        assert_eq!(cuts, vec![0.0, 650.0]);
    }

    #[test]
    fn cut_points_are_strictly_increasing() {
        let cuts = plan_cut_points(&[590.0, 605.0, 1190.0, 1215.0, 1800.0], 1900.0, 600.0);
        assert_eq!(cuts[0], 0.0);
        assert_eq!(*cuts.last().unwrap(), 1900.0);
        for pair in cuts.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn audit_file_lists_one_float_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("divide_timestamps.txt");
        write_cut_points(&path, &[0.0, 605.0, 1300.056]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0.0\n605.0\n1300.056\n");
    }
}
