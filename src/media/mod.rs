//! Contracts for the external media collaborators the pipeline leans on.
//!
//! The pipeline itself never touches codecs; it needs three things from the
//! outside world, each pinned down here as a trait so stages can be exercised
//! against fakes in tests.

pub mod ffmpeg;

use std::path::Path;

use anyhow::Result;

/// Reports a container's exact duration in seconds.
///
/// Failure is fatal to the caller: without a trustworthy duration there is no
/// segmentation and no merge arithmetic.
pub trait DurationProbe {
    fn duration_secs(&self, path: &Path) -> Result<f64>;
}

/// Renders one trimmed segment `[start, end)` of the source video to `dest`.
///
/// Best-effort per segment: a failure leaves a hole in that segment's video
/// but must not disturb the cut-point registry.
pub trait SegmentTranscoder {
    fn transcode(&self, source: &Path, start: f64, end: f64, dest: &Path) -> Result<()>;
}

/// Fills in a description script for one segment from its proxy video and
/// local gap file.
///
/// Model and network concerns live entirely behind this seam; the merge stage
/// only assumes that `dest` exists and carries a header row when generation
/// succeeded.
pub trait DescriptionGenerator {
    fn generate(&self, segment_video: &Path, segment_gaps: &Path, dest: &Path) -> Result<()>;
}
