use anyhow::{ensure, Result};

/// Tuning knobs for the segmentation pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Silence shorter than this never becomes a describable gap, and a
    /// leading gap is only emitted when the first speech span starts later
    /// than this.
    pub min_gap_secs: f64,
    /// Coarse segment length target; each cut lands on the first span end at
    /// or past the next multiple of this step.
    pub threshold_step_secs: f64,
    /// Recompute each gap's duration from its recorded start instead of
    /// reporting the latest span-pair silence width.
    pub strict_gap_durations: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_gap_secs: 2.0,
            threshold_step_secs: 600.0,
            strict_gap_durations: false,
        }
    }
}

impl PipelineConfig {
    pub fn new(min_gap_secs: f64, threshold_step_secs: f64) -> Result<Self> {
        ensure!(
            min_gap_secs >= 0.0,
            "minimum gap must be non-negative, got {}",
            min_gap_secs
        );
        ensure!(
            threshold_step_secs > 0.0,
            "threshold step must be positive, got {}",
            threshold_step_secs
        );
        Ok(Self {
            min_gap_secs,
            threshold_step_secs,
            strict_gap_durations: false,
        })
    }

    pub fn with_strict_gap_durations(mut self, strict: bool) -> Self {
        self.strict_gap_durations = strict;
        self
    }
}
