//! adscribe - segment registry pipeline for audio-description production.
//!
//! Long video is split at speech-aligned thresholds while a gap-level time
//! registry is preserved across the cuts, so that per-segment description
//! scripts can later be folded back into one trustworthy global timeline.

pub mod config;
pub mod media;
pub mod merging;
pub mod segmenting;
pub mod types;
pub mod vad;
pub mod workspace;
