//! ffmpeg/ffprobe-backed collaborators.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::{DurationProbe, SegmentTranscoder};

/// ffprobe `-show_entries format=duration -of json` payload.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: String,
}

/// Duration probe backed by the `ffprobe` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfprobeDuration;

impl DurationProbe for FfprobeDuration {
    fn duration_secs(&self, path: &Path) -> Result<f64> {
        let output = Command::new("ffprobe")
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(path)
            .output()
            .context("failed to execute ffprobe; is ffmpeg installed and on PATH?")?;
        if !output.status.success() {
            bail!(
                "ffprobe failed for {:?}: {}",
                path,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let probe: ProbeOutput = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("unexpected ffprobe output for {:?}", path))?;
        probe
            .format
            .duration
            .trim()
            .parse::<f64>()
            .with_context(|| format!("ffprobe reported a non-numeric duration for {:?}", path))
    }
}

/// Segment transcoder producing the low-rate proxy encode the description
/// model consumes: 360p, 1 fps, mono opus audio at a token bitrate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegTranscoder;

impl SegmentTranscoder for FfmpegTranscoder {
    fn transcode(&self, source: &Path, start: f64, end: f64, dest: &Path) -> Result<()> {
        let output = Command::new("ffmpeg")
            .args(["-y", "-i"])
            .arg(source)
            .args(["-ss", &start.to_string(), "-to", &end.to_string()])
            .args(["-vf", "scale=-2:360", "-r", "1"])
            .args(["-c:v", "libx264", "-crf", "28"])
            .args(["-c:a", "libopus", "-ac", "1", "-b:a", "1k"])
            .arg(dest)
            .output()
            .context("failed to execute ffmpeg; is it installed and on PATH?")?;
        if !output.status.success() {
            bail!(
                "ffmpeg failed cutting {:?} [{:.2}s - {:.2}s]: {}",
                source,
                start,
                end,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_probe_payload() {
        let raw = r#"{"format": {"duration": "1300.056000"}}"#;
        let probe: ProbeOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(probe.format.duration, "1300.056000");
        assert!((probe.format.duration.parse::<f64>().unwrap() - 1300.056).abs() < 1e-9);
    }

    #[test]
    fn rejects_payload_without_duration() {
        let raw = r#"{"format": {}}"#;
        assert!(serde_json::from_str::<ProbeOutput>(raw).is_err());
    }
}
