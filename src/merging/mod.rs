//! Script merging: fold per-segment description scripts back onto the
//! global timeline.
//!
//! Offsets use each segment's actual rendered duration, probed from the
//! segment file itself - transcoding can shift a segment's length slightly
//! from its nominal cut-point span, and those shifts would otherwise
//! accumulate into audible drift over a long video.

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use tracing::{info, warn};

use crate::media::DurationProbe;
use crate::types::round_tenth;
use crate::workspace::Workspace;

/// Merge every `segment_{N}_AD_script.csv` in the workspace into one global
/// script, in ascending segment order.
///
/// Zero discovered scripts is a fatal configuration error: an empty merged
/// file would silently corrupt everything downstream. So is a script whose
/// sibling video is missing, since the cumulative offsets assume every
/// segment is present and probed.
pub fn merge_scripts(workspace: &Workspace, probe: &dyn DurationProbe) -> Result<PathBuf> {
    let scripts = workspace.discover_scripts()?;
    ensure!(
        !scripts.is_empty(),
        "no segment description scripts found under {:?}; nothing to merge",
        workspace.root()
    );

    let mut header: Option<String> = None;
    let mut merged_rows: Vec<String> = Vec::new();
    let mut elapsed = 0.0_f64;

    for (index, script_path) in scripts {
        let video_path = workspace.video_path(index);
        ensure!(
            video_path.exists(),
            "segment {index} has a script but no video {:?}; merge offsets would drift",
            video_path
        );
        let duration = probe
            .duration_secs(&video_path)
            .with_context(|| format!("failed to probe duration of segment {index} video"))?;

        let content = fs::read_to_string(&script_path)
            .with_context(|| format!("failed to read script for segment {index}"))?;
        let mut lines = content.lines();
        if let Some(first) = lines.next() {
            if header.is_none() {
                header = Some(first.to_string());
            }
        }
        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match shift_row(line, elapsed) {
                Some(row) => merged_rows.push(row),
                None => warn!(
                    "skipping malformed script row at {:?}:{}: {line}",
                    script_path,
                    line_no + 2
                ),
            }
        }
        elapsed += duration;
    }

    let header = header.context("segment scripts contained no header row")?;
    let output_path = workspace.merged_script_path();
    let mut out = String::with_capacity(header.len() + merged_rows.len() * 32);
    out.push_str(&header);
    out.push('\n');
    for row in &merged_rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(&output_path, out)
        .with_context(|| format!("failed to write merged script {:?}", output_path))?;
    info!(
        "merged {} description row(s) spanning {:.1}s into {:?}",
        merged_rows.len(),
        elapsed,
        output_path
    );
    Ok(output_path)
}

/// Shift a data row's start_time by `offset`, leaving every other column
/// (duration, description text, any later-appended tags) untouched.
fn shift_row(line: &str, offset: f64) -> Option<String> {
    let (start, rest) = line.split_once(',')?;
    let start: f64 = start.trim().parse().ok()?;
    Some(format!("{:.1},{}", round_tenth(start + offset), rest))
}
