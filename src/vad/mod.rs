//! Voice-activity span ingestion and persistence.

pub mod gaps;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::types::VoiceSpan;

/// Normalize a raw detector result (millisecond interval rows) into speech
/// spans at the pipeline's precision floor, keeping detector order.
pub fn spans_from_millis(raw: &[(i64, i64)]) -> Vec<VoiceSpan> {
    raw.iter()
        .map(|&(start_ms, end_ms)| VoiceSpan::from_millis(start_ms, end_ms))
        .collect()
}

/// Read a VAD CSV (`start_sec,end_sec` per row, ascending, no header).
///
/// Malformed rows are skipped with a warning; surviving rows keep their file
/// order.
pub fn read_span_file(path: &Path) -> Result<Vec<VoiceSpan>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read VAD file {:?}", path))?;
    let mut spans = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_span_row(line) {
            Some(span) => spans.push(span),
            None => warn!(
                "skipping malformed VAD row at {:?}:{}: {line}",
                path,
                line_no + 1
            ),
        }
    }
    Ok(spans)
}

fn parse_span_row(line: &str) -> Option<VoiceSpan> {
    let (start, end) = line.split_once(',')?;
    let start: f64 = start.trim().parse().ok()?;
    let end: f64 = end.trim().parse().ok()?;
    (start < end).then_some(VoiceSpan { start, end })
}

/// Write spans in the same headerless CSV shape the detector produced.
pub fn write_span_file(path: &Path, spans: &[VoiceSpan]) -> Result<()> {
    let mut out = String::new();
    for span in spans {
        out.push_str(&format!("{:.1},{:.1}\n", span.start, span.end));
    }
    fs::write(path, out).with_context(|| format!("failed to write VAD file {:?}", path))
}
