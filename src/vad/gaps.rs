//! Gap derivation: consecutive speech spans to describable silences.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::types::{round_tenth, Gap, VoiceSpan};

/// Derive silence gaps from ordered speech spans.
///
/// A leading gap covers `[0, first.start)` when the first span starts later
/// than the minimum. Afterwards each adjacent pair whose silence exceeds the
/// minimum yields one gap anchored at the running candidate start (the
/// previous span's end, advanced on every pair regardless of emission). An
/// empty span list is a valid outcome (continuous speech), not an error.
pub fn derive_gaps(spans: &[VoiceSpan], config: &PipelineConfig) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let Some(first) = spans.first() else {
        info!("no speech spans detected; no gap work for this video");
        return gaps;
    };
    if first.start > config.min_gap_secs {
        gaps.push(Gap {
            start: 0.0,
            duration: round_tenth(first.start),
        });
    }
    let mut candidate_start = first.end;
    for pair in spans.windows(2) {
        let (prev, current) = (pair[0], pair[1]);
        let silence = current.start - prev.end;
        if silence > config.min_gap_secs {
            // Compat mode reports the latest span-pair silence width; strict
            // mode measures from the recorded anchor instead. The two only
            // differ if the anchor ever lags the previous span's end.
            let duration = if config.strict_gap_durations {
                current.start - candidate_start
            } else {
                silence
            };
            gaps.push(Gap {
                start: candidate_start,
                duration: round_tenth(duration),
            });
        }
        candidate_start = current.end;
    }
    gaps
}

/// Read a gap CSV (`start_sec,duration_sec` per row, ascending, no header).
pub fn read_gap_file(path: &Path) -> Result<Vec<Gap>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read gap file {:?}", path))?;
    let mut gaps = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_gap_row(line) {
            Some(gap) => gaps.push(gap),
            None => warn!(
                "skipping malformed gap row at {:?}:{}: {line}",
                path,
                line_no + 1
            ),
        }
    }
    Ok(gaps)
}

fn parse_gap_row(line: &str) -> Option<Gap> {
    let (start, duration) = line.split_once(',')?;
    let start: f64 = start.trim().parse().ok()?;
    let duration: f64 = duration.trim().parse().ok()?;
    (duration > 0.0).then_some(Gap { start, duration })
}

/// Write gaps as headerless CSV rows at the pipeline's precision floor.
pub fn write_gap_file(path: &Path, gaps: &[Gap]) -> Result<()> {
    let mut out = String::new();
    for gap in gaps {
        out.push_str(&format!("{:.1},{:.1}\n", gap.start, gap.duration));
    }
    fs::write(path, out).with_context(|| format!("failed to write gap file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: f64, end: f64) -> VoiceSpan {
        VoiceSpan { start, end }
    }

    #[test]
    fn continuous_speech_yields_no_gaps() {
        let config = PipelineConfig::default();
        assert!(derive_gaps(&[], &config).is_empty());
        assert!(derive_gaps(&[span(0.0, 5.0), span(5.0, 9.0)], &config).is_empty());
    }

    #[test]
    fn leading_silence_becomes_a_gap() {
        let config = PipelineConfig::default();
        let gaps = derive_gaps(&[span(5.0, 10.0)], &config);
        assert_eq!(
            gaps,
            vec![Gap {
                start: 0.0,
                duration: 5.0
            }]
        );
    }

    #[test]
    fn leading_silence_at_threshold_is_excluded() {
        let config = PipelineConfig::default();
        assert!(derive_gaps(&[span(2.0, 10.0)], &config).is_empty());
    }

    #[test]
    fn silence_at_threshold_is_excluded() {
        // The minimum is a strict bound: exactly 2.0 s of silence is speech
        // transition, not a describable gap.
        let config = PipelineConfig::default();
        let gaps = derive_gaps(&[span(0.0, 1.0), span(3.0, 4.0)], &config);
        assert!(gaps.is_empty());
    }

    #[test]
    fn mid_video_silences_become_gaps() {
        // Spans (0,5) (5,200) (210,400): one 10 s silence between the last
        // pair, nothing at the head, no trailing gap after the final span.
        let config = PipelineConfig::default();
        let gaps = derive_gaps(
            &[span(0.0, 5.0), span(5.0, 200.0), span(210.0, 400.0)],
            &config,
        );
        assert_eq!(
            gaps,
            vec![Gap {
                start: 200.0,
                duration: 10.0
            }]
        );
    }

    #[test]
    fn gaps_never_overlap() {
        let config = PipelineConfig::default();
        let spans = vec![
            span(4.0, 10.0),
            span(15.5, 20.0),
            span(30.0, 31.0),
            span(40.0, 45.0),
        ];
        let gaps = derive_gaps(&spans, &config);
        assert_eq!(gaps.len(), 4);
        for pair in gaps.windows(2) {
            assert!(pair[0].end() <= pair[1].start);
        }
    }

    #[test]
    fn strict_mode_matches_compat_when_anchor_tracks_span_ends() {
        let spans = vec![span(0.0, 5.0), span(10.0, 20.0), span(30.0, 35.0)];
        let compat = derive_gaps(&spans, &PipelineConfig::default());
        let strict = derive_gaps(
            &spans,
            &PipelineConfig::default().with_strict_gap_durations(true),
        );
        assert_eq!(compat, strict);
    }

    #[test]
    fn gap_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.csv");
        let gaps = vec![
            Gap {
                start: 10.0,
                duration: 2.0,
            },
            Gap {
                start: 620.0,
                duration: 3.0,
            },
        ];
        write_gap_file(&path, &gaps).unwrap();
        assert_eq!(read_gap_file(&path).unwrap(), gaps);
    }
}
