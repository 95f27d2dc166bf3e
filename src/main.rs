use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use adscribe::config::PipelineConfig;
use adscribe::media::ffmpeg::{FfmpegTranscoder, FfprobeDuration};
use adscribe::merging;
use adscribe::segmenting::{self, rebase};
use adscribe::vad::{self, gaps};
use adscribe::workspace::Workspace;

/// adscribe - audio-description segment registry pipeline
///
/// Splits long video at speech-aligned thresholds, keeps a gap-level time
/// registry across the cuts, and folds per-segment description scripts back
/// into one global timeline.
#[derive(Parser, Debug)]
#[command(name = "adscribe")]
#[command(version = "0.1.0")]
#[command(about = "Audio-description segment registry pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive silence gaps, plan cut points, render per-segment videos and
    /// gap files
    Segment(SegmentArgs),
    /// Re-base filled-in per-segment description scripts onto the global
    /// timeline
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct SegmentArgs {
    /// Voice-activity CSV (start_sec,end_sec per row, ascending, no header)
    #[arg(value_name = "VAD_FILE")]
    vad_file: PathBuf,

    /// Source video file
    #[arg(value_name = "VIDEO")]
    video: PathBuf,

    /// Directory where per-segment artifacts will be written
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Coarse segment length threshold in seconds
    #[arg(long, default_value_t = 600.0)]
    step: f64,

    /// Minimum silence in seconds for a describable gap
    #[arg(long, default_value_t = 2.0)]
    min_gap: f64,

    /// Measure each gap's duration from its recorded start instead of the
    /// latest span pair
    #[arg(long)]
    strict_gap_durations: bool,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Workspace directory containing segment_N videos and their filled-in
    /// *_AD_script.csv files
    #[arg(value_name = "SEGMENT_DIR")]
    segment_dir: PathBuf,
}

impl SegmentArgs {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        if !self.vad_file.is_file() {
            bail!("VAD file does not exist: {:?}", self.vad_file);
        }
        if !self.video.is_file() {
            bail!("video file does not exist: {:?}", self.video);
        }
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            bail!("output path must be a directory: {:?}", self.output_dir);
        }
        Ok(())
    }

    fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig::new(self.min_gap, self.step)?
            .with_strict_gap_durations(self.strict_gap_durations))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Segment(args) => run_segment(&args),
        Command::Merge(args) => run_merge(&args),
    }
}

fn run_segment(args: &SegmentArgs) -> Result<()> {
    args.validate()
        .context("Failed to validate command-line arguments")?;
    let config = args
        .pipeline_config()
        .context("Invalid pipeline configuration")?;

    println!("adscribe v0.1.0 - segmenting {:?}", args.video);

    println!("\n1. Reading voice activity spans...");
    let spans = vad::read_span_file(&args.vad_file).context("Failed to read VAD file")?;
    println!("   Loaded {} speech spans", spans.len());

    println!("\n2. Deriving silence gaps...");
    let gap_list = gaps::derive_gaps(&spans, &config);
    if gap_list.is_empty() {
        println!("   No describable gaps (continuous speech is a valid outcome)");
    } else {
        println!("   Found {} gaps", gap_list.len());
    }
    let workspace =
        Workspace::create(&args.output_dir).context("Failed to create output directory")?;
    gaps::write_gap_file(&workspace.global_gap_path(), &gap_list)
        .context("Failed to write the global gap file")?;

    println!("\n3. Planning segments and rendering proxy videos...");
    let plan = segmenting::plan_segments(
        &spans,
        &args.video,
        &workspace,
        &config,
        &FfprobeDuration,
        &FfmpegTranscoder,
    )
    .context("Failed to plan segments")?;
    println!(
        "   {} segment(s), cut points written to {:?}",
        plan.window_count(),
        workspace.cut_points_path()
    );
    let failed = plan.failed_segments();
    if !failed.is_empty() {
        eprintln!(
            "   Warning: transcode failed for segment(s) {:?}; cut points kept",
            failed
        );
    }

    println!("\n4. Rebasing gaps into segment clocks...");
    let per_segment = rebase::rebase_gaps(&gap_list, &plan.cut_points);
    rebase::write_segment_gap_files(&workspace, &per_segment)
        .context("Failed to write per-segment gap files")?;
    println!(
        "   Wrote {} per-segment gap file(s) under {:?}",
        per_segment.len(),
        workspace.root()
    );

    println!("\n✓ Segmentation complete.");
    println!("  Fill in segment_N_AD_script.csv files, then run: adscribe merge {:?}", workspace.root());
    Ok(())
}

fn run_merge(args: &MergeArgs) -> Result<()> {
    let workspace =
        Workspace::open(&args.segment_dir).context("Failed to open segment directory")?;

    println!(
        "adscribe v0.1.0 - merging description scripts under {:?}",
        workspace.root()
    );
    let merged = merging::merge_scripts(&workspace, &FfprobeDuration)
        .context("Failed to merge description scripts")?;
    println!("\n✓ Merged script written to {:?}", merged);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_missing_inputs() {
        let args = SegmentArgs {
            vad_file: PathBuf::from("no-such-vad.csv"),
            video: PathBuf::from("no-such-video.mp4"),
            output_dir: PathBuf::from("out"),
            step: 600.0,
            min_gap: 2.0,
            strict_gap_durations: false,
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn pipeline_config_rejects_bad_step() {
        let args = SegmentArgs {
            vad_file: PathBuf::from("vad.csv"),
            video: PathBuf::from("video.mp4"),
            output_dir: PathBuf::from("out"),
            step: 0.0,
            min_gap: 2.0,
            strict_gap_durations: false,
        };
        assert!(args.pipeline_config().is_err());
    }
}
