use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formfit::config::Config;
use formfit::exercise::ExerciseKind;
use formfit::pose::Keypoint;
use formfit::session::{FrameReport, WorkoutSession};

const CONFIG_PATH: &str = "formfit.toml";

/// One line of a recording
#[derive(Debug, Deserialize)]
struct RecordedFrame {
    timestamp_ms: u64,
    keypoints: Option<Vec<[f32; 3]>>,
}

impl RecordedFrame {
    fn keypoints(&self) -> Option<Vec<Keypoint>> {
        self.keypoints.as_ref().map(|points| {
            points
                .iter()
                .map(|&[x, y, c]| Keypoint::new(x, y, c))
                .collect()
        })
    }
}

fn print_report(timestamp_ms: u64, report: &FrameReport) {
    let headline = report
        .feedback
        .first()
        .map(|item| item.message.as_str())
        .unwrap_or("");
    println!(
        "[{:>7} ms] {:<7} score {:>3} ({:<10}) reps {:>3} | {}",
        timestamp_ms,
        report.phase.label(),
        report.score,
        report.grade.label(),
        report.rep_count,
        headline
    );
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!("usage: {} <exercise> <recording.jsonl> [config.toml]", args[0]);
    }
    let kind: ExerciseKind = args[1].parse()?;
    let recording = &args[2];
    let config = Config::load_or_default(args.get(3).map(String::as_str).unwrap_or(CONFIG_PATH));

    println!("FormFit Replay");
    println!("Exercise: {} ({})", kind.display_name(), kind.description());
    println!(
        "Confidence threshold: {}, debounce: {} ms",
        config.engine.confidence_threshold, config.engine.debounce_ms
    );
    for tip in kind.tips() {
        println!("  {}", tip);
    }
    println!();

    let file = File::open(recording).with_context(|| format!("failed to open {}", recording))?;
    let mut session = WorkoutSession::new(kind, config);
    let mut frames = 0usize;
    let mut score_sum = 0u64;
    let mut scored_frames = 0u64;

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", recording))?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: RecordedFrame = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed frame", recording, line_no + 1))?;
        let keypoints = frame.keypoints();
        let report = session
            .process_keypoints(
                keypoints.as_deref(),
                Duration::from_millis(frame.timestamp_ms),
            )
            .with_context(|| format!("{}:{}", recording, line_no + 1))?;

        print_report(frame.timestamp_ms, &report);
        frames += 1;
        if report.in_position {
            score_sum += u64::from(report.score);
            scored_frames += 1;
        }
    }

    println!();
    println!("Frames: {}", frames);
    println!("Reps: {}", session.rep_count());
    if scored_frames > 0 {
        println!("Average form score: {}", score_sum / scored_frames);
    }

    Ok(())
}
