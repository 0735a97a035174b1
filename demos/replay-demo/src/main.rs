//! Handworld Replay Demo
//!
//! Replays a recorded landmark stream through a full session:
//! - Frames are JSON lines: `{"timestamp": 16.0, "hands": [{"landmarks": [...]}]}`
//! - A few objects are placed in the world before the first frame
//! - Recognized events are logged as they happen
//! - The final world snapshot and frame statistics are printed as JSON
//!
//! Usage: replay-demo <frames.jsonl> [session.json]

use std::io::{BufRead, BufReader};

use handworld_core::{HandworldError, RecognitionFrame};
use handworld_runtime::{
    init_tracing, FnDetector, FrameOutcome, ManualScheduler, MonotonicClock, Session,
    SessionConfig,
};
use handworld_world::{ObjectKind, ObjectRequest, Position, Size};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaySummary<'a> {
    frames_replayed: usize,
    stats: &'a handworld_runtime::FrameStats,
    average_latency_ms: Option<f64>,
    recent_events: Vec<&'a str>,
    world: handworld_world::WorldSnapshot,
}

fn load_frames(path: &str) -> Result<Vec<RecognitionFrame>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut frames = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: RecognitionFrame = serde_json::from_str(&line)
            .map_err(|e| format!("{}:{}: {}", path, line_no + 1, e))?;
        frames.push(frame);
    }
    Ok(frames)
}

fn seed_world(session: &mut Session) -> Result<(), HandworldError> {
    session.create_object(
        ObjectRequest::new(ObjectKind::Rect, Position::new(0.3, 0.5), Size::new(0.18, 0.18))
            .with_color("#38bdf8"),
    )?;
    session.create_object(ObjectRequest::new(
        ObjectKind::Sphere3d,
        Position::with_z(0.6, 0.4, 0.5),
        Size::with_depth(0.15, 0.15, 0.15),
    ))?;
    session.create_object(
        ObjectRequest::new(ObjectKind::Model3d, Position::new(0.75, 0.7), Size::new(0.2, 0.2))
            .with_model_url("/models/crate.glb"),
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(frames_path) = args.next() else {
        eprintln!("usage: replay-demo <frames.jsonl> [session.json]");
        std::process::exit(2);
    };

    let config = match args.next() {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    init_tracing(&config.logging)?;

    let frames = load_frames(&frames_path)?;
    info!(frames = frames.len(), path = %frames_path, "loaded landmark stream");

    let mut recorded = frames.iter().map(|f| f.hands.clone()).collect::<Vec<_>>().into_iter();
    let detector = FnDetector::new(move |_timestamp| Ok(recorded.next().unwrap_or_default()));

    let scheduler = ManualScheduler::new();
    let mut session = Session::new(
        config,
        Box::new(detector),
        Box::new(scheduler.clone()),
        Box::new(MonotonicClock::new()),
    );
    seed_world(&mut session)?;
    session.start()?;

    let mut replayed = 0;
    for frame in &frames {
        if !scheduler.take_pending() {
            break;
        }
        if let FrameOutcome::Recognized(report) = session.on_frame(frame.timestamp) {
            for event in &report.events {
                info!(timestamp = report.timestamp, "{}", event);
            }
        }
        replayed += 1;
    }
    session.teardown();

    let summary = ReplaySummary {
        frames_replayed: replayed,
        stats: session.stats(),
        average_latency_ms: session.latency().average_ms(),
        recent_events: session.event_log().collect(),
        world: session.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
