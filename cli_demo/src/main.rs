extern crate letter_trace;
extern crate serde_derive;

use clap::Parser;
use letter_trace::{
    evaluate_drawing, EvalConfig, EvaluationSummary, LetterTemplate, Point, PointerId, PointerPhase, PointerSample, Stroke,
    TracingSession,
};
use serde_derive::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::rc::Rc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "cli_demo")]
#[command(about = "Replays recorded tracing attempts against a letter template")]
struct Args {
    /// Letter template, as JSON
    #[arg(short, long, default_value = "debug/template.json")]
    template: String,

    /// Recorded attempts, one JSON object per line
    #[arg(short, long, default_value = "debug/attempts.jsonl")]
    attempts: String,

    /// Evaluation cycles to time
    #[arg(short, long, default_value_t = 1000)]
    iters: usize,

    /// Hit radius as a fraction of the shorter canvas side
    #[arg(long)]
    threshold_ratio: Option<f32>,
}

// One recorded attempt: the strokes exactly as the pointer produced them
#[derive(Deserialize)]
struct Attempt {
    name: String,
    strokes: Vec<Vec<Point>>,
}

fn read_template(fname: &str) -> Result<LetterTemplate, Box<dyn Error>> {
    let file = File::open(fname).map_err(|err| format!("cannot open {}: {}", fname, err))?;
    let template: LetterTemplate = serde_json::from_reader(BufReader::new(file))?;
    Ok(template)
}

fn read_attempts(fname: &str) -> Result<Vec<Attempt>, Box<dyn Error>> {
    let file = File::open(fname).map_err(|err| format!("cannot open {}: {}", fname, err))?;
    let mut res: Vec<Attempt> = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        res.push(serde_json::from_str(&line)?);
    }
    Ok(res)
}

// Feeds the attempt through a session as pointer events, the way a page would
fn replay(session: &mut TracingSession, attempt: &Attempt) -> EvaluationSummary {
    session.reset();
    for stroke in &attempt.strokes {
        let count = stroke.len();
        for (i, pt) in stroke.iter().enumerate() {
            let phase = if i == 0 {
                PointerPhase::Down
            } else if i == count - 1 {
                PointerPhase::Up
            } else {
                PointerPhase::Move
            };
            session.handle_sample(PointerSample {
                pointer_id: PointerId::Pointer(1),
                phase: phase,
                x: pt.x,
                y: pt.y,
                pressure: pt.pressure,
            });
        }
        // A single-sample stroke still has to be lifted
        if count == 1 {
            session.handle_sample(PointerSample {
                pointer_id: PointerId::Pointer(1),
                phase: PointerPhase::Up,
                x: stroke[0].x,
                y: stroke[0].y,
                pressure: None,
            });
        }
    }
    session.summary().clone()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = EvalConfig::default();
    if let Some(ratio) = args.threshold_ratio {
        config.threshold_ratio = ratio;
    }

    let template = Rc::new(read_template(&args.template)?);
    let attempts = read_attempts(&args.attempts)?;
    log::info!(
        "Loaded template {} ({} strokes) and {} attempts.",
        template.label,
        template.reference_strokes.len(),
        attempts.len()
    );

    let mut session = TracingSession::with_template(config, template.clone());
    for attempt in &attempts {
        let summary = replay(&mut session, attempt);
        println!(
            "{:<16} score {:>5.1}  coverage {:>5.1}%  deviation {:>6.2}  strokes {}/{}  {}",
            attempt.name,
            summary.score,
            summary.coverage * 100.0,
            summary.average_deviation,
            summary.stroke_count,
            summary.reference_count,
            summary.message
        );
    }

    let drawn: Vec<Vec<Stroke>> = attempts
        .iter()
        .map(|a| a.strokes.iter().map(|s| Stroke::from_points(s.clone())).collect())
        .collect();
    let threshold = session.threshold();
    println!("Starting {} cycles of evaluation.", args.iters);
    let start = Instant::now();
    let mut total_score = 0f64;
    for _ in 0..args.iters {
        for strokes in &drawn {
            let summary = evaluate_drawing(strokes, &template.reference_strokes, threshold, &config);
            total_score += summary.score as f64;
        }
    }
    let duration = start.elapsed();
    let evaluations = args.iters * drawn.len();
    println!(
        "Finished in {:?} ({:?} per attempt). Mean score: {:.1}.",
        duration,
        duration / evaluations.max(1) as u32,
        total_score / evaluations.max(1) as f64
    );
    Ok(())
}
