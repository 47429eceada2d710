use super::config::EvalConfig;
use super::entities::*;
use super::stroke_evaluator::evaluate;
use super::Stroke;

// Keeps a perfect trace from dividing out to exactly zero deviation
const DEVIATION_EPSILON: f32 = 1e-6;

const PROMPT_MESSAGE: &str = "Trace the letter to begin.";

/// Feedback band for a whole-letter score. Messages get more positive as
/// the score goes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    TryAgain,
    NotBad,
    VeryGood,
    Excellent,
}

impl ScoreBand {
    pub fn from_score(score: f32) -> ScoreBand {
        if score < 30.0 {
            ScoreBand::TryAgain
        } else if score < 60.0 {
            ScoreBand::NotBad
        } else if score < 85.0 {
            ScoreBand::VeryGood
        } else {
            ScoreBand::Excellent
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreBand::TryAgain => "Try again!",
            ScoreBand::NotBad => "Not bad, keep practicing.",
            ScoreBand::VeryGood => "Very good!",
            ScoreBand::Excellent => "Excellent!",
        }
    }
}

impl EvaluationSummary {
    // Initial state: nothing drawn yet, or nothing to trace
    pub fn prompt(stroke_count: usize, reference_count: usize) -> EvaluationSummary {
        EvaluationSummary {
            score: 0.0,
            coverage: 0.0,
            average_deviation: f32::INFINITY,
            stroke_count: stroke_count,
            reference_count: reference_count,
            scored_pairs: 0,
            message: PROMPT_MESSAGE.to_string(),
        }
    }
}

/// Aggregates per-pair evaluations into one score.
///
/// The `i`-th evaluation must be stroke `i` evaluated against reference `i`,
/// for the first `min(stroke_count, reference_count)` pairs. Any further
/// strokes or references are not scored and not penalized.
pub fn summarize<'a>(
    evaluations: impl IntoIterator<Item = &'a StrokeEvaluation>,
    stroke_count: usize,
    reference_count: usize,
    threshold: f32,
    config: &EvalConfig,
) -> EvaluationSummary {
    if stroke_count == 0 || reference_count == 0 {
        return EvaluationSummary::prompt(stroke_count, reference_count);
    }
    let mut pairs = 0;
    let mut coverage_sum = 0f32;
    let mut deviation_sum = 0f32;
    for eval in evaluations {
        pairs += 1;
        coverage_sum += eval.coverage;
        // An unscored pair makes the whole deviation infinite
        deviation_sum += eval.average_deviation;
    }
    if pairs == 0 {
        return EvaluationSummary::prompt(stroke_count, reference_count);
    }
    let coverage = coverage_sum / pairs as f32;
    let average_deviation = deviation_sum / pairs as f32;

    let normalized_deviation = f32::max(average_deviation / threshold, DEVIATION_EPSILON);
    let score = (coverage * 100.0 - normalized_deviation * config.penalty_weight).clamp(0.0, 100.0);

    EvaluationSummary {
        score: score,
        coverage: coverage,
        average_deviation: average_deviation,
        stroke_count: stroke_count,
        reference_count: reference_count,
        scored_pairs: pairs,
        message: ScoreBand::from_score(score).message().to_string(),
    }
}

/// Scores a whole attempt: stroke `i` against reference `i`, for as many
/// pairs as both lists have.
pub fn evaluate_drawing(
    strokes: &[Stroke],
    references: &[ReferenceStroke],
    threshold: f32,
    config: &EvalConfig,
) -> EvaluationSummary {
    let pairs = usize::min(strokes.len(), references.len());
    let mut evaluations: Vec<StrokeEvaluation> = Vec::with_capacity(pairs);
    for i in 0..pairs {
        evaluations.push(evaluate(&strokes[i].points, &references[i].points, threshold, config));
    }
    summarize(&evaluations, strokes.len(), references.len(), threshold, config)
}
