use serde_derive::{Deserialize, Serialize};

use super::Point;

// Pixel size of the canvas the template was authored for
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> CanvasSize {
        CanvasSize {
            width: width,
            height: height,
        }
    }

    // Hit radius scales with the canvas, never a fixed pixel constant
    pub fn hit_threshold(&self, ratio: f32) -> f32 {
        ratio * f32::min(self.width, self.height)
    }
}

// One pen stroke of a letter, as the template author drew it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ReferenceStroke {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub points: Vec<Point>,
    // Carried for the display side; scoring weighs every stroke equally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl ReferenceStroke {
    pub fn from_points(points: Vec<Point>) -> ReferenceStroke {
        ReferenceStroke {
            id: None,
            points: points,
            weight: None,
        }
    }
}

// A letterform to trace. Loaded, parsed and validated elsewhere; read-only here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LetterTemplate {
    pub id: String,
    #[serde(default)]
    pub label: String,
    // URL or handle of the backdrop image, passed through to the renderer
    #[serde(default)]
    pub image: String,
    // Index-aligned to the expected drawing order
    #[serde(alias = "strokes", alias = "referenceStrokes")]
    pub reference_strokes: Vec<ReferenceStroke>,
    pub canvas: CanvasSize,
}

// One connecting segment of a resampled freehand stroke
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    // True if the segment lies within the hit threshold of the reference
    pub hit: bool,
}

// Result of comparing one freehand stroke to one reference stroke
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StrokeEvaluation {
    // Fraction of resampled reference points with a stroke point within threshold
    pub coverage: f32,
    // Mean nearest distance from stroke samples to the reference; +inf if unscoreable
    pub average_deviation: f32,
    pub segments: Vec<Segment>,
}

impl StrokeEvaluation {
    pub fn unscored() -> StrokeEvaluation {
        StrokeEvaluation {
            coverage: 0.0,
            average_deviation: f32::INFINITY,
            segments: Vec::new(),
        }
    }

    pub fn is_scored(&self) -> bool {
        self.average_deviation.is_finite()
    }
}

// Whole-letter result, handed to the feedback display
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    // 0..=100
    pub score: f32,
    // 0..=1, averaged over the scored pairs
    pub coverage: f32,
    pub average_deviation: f32,
    // Drawn strokes considered, including one still in progress
    pub stroke_count: usize,
    pub reference_count: usize,
    // min(stroke_count, reference_count)
    pub scored_pairs: usize,
    pub message: String,
}
