use log::{debug, trace, warn};
use serde_derive::Serialize;
use std::rc::Rc;

use super::config::EvalConfig;
use super::drawing_evaluator::summarize;
use super::entities::*;
use super::geometry::{bounding_box, distance, smooth, BoundingBox};
use super::input::{normalize, DeviceEvent, PointerId, PointerPhase, PointerSample};
use super::stroke_evaluator::evaluate;
use super::{Point, Stroke};

/// Receives the latest summary after every change to the drawn strokes.
pub trait SummaryListener {
    fn summary_changed(&mut self, summary: &EvaluationSummary);
}

impl<F> SummaryListener for F
where
    F: FnMut(&EvaluationSummary),
{
    fn summary_changed(&mut self, summary: &EvaluationSummary) {
        self(summary)
    }
}

/// Where the canvas is displayed, in device (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Viewport {
        Viewport {
            left: left,
            top: top,
            width: width,
            height: height,
        }
    }

    // Maps a device position into canvas pixels. A collapsed viewport only
    // translates, it never divides by zero.
    pub fn to_canvas(&self, x: f32, y: f32, canvas: &CanvasSize) -> (f32, f32) {
        let local_x = x - self.left;
        let local_y = y - self.top;
        if self.width <= 0f32 || self.height <= 0f32 {
            return (local_x, local_y);
        }
        (local_x * canvas.width / self.width, local_y * canvas.height / self.height)
    }
}

// Everything needed to draw one stroke
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RenderStroke {
    // Smoothed ink
    pub points: Vec<Point>,
    // Hit/miss colouring; empty if the stroke has no reference to be scored against
    pub segments: Vec<Segment>,
    // Extent of the ink, for partial redraws; None for an empty stroke
    pub bounds: Option<BoundingBox>,
    pub active: bool,
}

// Snapshot of everything the display draws, in template canvas pixels
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub template_id: Option<String>,
    pub image: Option<String>,
    pub canvas: CanvasSize,
    pub references: Vec<Vec<Point>>,
    pub strokes: Vec<RenderStroke>,
    pub summary: EvaluationSummary,
}

struct ActiveStroke {
    pointer_id: PointerId,
    stroke: Stroke,
}

/// Accumulates pointer samples into strokes for one letter template and
/// keeps the evaluation current.
///
/// One stroke is drawn at a time: the pointer that starts a stroke owns it
/// until it lifts or is cancelled, and other pointers are ignored meanwhile.
pub struct TracingSession {
    config: EvalConfig,
    template: Option<Rc<LetterTemplate>>,
    viewport: Option<Viewport>,
    committed: Vec<Stroke>,
    // committed_evals[i] is committed[i] against reference i; only as many as there are references
    committed_evals: Vec<StrokeEvaluation>,
    active: Option<ActiveStroke>,
    active_eval: Option<StrokeEvaluation>,
    summary: EvaluationSummary,
    listeners: Vec<Box<dyn SummaryListener>>,
    // Set on every change, cleared when a frame is taken
    dirty: bool,
}

impl TracingSession {
    pub fn new(config: EvalConfig) -> TracingSession {
        TracingSession {
            config: config,
            template: None,
            viewport: None,
            committed: Vec::new(),
            committed_evals: Vec::new(),
            active: None,
            active_eval: None,
            summary: EvaluationSummary::prompt(0, 0),
            listeners: Vec::new(),
            dirty: true,
        }
    }

    pub fn with_template(config: EvalConfig, template: Rc<LetterTemplate>) -> TracingSession {
        let mut session = TracingSession::new(config);
        session.set_template(template);
        session
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn template(&self) -> Option<&LetterTemplate> {
        self.template.as_deref()
    }

    pub fn summary(&self) -> &EvaluationSummary {
        &self.summary
    }

    pub fn committed_strokes(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref().map(|active| &active.stroke)
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn subscribe(&mut self, listener: impl SummaryListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Switches to another letter. Strokes drawn for the previous one are
    /// discarded.
    pub fn set_template(&mut self, template: Rc<LetterTemplate>) {
        debug!(
            "template {} loaded with {} reference strokes",
            template.id,
            template.reference_strokes.len()
        );
        self.template = Some(template);
        self.reset();
    }

    pub fn clear_template(&mut self) {
        debug!("template cleared");
        self.template = None;
        self.reset();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Replaces the tunables and rescores what is on the canvas.
    pub fn set_config(&mut self, config: EvalConfig) {
        self.config = config;
        self.committed_evals.clear();
        for i in 0..self.committed.len() {
            self.cache_evaluation(i);
        }
        self.refresh();
    }

    pub fn threshold(&self) -> f32 {
        match &self.template {
            Some(template) => template.canvas.hit_threshold(self.config.threshold_ratio),
            None => 0f32,
        }
    }

    fn reference_count(&self) -> usize {
        self.template.as_ref().map_or(0, |t| t.reference_strokes.len())
    }

    // Scores committed stroke `index` if it has a reference
    fn cache_evaluation(&mut self, index: usize) {
        let template = match &self.template {
            Some(template) => template,
            None => return,
        };
        if index >= template.reference_strokes.len() {
            return;
        }
        let threshold = template.canvas.hit_threshold(self.config.threshold_ratio);
        let eval = evaluate(
            &self.committed[index].points,
            &template.reference_strokes[index].points,
            threshold,
            &self.config,
        );
        self.committed_evals.push(eval);
    }

    // Re-scores the active stroke, rebuilds the summary and tells everyone
    fn refresh(&mut self) {
        let threshold = self.threshold();
        let reference_count = self.reference_count();
        let next_index = self.committed.len();

        // A stroke that has only touched down says nothing yet; counting it
        // would drop the live score to zero until the pointer moves
        let scoreable = self.active.as_ref().filter(|active| active.stroke.points.len() >= 2);
        self.active_eval = match (scoreable, &self.template) {
            (Some(active), Some(template)) if next_index < reference_count => Some(evaluate(
                &active.stroke.points,
                &template.reference_strokes[next_index].points,
                threshold,
                &self.config,
            )),
            _ => None,
        };

        let stroke_count = self.committed.len() + if scoreable.is_some() { 1 } else { 0 };
        self.summary = summarize(
            self.committed_evals.iter().chain(self.active_eval.iter()),
            stroke_count,
            reference_count,
            threshold,
            &self.config,
        );
        self.dirty = true;
        for listener in self.listeners.iter_mut() {
            listener.summary_changed(&self.summary);
        }
    }

    fn to_canvas(&self, sample: &PointerSample, canvas: &CanvasSize) -> Point {
        let (x, y) = match &self.viewport {
            Some(viewport) => viewport.to_canvas(sample.x, sample.y, canvas),
            None => (sample.x, sample.y),
        };
        Point {
            x: x,
            y: y,
            pressure: sample.pressure,
        }
    }

    /// Feeds one device event. Returns true if the drawing changed.
    pub fn handle_event(&mut self, event: &DeviceEvent) -> bool {
        let mut changed = false;
        for sample in normalize(event) {
            changed |= self.handle_sample(sample);
        }
        changed
    }

    /// Feeds one normalized pointer sample. Returns true if the drawing
    /// changed.
    pub fn handle_sample(&mut self, sample: PointerSample) -> bool {
        let point = match &self.template {
            Some(template) => self.to_canvas(&sample, &template.canvas),
            None => {
                trace!("no template loaded, ignoring pointer {:?}", sample.pointer_id);
                return false;
            }
        };
        match sample.phase {
            PointerPhase::Down => self.begin_stroke(sample.pointer_id, point),
            PointerPhase::Move => self.extend_stroke(sample.pointer_id, point),
            PointerPhase::Up | PointerPhase::Cancel => self.end_stroke(sample.pointer_id, point),
        }
    }

    fn begin_stroke(&mut self, pointer_id: PointerId, point: Point) -> bool {
        if let Some(active) = &self.active {
            if active.pointer_id == pointer_id {
                warn!("pointer {:?} went down twice without lifting", pointer_id);
            } else {
                trace!("pointer {:?} ignored while pointer {:?} draws", pointer_id, active.pointer_id);
            }
            return false;
        }
        self.active = Some(ActiveStroke {
            pointer_id: pointer_id,
            stroke: Stroke::from_points(vec![point]),
        });
        self.refresh();
        true
    }

    // Appends unless the point is a near-duplicate of the previous one
    fn push_point(&mut self, pointer_id: PointerId, point: Point) -> bool {
        let min_distance = self.config.min_point_distance;
        let active = match &mut self.active {
            Some(active) if active.pointer_id == pointer_id => active,
            Some(active) => {
                trace!("pointer {:?} ignored while pointer {:?} draws", pointer_id, active.pointer_id);
                return false;
            }
            None => return false,
        };
        if let Some(last) = active.stroke.points.last() {
            if distance(last, &point) < min_distance {
                return false;
            }
        }
        active.stroke.points.push(point);
        true
    }

    fn extend_stroke(&mut self, pointer_id: PointerId, point: Point) -> bool {
        if self.push_point(pointer_id, point) {
            self.refresh();
            return true;
        }
        false
    }

    // Up and cancel both commit; nothing a user drew is thrown away
    fn end_stroke(&mut self, pointer_id: PointerId, point: Point) -> bool {
        match &self.active {
            Some(active) if active.pointer_id == pointer_id => {}
            _ => return false,
        }
        self.push_point(pointer_id, point);
        let active = match self.active.take() {
            Some(active) => active,
            None => return false,
        };
        debug!(
            "stroke {} committed with {} points",
            self.committed.len(),
            active.stroke.points.len()
        );
        self.committed.push(active.stroke);
        self.cache_evaluation(self.committed.len() - 1);
        self.refresh();
        true
    }

    /// Removes the most recently committed stroke. A stroke still being drawn
    /// is left alone. Does nothing if no stroke has been committed.
    pub fn undo(&mut self) -> bool {
        if self.committed.pop().is_none() {
            return false;
        }
        if self.committed_evals.len() > self.committed.len() {
            self.committed_evals.pop();
        }
        debug!("undo, {} strokes left", self.committed.len());
        self.refresh();
        true
    }

    /// Drops every stroke, committed or in progress.
    pub fn reset(&mut self) {
        self.committed.clear();
        self.committed_evals.clear();
        self.active = None;
        self.active_eval = None;
        debug!("session reset");
        self.refresh();
    }

    fn render_stroke(&self, stroke: &Stroke, eval: Option<&StrokeEvaluation>, active: bool) -> RenderStroke {
        let points = smooth(&stroke.points, self.config.smoothing_segments, self.config.smoothing_tension);
        RenderStroke {
            bounds: bounding_box(&points),
            points: points,
            segments: eval.map(|e| e.segments.clone()).unwrap_or_default(),
            active: active,
        }
    }

    /// Builds the current renderable state.
    pub fn frame(&self) -> RenderFrame {
        let mut strokes: Vec<RenderStroke> = Vec::with_capacity(self.committed.len() + 1);
        for i in 0..self.committed.len() {
            strokes.push(self.render_stroke(&self.committed[i], self.committed_evals.get(i), false));
        }
        if let Some(active) = &self.active {
            strokes.push(self.render_stroke(&active.stroke, self.active_eval.as_ref(), true));
        }
        let template = self.template.as_deref();
        RenderFrame {
            template_id: template.map(|t| t.id.clone()),
            image: template.map(|t| t.image.clone()),
            canvas: template.map(|t| t.canvas).unwrap_or_default(),
            references: template.map_or(Vec::new(), |t| {
                t.reference_strokes.iter().map(|r| r.points.clone()).collect()
            }),
            strokes: strokes,
            summary: self.summary.clone(),
        }
    }

    /// Meant to be called once per display refresh: returns a frame only if
    /// something changed since the previous call.
    pub fn take_frame(&mut self) -> Option<RenderFrame> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.frame())
    }
}
