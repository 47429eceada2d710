extern crate serde_derive;
extern crate wasm_bindgen;

mod catmull_rom;
mod config;
mod drawing_evaluator;
mod entities;
mod geometry;
mod input;
mod session;
mod stroke_evaluator;

use serde_derive::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use wasm_bindgen::prelude::*;

pub use catmull_rom::CatmullRomSegment;
pub use config::EvalConfig;
pub use drawing_evaluator::{evaluate_drawing, summarize, ScoreBand};
pub use entities::*;
pub use geometry::{bounding_box, distance, resample, smooth, BoundingBox};
pub use input::{
    normalize, DeviceEvent, MouseAction, MouseEventData, PointerEventData, PointerId, PointerPhase, PointerSample,
    TouchAction, TouchEventData, TouchPoint,
};
pub use session::{RenderFrame, RenderStroke, SummaryListener, TracingSession, Viewport};
pub use stroke_evaluator::evaluate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    // Optional telemetry; carried along but never scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point {
            x: x,
            y: y,
            pressure: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn from_points(points: Vec<Point>) -> Stroke {
        Stroke { points: points }
    }
}

// Everything below is the browser-facing surface. The host page owns the
// animation-frame loop and the template loader; it feeds us normalized
// device events and pulls frames.

thread_local!(static SESSION: RefCell<TracingSession> = RefCell::new(TracingSession::new(EvalConfig::default())));

static INIT: Once = Once::new();

fn maybe_init() {
    INIT.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        {
            console_error_panic_hook::set_once();
            wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
        }
        log::debug!("letter_trace initialized");
    });
}

#[allow(deprecated)]
fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue, what: &str) -> Result<T, JsValue> {
    value
        .into_serde()
        .map_err(|err| JsValue::from_str(&format!("invalid {}: {}", what, err)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn with_session<R>(f: impl FnOnce(&mut TracingSession) -> R) -> R {
    maybe_init();
    SESSION.with(|session| f(&mut session.borrow_mut()))
}

fn current_summary() -> Result<String, JsValue> {
    with_session(|session| to_json(session.summary()))
}

/// Loads a new letter template; discards any strokes drawn so far.
#[wasm_bindgen]
pub fn tracing_set_template(template: &JsValue) -> Result<String, JsValue> {
    let template: LetterTemplate = from_js(template, "template")?;
    with_session(|session| session.set_template(Rc::new(template)));
    current_summary()
}

#[wasm_bindgen]
pub fn tracing_clear_template() -> Result<String, JsValue> {
    with_session(|session| session.clear_template());
    current_summary()
}

/// Tells the engine where the canvas currently sits on screen, in the same
/// units as the `clientX`/`clientY` of incoming events.
#[wasm_bindgen]
pub fn tracing_set_viewport(left: f32, top: f32, width: f32, height: f32) {
    with_session(|session| session.set_viewport(Viewport::new(left, top, width, height)));
}

/// Overrides any subset of the tunable constants.
#[wasm_bindgen]
pub fn tracing_set_config(config: &JsValue) -> Result<String, JsValue> {
    let config: EvalConfig = from_js(config, "config")?;
    with_session(|session| session.set_config(config));
    current_summary()
}

/// Feeds one pointer, mouse or touch event. Returns the latest summary.
#[wasm_bindgen]
pub fn tracing_handle_event(event: &JsValue) -> Result<String, JsValue> {
    let event: DeviceEvent = from_js(event, "device event")?;
    with_session(|session| session.handle_event(&event));
    current_summary()
}

#[wasm_bindgen]
pub fn tracing_undo() -> Result<String, JsValue> {
    with_session(|session| session.undo());
    current_summary()
}

#[wasm_bindgen]
pub fn tracing_reset() -> Result<String, JsValue> {
    with_session(|session| session.reset());
    current_summary()
}

#[wasm_bindgen]
pub fn tracing_summary() -> Result<String, JsValue> {
    current_summary()
}

/// Called once per display frame. Returns `undefined` if nothing changed
/// since the previous call.
#[wasm_bindgen]
pub fn tracing_take_frame() -> Result<Option<String>, JsValue> {
    match with_session(|session| session.take_frame()) {
        Some(frame) => to_json(&frame).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_json() {
        let pt: Point = serde_json::from_str("{\"x\":1.5,\"y\":2}").unwrap();
        assert_eq!(pt, Point::new(1.5, 2.0));
        let pt: Point = serde_json::from_str("{\"x\":0,\"y\":0,\"pressure\":0.5}").unwrap();
        assert_eq!(pt.pressure, Some(0.5));
        // Absent pressure is not written back out
        assert_eq!(serde_json::to_string(&Point::new(1.0, 2.0)).unwrap(), "{\"x\":1.0,\"y\":2.0}");
    }
}
