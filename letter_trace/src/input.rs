//! Turns device-specific pointer, mouse and touch events into one stream of
//! normalized pointer samples. The session never sees anything else.

use serde_derive::{Deserialize, Serialize};

/// Which device a sample came from. Each device family has its own id space,
/// so a touch identifier can never alias a pointer id or the mouse.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "device", content = "id", rename_all = "lowercase")]
pub enum PointerId {
    Mouse,
    Pointer(i64),
    Touch(i64),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One normalized input sample, still in device (client) coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pointer_id: PointerId,
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointerEventData {
    pub pointer_id: i64,
    pub phase: PointerPhase,
    pub client_x: f32,
    pub client_y: f32,
    #[serde(default)]
    pub pressure: Option<f32>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MouseAction {
    Down,
    Move,
    Up,
    Leave,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MouseEventData {
    pub action: MouseAction,
    pub client_x: f32,
    pub client_y: f32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TouchAction {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub identifier: i64,
    pub client_x: f32,
    pub client_y: f32,
    // 0 means the device does not report force
    #[serde(default)]
    pub force: f32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TouchEventData {
    pub action: TouchAction,
    pub changed_touches: Vec<TouchPoint>,
}

/// A raw event as the host page hands it over, tagged by `type`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeviceEvent {
    Pointer(PointerEventData),
    Mouse(MouseEventData),
    Touch(TouchEventData),
}

fn from_pointer(event: &PointerEventData) -> PointerSample {
    PointerSample {
        pointer_id: PointerId::Pointer(event.pointer_id),
        phase: event.phase,
        x: event.client_x,
        y: event.client_y,
        pressure: event.pressure,
    }
}

fn from_mouse(event: &MouseEventData) -> PointerSample {
    let phase = match event.action {
        MouseAction::Down => PointerPhase::Down,
        MouseAction::Move => PointerPhase::Move,
        MouseAction::Up => PointerPhase::Up,
        // Leaving the canvas ends the stroke the same way a cancel does
        MouseAction::Leave => PointerPhase::Cancel,
    };
    PointerSample {
        pointer_id: PointerId::Mouse,
        phase: phase,
        x: event.client_x,
        y: event.client_y,
        pressure: None,
    }
}

fn from_touch(event: &TouchEventData) -> Vec<PointerSample> {
    let phase = match event.action {
        TouchAction::Start => PointerPhase::Down,
        TouchAction::Move => PointerPhase::Move,
        TouchAction::End => PointerPhase::Up,
        TouchAction::Cancel => PointerPhase::Cancel,
    };
    event
        .changed_touches
        .iter()
        .map(|touch| PointerSample {
            pointer_id: PointerId::Touch(touch.identifier),
            phase: phase,
            x: touch.client_x,
            y: touch.client_y,
            pressure: if touch.force > 0.0 { Some(touch.force) } else { None },
        })
        .collect()
}

/// Normalizes one device event. Touch events yield one sample per changed
/// touch, in the order the device listed them.
pub fn normalize(event: &DeviceEvent) -> Vec<PointerSample> {
    match event {
        DeviceEvent::Pointer(data) => vec![from_pointer(data)],
        DeviceEvent::Mouse(data) => vec![from_mouse(data)],
        DeviceEvent::Touch(data) => from_touch(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_event() {
        let event: DeviceEvent = serde_json::from_str(
            "{\"type\":\"pointer\",\"pointerId\":7,\"phase\":\"move\",\"clientX\":12.5,\"clientY\":40,\"pressure\":0.25}",
        )
        .unwrap();
        let samples = normalize(&event);
        assert_eq!(
            samples,
            vec![PointerSample {
                pointer_id: PointerId::Pointer(7),
                phase: PointerPhase::Move,
                x: 12.5,
                y: 40.0,
                pressure: Some(0.25),
            }]
        );
    }

    #[test]
    fn test_mouse_leave_cancels() {
        let event: DeviceEvent =
            serde_json::from_str("{\"type\":\"mouse\",\"action\":\"leave\",\"clientX\":1,\"clientY\":2}").unwrap();
        let samples = normalize(&event);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].phase, PointerPhase::Cancel);
        assert_eq!(samples[0].pointer_id, PointerId::Mouse);
        assert_eq!(samples[0].pressure, None);
    }

    #[test]
    fn test_touch_fans_out() {
        let event: DeviceEvent = serde_json::from_str(
            "{\"type\":\"touch\",\"action\":\"start\",\"changedTouches\":[{\"identifier\":0,\"clientX\":5,\"clientY\":6,\"force\":0.5},{\"identifier\":1,\"clientX\":50,\"clientY\":60}]}",
        )
        .unwrap();
        let samples = normalize(&event);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].pointer_id, PointerId::Touch(0));
        assert_eq!(samples[0].pressure, Some(0.5));
        assert_eq!(samples[1].pointer_id, PointerId::Touch(1));
        assert_eq!(samples[1].pressure, None);
        assert!(samples.iter().all(|s| s.phase == PointerPhase::Down));
        // Touch 1 never collides with pointer id 1
        assert_ne!(samples[1].pointer_id, PointerId::Pointer(1));
    }

    #[test]
    fn test_extreme_touch_identifiers() {
        let event: DeviceEvent = serde_json::from_str(
            "{\"type\":\"touch\",\"action\":\"start\",\"changedTouches\":[{\"identifier\":9223372036854775807,\"clientX\":1,\"clientY\":1},{\"identifier\":-4294967297,\"clientX\":2,\"clientY\":2},{\"identifier\":-1,\"clientX\":3,\"clientY\":3}]}",
        )
        .unwrap();
        let samples = normalize(&event);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].pointer_id, PointerId::Touch(i64::MAX));
        assert_eq!(samples[1].pointer_id, PointerId::Touch(-4294967297));
        assert_eq!(samples[2].pointer_id, PointerId::Touch(-1));
        for s in &samples {
            assert_ne!(s.pointer_id, PointerId::Mouse);
            assert_ne!(s.pointer_id, PointerId::Pointer(-1));
        }
    }

    #[test]
    fn test_pointer_id_json() {
        let sample = PointerSample {
            pointer_id: PointerId::Touch(3),
            phase: PointerPhase::Up,
            x: 1.0,
            y: 2.0,
            pressure: None,
        };
        assert_eq!(
            serde_json::to_string(&sample).unwrap(),
            "{\"pointer_id\":{\"device\":\"touch\",\"id\":3},\"phase\":\"up\",\"x\":1.0,\"y\":2.0}"
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let res: Result<DeviceEvent, _> = serde_json::from_str("{\"type\":\"pen\",\"clientX\":1,\"clientY\":2}");
        assert!(res.is_err());
    }
}
