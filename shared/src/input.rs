use crate::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Maps `PointerEvent.pointerType`; unknown types are treated as mouse.
    pub fn from_pointer_type(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub pointer_id: i32,
    pub kind: PointerKind,
    /// Viewport position. `None` when the event carried no coordinates.
    pub client: Option<Point>,
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            client: Some(Point::new(x, y)),
        }
    }

    pub fn touch(pointer_id: i32, client: Option<Point>) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            client,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Up,
    Leave,
    Cancel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// The host must suppress the platform default (scroll, zoom).
    pub prevent_default: bool,
}

impl EventResponse {
    pub(crate) fn for_kind(kind: PointerKind) -> Self {
        Self {
            prevent_default: kind == PointerKind::Touch,
        }
    }
}
