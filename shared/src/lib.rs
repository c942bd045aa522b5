pub mod color;
pub mod config;
pub mod controller;
pub mod data_url;
pub mod input;
#[cfg(feature = "raster")]
pub mod raster;
pub mod storage;
pub mod surface;
pub mod tool;

pub use color::{Color, ColorError};
pub use config::{Config, ConfigError, PersistPolicy, ResizePolicy, Sizing};
pub use controller::{ClearPrompt, Controller, DismissTarget, Export, StrokeState};
pub use input::{EndReason, EventResponse, PointerInput, PointerKind};
#[cfg(feature = "raster")]
pub use raster::Raster;
pub use storage::{MemoryStore, SnapshotStore, StorageError};
pub use surface::{Paint, PaintTicket, Segment, Surface, SurfaceError};
pub use tool::{OptionGroup, ToolError, ToolState};

pub const SNAPSHOT_KEY: &str = "savedDrawing";
pub const EXPORT_FILENAME: &str = "drawing.png";
pub const DEFAULT_SIZE: u32 = 5;
pub const BACKGROUND: Color = Color::WHITE;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Bounding box of the raster element in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn to_local(&self, client: Point) -> Option<Point> {
        let local = Point {
            x: client.x - self.left,
            y: client.y - self.top,
        };
        local.is_finite().then_some(local)
    }
}
