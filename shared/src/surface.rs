use thiserror::Error;

use crate::data_url::DataUrlError;
use crate::{Color, Point};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to encode raster: {0}")]
    Encode(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),
    #[error("drawing is still loading")]
    PaintPending,
}

/// Identifies one call to [`Surface::paint_data_url`] whose decode finishes
/// later. Hosts hand it back to the controller when the image lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaintTicket(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    /// The image is already on the raster.
    Done,
    /// The image is drawn once decoding finishes.
    Pending(PaintTicket),
}

/// One straight, round-capped line between two consecutive points of a
/// gesture. `from == to` paints a dot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: u32,
}

impl Segment {
    pub fn dot(at: Point, color: Color, width: u32) -> Self {
        Self {
            from: at,
            to: at,
            color,
            width,
        }
    }

    pub fn is_dot(&self) -> bool {
        self.from == self.to
    }
}

/// Immediate-mode raster the controller draws on.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    /// Changes the raster dimensions. Pixel contents are unspecified
    /// afterwards; callers repaint.
    fn resize(&mut self, width: u32, height: u32);

    /// Paints every pixel. Paints still waiting on a decode are discarded
    /// and never reach the raster.
    fn fill(&mut self, color: Color);

    fn stroke_segment(&mut self, segment: &Segment);

    /// Lossless PNG data URL of the current pixels.
    fn encode_data_url(&self) -> Result<String, SurfaceError>;

    /// Draws the encoded image at the origin, over the current contents,
    /// either immediately or once the platform has decoded it.
    fn paint_data_url(&mut self, data_url: &str) -> Result<Paint, SurfaceError>;
}
