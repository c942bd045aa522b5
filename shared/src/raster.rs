//! Software implementation of [`Surface`] backed by an RGBA pixel buffer.
//!
//! Used headless: in tests, and wherever the drawing has to be rendered
//! without a browser canvas. Lines are rasterised by coverage of pixel
//! centres, without anti-aliasing.

use std::io::Cursor;

use image::{Rgba, RgbaImage};

use crate::data_url;
use crate::surface::{Paint, Segment, Surface, SurfaceError};
use crate::{Color, Point, BACKGROUND};

#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Creates an opaque raster filled with the background color.
    pub fn new(width: u32, height: u32) -> Self {
        let [r, g, b, a] = BACKGROUND.to_rgba8();
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([r, g, b, a])),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        Some(self.image.get_pixel(x, y).0)
    }

    /// True when every pixel equals `color`.
    pub fn is_uniform(&self, color: Color) -> bool {
        let expected = color.to_rgba8();
        self.image.pixels().all(|pixel| pixel.0 == expected)
    }

    pub fn count_pixels(&self, color: Color) -> usize {
        let expected = color.to_rgba8();
        self.image.pixels().filter(|pixel| pixel.0 == expected).count()
    }

    fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let dst = self.image.get_pixel_mut(x, y);
        dst.0 = source_over(src, dst.0);
    }
}

fn source_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    match src[3] {
        255 => src,
        0 => dst,
        alpha => {
            let sa = f32::from(alpha) / 255.0;
            let da = f32::from(dst[3]) / 255.0;
            let out_a = sa + da * (1.0 - sa);
            if out_a <= 0.0 {
                return [0, 0, 0, 0];
            }
            let channel = |s: u8, d: u8| -> u8 {
                let value = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
                value.round().clamp(0.0, 255.0) as u8
            };
            [
                channel(src[0], dst[0]),
                channel(src[1], dst[1]),
                channel(src[2], dst[2]),
                (out_a * 255.0).round() as u8,
            ]
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.x + abx * t;
    let cy = a.y + aby * t;
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

impl Surface for Raster {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width.max(1), height.max(1));
    }

    fn fill(&mut self, color: Color) {
        let pixel = Rgba(color.to_rgba8());
        for target in self.image.pixels_mut() {
            *target = pixel;
        }
    }

    fn stroke_segment(&mut self, segment: &Segment) {
        if !segment.from.is_finite() || !segment.to.is_finite() || segment.width == 0 {
            return;
        }
        // Thin diagonal lines would otherwise leave gaps between pixel centres.
        let radius = (f64::from(segment.width) / 2.0).max(std::f64::consts::FRAC_1_SQRT_2);
        let (width, height) = self.image.dimensions();
        let min_x = (segment.from.x.min(segment.to.x) - radius).floor().max(0.0);
        let min_y = (segment.from.y.min(segment.to.y) - radius).floor().max(0.0);
        let max_x = (segment.from.x.max(segment.to.x) + radius)
            .ceil()
            .min(f64::from(width));
        let max_y = (segment.from.y.max(segment.to.y) + radius)
            .ceil()
            .min(f64::from(height));
        if min_x >= max_x || min_y >= max_y {
            return;
        }
        let src = segment.color.to_rgba8();
        for y in min_y as u32..max_y as u32 {
            for x in min_x as u32..max_x as u32 {
                let centre = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if distance_to_segment(centre, segment.from, segment.to) <= radius {
                    self.blend(x, y, src);
                }
            }
        }
    }

    fn encode_data_url(&self) -> Result<String, SurfaceError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|err| SurfaceError::Encode(err.to_string()))?;
        Ok(data_url::encode_png(&bytes))
    }

    fn paint_data_url(&mut self, data_url: &str) -> Result<Paint, SurfaceError> {
        let bytes = data_url::decode(data_url)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|err| SurfaceError::Decode(err.to_string()))?
            .to_rgba8();
        let width = decoded.width().min(self.image.width());
        let height = decoded.height().min(self.image.height());
        for y in 0..height {
            for x in 0..width {
                self.blend(x, y, decoded.get_pixel(x, y).0);
            }
        }
        Ok(Paint::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn starts_opaque_white() {
        let raster = Raster::new(20, 10);
        assert_eq!(raster.size(), (20, 10));
        assert!(raster.is_uniform(Color::WHITE));
    }

    #[test]
    fn dot_is_round() {
        let mut raster = Raster::new(40, 40);
        raster.stroke_segment(&Segment::dot(Point::new(20.0, 20.0), RED, 10));
        assert_eq!(raster.pixel(20, 20), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(16, 20), Some([255, 0, 0, 255]));
        // Corner of the bounding square lies outside the disc.
        assert_eq!(raster.pixel(15, 15), Some([255, 255, 255, 255]));
        assert_eq!(raster.pixel(26, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn horizontal_segment_has_round_caps() {
        let mut raster = Raster::new(200, 200);
        raster.stroke_segment(&Segment {
            from: Point::new(100.0, 100.0),
            to: Point::new(150.0, 100.0),
            color: RED,
            width: 10,
        });
        for x in 96..154 {
            assert_eq!(raster.pixel(x, 100), Some([255, 0, 0, 255]), "x = {x}");
        }
        assert_eq!(raster.pixel(93, 100), Some([255, 255, 255, 255]));
        assert_eq!(raster.pixel(156, 100), Some([255, 255, 255, 255]));
        assert_eq!(raster.pixel(125, 94), Some([255, 255, 255, 255]));
        assert_eq!(raster.pixel(125, 106), Some([255, 255, 255, 255]));
    }

    #[test]
    fn segment_is_clipped_to_raster() {
        let mut raster = Raster::new(10, 10);
        raster.stroke_segment(&Segment {
            from: Point::new(-50.0, 5.0),
            to: Point::new(50.0, 5.0),
            color: RED,
            width: 2,
        });
        assert_eq!(raster.pixel(0, 5), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(9, 5), Some([255, 0, 0, 255]));
        raster.stroke_segment(&Segment::dot(Point::new(500.0, 500.0), RED, 4));
        raster.stroke_segment(&Segment::dot(Point::new(f64::NAN, 1.0), RED, 4));
    }

    #[test]
    fn translucent_color_blends_over_white() {
        let mut raster = Raster::new(10, 10);
        let half_black = Color {
            r: 0,
            g: 0,
            b: 0,
            a: 128,
        };
        raster.stroke_segment(&Segment::dot(Point::new(5.0, 5.0), half_black, 4));
        let [r, g, b, a] = raster.pixel(5, 5).unwrap();
        assert_eq!(a, 255);
        assert!(r == g && g == b);
        assert!((126..=128).contains(&r), "r = {r}");
    }

    #[test]
    fn data_url_round_trip_is_lossless() {
        let mut raster = Raster::new(64, 48);
        raster.stroke_segment(&Segment {
            from: Point::new(3.0, 4.0),
            to: Point::new(60.0, 40.0),
            color: Color::rgb(12, 200, 99),
            width: 7,
        });
        let url = raster.encode_data_url().unwrap();
        assert!(url.starts_with(data_url::PNG_PREFIX));

        let mut restored = Raster::new(64, 48);
        assert_eq!(restored.paint_data_url(&url).unwrap(), Paint::Done);
        assert_eq!(restored, raster);
    }

    #[test]
    fn paint_clips_larger_images() {
        let mut big = Raster::new(30, 30);
        big.fill(RED);
        let url = big.encode_data_url().unwrap();
        let mut small = Raster::new(10, 20);
        small.paint_data_url(&url).unwrap();
        assert_eq!(small.size(), (10, 20));
        assert!(small.is_uniform(RED));
    }

    #[test]
    fn corrupt_data_url_is_an_error() {
        let mut raster = Raster::new(4, 4);
        assert!(matches!(
            raster.paint_data_url("data:image/png;base64,AAAA"),
            Err(SurfaceError::Decode(_))
        ));
        assert!(matches!(
            raster.paint_data_url("garbage"),
            Err(SurfaceError::DataUrl(_))
        ));
        assert!(raster.is_uniform(Color::WHITE));
    }

    #[test]
    fn resize_wipes_contents() {
        let mut raster = Raster::new(4, 4);
        raster.resize(8, 2);
        assert_eq!(raster.size(), (8, 2));
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
    }
}
