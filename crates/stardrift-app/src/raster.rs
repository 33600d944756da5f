//! Software drawing surface backed by an RGBA image.
//!
//! Anti-aliased circles and fading lines with straight-alpha source-over
//! blending onto a transparent backing store. The finished layer is
//! composited over a page background at the field's layer opacity and
//! written out as PNG.

use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage, Rgba as Pixel, RgbaImage};
use stardrift_field::{DrawContext, Rgba, SurfaceSize};

/// A transparent RGBA canvas.
#[derive(Clone, Debug)]
pub struct RasterCanvas {
    image: RgbaImage,
}

impl Default for RasterCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterCanvas {
    /// Zero-sized canvas; the field sizes it on mount.
    pub fn new() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
        }
    }

    /// The layer pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Number of pixels with any coverage.
    pub fn lit_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p[3] > 0).count()
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let src_a = (color.a * coverage).clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let src = [color.r, color.g, color.b];
        for (channel, &s) in src.iter().enumerate() {
            let d = dst[channel] as f32;
            let value = (s as f32 * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            dst[channel] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }

    fn shade_segment_pixel(
        &mut self,
        px: i64,
        py: i64,
        from: Vec2,
        along: Vec2,
        half_width: f32,
        color: Rgba,
    ) {
        let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
        let t = ((p - from).dot(along) / along.length_squared()).clamp(0.0, 1.0);
        let distance = p.distance(from + along * t);
        let coverage = (half_width + 0.5 - distance).clamp(0.0, 1.0);
        if coverage > 0.0 {
            self.blend(px, py, color, coverage * (1.0 - t));
        }
    }

    /// Composite the layer over `background` at `opacity`.
    pub fn flatten(&self, background: [u8; 3], opacity: f32) -> RgbImage {
        let opacity = opacity.clamp(0.0, 1.0);
        RgbImage::from_fn(self.image.width(), self.image.height(), |x, y| {
            let src = self.image.get_pixel(x, y);
            let a = src[3] as f32 / 255.0 * opacity;
            let mix = |s: u8, b: u8| (s as f32 * a + b as f32 * (1.0 - a)).round() as u8;
            Rgb([
                mix(src[0], background[0]),
                mix(src[1], background[1]),
                mix(src[2], background[2]),
            ])
        })
    }

    /// Composite and write a PNG, creating parent directories as needed.
    pub fn save_png(
        &self,
        path: &Path,
        background: [u8; 3],
        opacity: f32,
    ) -> Result<(), image::ImageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.flatten(background, opacity)
            .save_with_format(path, image::ImageFormat::Png)
    }
}

/// Inclusive pixel index range covering `[lo, hi]`, clipped to `[0, limit)`.
fn pixel_span(lo: f32, hi: f32, limit: u32) -> std::ops::RangeInclusive<i64> {
    let start = (lo.floor() as i64).max(0);
    let end = (hi.ceil() as i64).min(limit as i64 - 1);
    start..=end
}

impl DrawContext for RasterCanvas {
    fn resize(&mut self, size: SurfaceSize) {
        self.image = RgbaImage::new(size.width, size.height);
    }

    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.image.width(), self.image.height())
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Pixel([0, 0, 0, 0]);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let reach = radius + 1.0;
        let (w, h) = (self.image.width(), self.image.height());
        for py in pixel_span(center.y - reach, center.y + reach, h) {
            for px in pixel_span(center.x - reach, center.x + reach, w) {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }

    fn stroke_fading_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let along = to - from;
        let half_width = width * 0.5;
        if along.length_squared() <= f32::EPSILON {
            self.fill_circle(from, half_width, color);
            return;
        }

        // Walk the major axis and shade only the band around the line.
        let reach = half_width + 1.0;
        let band = reach * along.length();
        let (w, h) = (self.image.width(), self.image.height());
        if along.x.abs() >= along.y.abs() {
            let span = band / along.x.abs();
            for px in pixel_span(from.x.min(to.x) - reach, from.x.max(to.x) + reach, w) {
                let cx = px as f32 + 0.5;
                let cy = from.y + along.y * ((cx - from.x) / along.x);
                for py in pixel_span(cy - span, cy + span, h) {
                    self.shade_segment_pixel(px, py, from, along, half_width, color);
                }
            }
        } else {
            let span = band / along.y.abs();
            for py in pixel_span(from.y.min(to.y) - reach, from.y.max(to.y) + reach, h) {
                let cy = py as f32 + 0.5;
                let cx = from.x + along.x * ((cy - from.y) / along.y);
                for px in pixel_span(cx - span, cx + span, w) {
                    self.shade_segment_pixel(px, py, from, along, half_width, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> RasterCanvas {
        let mut canvas = RasterCanvas::new();
        canvas.resize(SurfaceSize::new(w, h));
        canvas
    }

    #[test]
    fn test_resize_allocates_transparent_store() {
        let canvas = canvas(40, 30);
        assert_eq!(canvas.size(), SurfaceSize::new(40, 30));
        assert_eq!(canvas.lit_pixels(), 0);
    }

    #[test]
    fn test_circle_covers_center_not_far_pixels() {
        let mut canvas = canvas(20, 20);
        canvas.fill_circle(Vec2::new(10.0, 10.0), 2.0, Rgba::white(1.0));
        assert_eq!(canvas.image().get_pixel(10, 10)[3], 255);
        assert_eq!(canvas.image().get_pixel(0, 0)[3], 0);
        assert_eq!(canvas.image().get_pixel(15, 10)[3], 0);
    }

    #[test]
    fn test_circle_alpha_follows_opacity() {
        let mut canvas = canvas(20, 20);
        canvas.fill_circle(Vec2::new(10.0, 10.0), 3.0, Rgba::white(0.5));
        let a = canvas.image().get_pixel(10, 10)[3];
        assert!((126..=129).contains(&a), "alpha {a}");
    }

    #[test]
    fn test_offscreen_shapes_are_clipped() {
        let mut canvas = canvas(10, 10);
        canvas.fill_circle(Vec2::new(-50.0, -50.0), 2.0, Rgba::white(1.0));
        canvas.stroke_fading_line(
            Vec2::new(-100.0, 5.0),
            Vec2::new(-400.0, 5.0),
            2.0,
            Rgba::white(1.0),
        );
        assert_eq!(canvas.lit_pixels(), 0);
    }

    #[test]
    fn test_line_fades_toward_tail() {
        let mut canvas = canvas(120, 20);
        canvas.stroke_fading_line(
            Vec2::new(10.0, 10.0),
            Vec2::new(110.0, 10.0),
            2.0,
            Rgba::white(1.0),
        );
        let near_head = canvas.image().get_pixel(12, 9)[3];
        let middle = canvas.image().get_pixel(60, 9)[3];
        let near_tail = canvas.image().get_pixel(105, 9)[3];
        assert!(near_head > middle && middle > near_tail);
        assert!(near_tail > 0);
        assert_eq!(canvas.image().get_pixel(60, 2)[3], 0);
    }

    #[test]
    fn test_steep_line_is_drawn() {
        let mut canvas = canvas(20, 120);
        canvas.stroke_fading_line(
            Vec2::new(10.0, 10.0),
            Vec2::new(12.0, 110.0),
            2.0,
            Rgba::white(1.0),
        );
        assert!(canvas.image().get_pixel(10, 11)[3] > 200);
        assert!(canvas.lit_pixels() > 150);
    }

    #[test]
    fn test_clear_resets_pixels() {
        let mut canvas = canvas(20, 20);
        canvas.fill_circle(Vec2::new(10.0, 10.0), 4.0, Rgba::white(1.0));
        assert!(canvas.lit_pixels() > 0);
        canvas.clear();
        assert_eq!(canvas.lit_pixels(), 0);
    }

    #[test]
    fn test_overlapping_alpha_accumulates() {
        let mut canvas = canvas(10, 10);
        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, Rgba::white(0.5));
        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, Rgba::white(0.5));
        let a = canvas.image().get_pixel(5, 5)[3];
        assert!((189..=193).contains(&a), "alpha {a}");
    }

    #[test]
    fn test_flatten_respects_layer_opacity() {
        let mut canvas = canvas(10, 10);
        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, Rgba::white(1.0));
        let background = [10, 20, 30];

        let hidden = canvas.flatten(background, 0.0);
        assert_eq!(hidden.get_pixel(5, 5), &Rgb(background));

        let shown = canvas.flatten(background, 1.0);
        assert_eq!(shown.get_pixel(5, 5), &Rgb([255, 255, 255]));
        assert_eq!(shown.get_pixel(0, 0), &Rgb(background));
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shots").join("frame.png");
        let mut canvas = canvas(16, 16);
        canvas.fill_circle(Vec2::new(8.0, 8.0), 2.0, Rgba::white(1.0));
        canvas.save_png(&path, [0, 0, 0], 0.7).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (16, 16));
        assert!(loaded.get_pixel(8, 8)[0] > 150);
    }
}
