/// CPU implementation of the rendering seam
///
/// Rasterises squares and textured regions straight into `image` buffers.
/// Pixel centres are sampled: a pixel is covered when its centre lies
/// inside the projected rectangle.
use image::{Pixel, Rgba};
use std::collections::HashSet;

use super::canvas::{Canvas, Rect, Region};
use super::transform::Transform;
use super::Renderer;
use crate::error::RenderError;

/// Largest canvas edge accepted by default, matching common GPU limits
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 16384;

/// Software renderer over `image::RgbaImage` canvases
#[derive(Debug)]
pub struct SoftwareRenderer {
    transform: Transform,
    max_texture_size: u32,
    next_id: u64,
    live: HashSet<u64>,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXTURE_SIZE)
    }
}

impl SoftwareRenderer {
    pub fn new(max_texture_size: u32) -> Self {
        Self {
            transform: Transform::default(),
            max_texture_size,
            next_id: 1,
            live: HashSet::new(),
        }
    }

    pub fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    /// Number of allocated canvases that have not been released
    pub fn live_canvases(&self) -> usize {
        self.live.len()
    }

    /// Map a world point to pixel coordinates of `target`
    fn to_pixels(&self, target: &Canvas, x: f32, y: f32) -> (f32, f32) {
        let (nx, ny) = self.transform.project(x, y);
        (
            (nx + 1.0) * 0.5 * target.width() as f32,
            (ny + 1.0) * 0.5 * target.height() as f32,
        )
    }
}

/// Half-open range of pixel indices whose centres fall in `[a, b)`
fn covered(a: f32, b: f32, limit: u32) -> std::ops::Range<u32> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let start = (lo - 0.5).ceil().clamp(0.0, limit as f32) as u32;
    let end = (hi - 0.5).ceil().clamp(0.0, limit as f32) as u32;
    start..end
}

fn modulate(color: Rgba<u8>, tint: Rgba<u8>) -> Rgba<u8> {
    let mut out = color;
    for (channel, t) in out.0.iter_mut().zip(tint.0) {
        *channel = ((*channel as u16 * t as u16 + 127) / 255) as u8;
    }
    out
}

impl Renderer for SoftwareRenderer {
    fn allocate(&mut self, width: u32, height: u32) -> Result<Canvas, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas { width, height });
        }
        if width > self.max_texture_size || height > self.max_texture_size {
            return Err(RenderError::CanvasTooLarge {
                width,
                height,
                max: self.max_texture_size,
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id);
        Ok(Canvas::managed(width, height, id))
    }

    fn release(&mut self, canvas: &Canvas) {
        self.live.remove(&canvas.id());
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn clear(&mut self, target: &mut Canvas, color: Rgba<u8>) {
        for pixel in target.image_mut().pixels_mut() {
            *pixel = color;
        }
    }

    fn fill_square(&mut self, target: &mut Canvas, x: f32, y: f32, half: f32, color: Rgba<u8>) {
        let (x0, y0) = self.to_pixels(target, x - half, y - half);
        let (x1, y1) = self.to_pixels(target, x + half, y + half);
        let (width, height) = (target.width(), target.height());

        let image = target.image_mut();
        for py in covered(y0, y1, height) {
            for px in covered(x0, x1, width) {
                image.get_pixel_mut(px, py).blend(&color);
            }
        }
    }

    fn draw_region(
        &mut self,
        target: &mut Canvas,
        source: &Canvas,
        region: Region,
        dest: Rect,
        tint: Rgba<u8>,
    ) {
        if region.width == 0 || region.height == 0 {
            return;
        }
        let (x0, y0) = self.to_pixels(target, dest.x - dest.width / 2.0, dest.y - dest.height / 2.0);
        let (x1, y1) = self.to_pixels(target, dest.x + dest.width / 2.0, dest.y + dest.height / 2.0);
        if x0 == x1 || y0 == y1 {
            return;
        }

        let (width, height) = (target.width(), target.height());
        let max_sx = (source.width().saturating_sub(1)).min(region.x + region.width - 1);
        let max_sy = (source.height().saturating_sub(1)).min(region.y + region.height - 1);

        let image = target.image_mut();
        for py in covered(y0, y1, height) {
            // Measuring from the first corner keeps flipped rectangles flipped.
            let v = ((py as f32 + 0.5) - y0) / (y1 - y0);
            let sy = (region.y + (v * region.height as f32) as u32).min(max_sy);
            for px in covered(x0, x1, width) {
                let u = ((px as f32 + 0.5) - x0) / (x1 - x0);
                let sx = (region.x + (u * region.width as f32) as u32).min(max_sx);
                let sample = modulate(source.pixel(sx, sy), tint);
                image.get_pixel_mut(px, py).blend(&sample);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BLACK, CLEAR, WHITE};

    #[test]
    fn test_allocation_limits() {
        let mut renderer = SoftwareRenderer::new(64);
        assert!(matches!(
            renderer.allocate(65, 10),
            Err(RenderError::CanvasTooLarge { max: 64, .. })
        ));
        assert!(matches!(renderer.allocate(0, 10), Err(RenderError::EmptyCanvas { .. })));

        let canvas = renderer.allocate(64, 64).unwrap();
        assert_eq!(renderer.live_canvases(), 1);
        renderer.release(&canvas);
        assert_eq!(renderer.live_canvases(), 0);
    }

    #[test]
    fn test_fill_square_hits_expected_pixels() {
        let mut renderer = SoftwareRenderer::default();
        let mut canvas = renderer.allocate(8, 8).unwrap();
        renderer.transform_mut().set_ortho(0.0, 0.0, 8.0, 8.0);

        renderer.fill_square(&mut canvas, 2.5, 3.5, 0.5, WHITE);

        assert_eq!(canvas.pixel(2, 3), WHITE);
        assert_eq!(canvas.pixel(3, 3), CLEAR);
        assert_eq!(canvas.pixel(2, 4), CLEAR);
        let filled = canvas.image().pixels().filter(|p| **p == WHITE).count();
        assert_eq!(filled, 1);
    }

    #[test]
    fn test_clear_drains_previous_content() {
        let mut renderer = SoftwareRenderer::default();
        let mut canvas = renderer.allocate(4, 4).unwrap();
        renderer.transform_mut().set_ortho(0.0, 0.0, 4.0, 4.0);
        renderer.fill_square(&mut canvas, 2.0, 2.0, 2.0, WHITE);

        renderer.clear(&mut canvas, CLEAR);

        assert!(canvas.image().pixels().all(|p| *p == CLEAR));
    }

    #[test]
    fn test_draw_region_scales_and_tints() {
        let mut renderer = SoftwareRenderer::default();
        let mut source = renderer.allocate(4, 4).unwrap();
        renderer.transform_mut().set_ortho(0.0, 0.0, 4.0, 4.0);
        // Only the bottom-left source pixel is opaque.
        renderer.fill_square(&mut source, 0.5, 0.5, 0.5, WHITE);

        let mut target = renderer.allocate(4, 4).unwrap();
        // Stretch the 2x2 bottom-left region over the whole 4x4 target.
        renderer.draw_region(
            &mut target,
            &source,
            Region::new(0, 0, 2, 2),
            Rect::centered(2.0, 2.0, 4.0, 4.0),
            BLACK,
        );

        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(target.pixel(x, y), BLACK);
        }
        assert_eq!(target.pixel(2, 2), CLEAR);
        assert_eq!(target.pixel(3, 0), CLEAR);
    }
}
