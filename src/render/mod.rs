/// Rendering seam for schematic previews
///
/// This module provides:
/// - `canvas.rs` - offscreen RGBA canvases and regions
/// - `transform.rs` - projection/model matrices and the scoped restore guard
/// - `software.rs` - a CPU rasteriser implementing [`Renderer`]
///
/// Hosts with a GPU implement [`Renderer`] over their own framebuffers;
/// the preview cache only ever talks to the trait.

pub mod canvas;
pub mod software;
pub mod transform;

pub use canvas::{Canvas, Rect, Region};
pub use software::SoftwareRenderer;
pub use transform::{Transform, TransformScope};

use image::Rgba;

use crate::error::RenderError;
use crate::state::data::Stile;

pub const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Primitive drawing operations used by the preview renderer.
///
/// All coordinates are world units mapped through [`Renderer::transform`].
pub trait Renderer {
    /// Allocate an offscreen canvas.
    fn allocate(&mut self, width: u32, height: u32) -> Result<Canvas, RenderError>;

    /// Release the resources behind a canvas allocated by this renderer.
    fn release(&mut self, canvas: &Canvas);

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    /// Replace every pixel of `target` with `color`.
    fn clear(&mut self, target: &mut Canvas, color: Rgba<u8>);

    /// Fill the square centred on `(x, y)` with half edge length `half`.
    fn fill_square(&mut self, target: &mut Canvas, x: f32, y: f32, half: f32, color: Rgba<u8>);

    /// Draw `region` of `source` stretched over `dest`, multiplied by `tint`.
    fn draw_region(
        &mut self,
        target: &mut Canvas,
        source: &Canvas,
        region: Region,
        dest: Rect,
        tint: Rgba<u8>,
    );

    /// Draw a tile's block. Units are tiles, with tile centres on integers.
    fn draw_tile(
        &mut self,
        target: &mut Canvas,
        tile: &Stile,
        _tiles: &[Stile],
    ) -> Result<(), RenderError> {
        let block = &tile.block;
        let half = block.size as f32 / 2.0;
        let cx = tile.x as f32 + block.offset();
        let cy = tile.y as f32 + block.offset();
        self.fill_square(target, cx, cy, half, Rgba(block.color));

        // Small darker notch on the side the block faces.
        let (dx, dy) = match tile.rotation % 4 {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
        let reach = (half - 0.2).max(0.0);
        let [r, g, b, a] = block.color;
        let notch = Rgba([r / 2, g / 2, b / 2, a]);
        self.fill_square(target, cx + dx * reach, cy + dy * reach, 0.15, notch);
        Ok(())
    }

    /// Draw the configuration overlay of a tile, if it has one.
    fn draw_tile_config(
        &mut self,
        target: &mut Canvas,
        tile: &Stile,
        _tiles: &[Stile],
    ) -> Result<(), RenderError> {
        if tile.config.is_null() {
            return Ok(());
        }
        let cx = tile.x as f32 + tile.block.offset();
        let cy = tile.y as f32 + tile.block.offset();
        self.fill_square(target, cx, cy, 0.2, WHITE);
        Ok(())
    }
}
