/// Two-pass preview rendering
///
/// Pass 1 stamps every occupied cell into the shared shadow canvas, one
/// pixel per tile. Pass 2 stretches that silhouette over a fresh canvas as
/// a black drop shadow, then draws each tile's block and, in a second
/// sweep, each tile's configuration overlay on top.
use crate::error::RenderError;
use crate::render::{Canvas, Rect, Region, Renderer, TransformScope, BLACK, CLEAR, WHITE};
use crate::state::data::Schematic;
use crate::world::max_extent;

/// Extra shadow-canvas margin beyond the largest schematic plus padding
const SHADOW_MARGIN: u32 = 8;

/// Pixel layout of rendered previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLayout {
    /// Empty tiles around the schematic (split evenly between both sides)
    pub padding: u32,
    /// Pixels per tile in the composed preview
    pub resolution: u32,
}

impl Default for PreviewLayout {
    fn default() -> Self {
        Self {
            padding: 2,
            resolution: 32,
        }
    }
}

impl PreviewLayout {
    /// Edge length of the shadow canvas able to hold any schematic
    /// extracted with selection limit `max_schematic_size`
    pub fn shadow_size(&self, max_schematic_size: u32) -> u32 {
        let extent = max_extent(max_schematic_size.min(i32::MAX as u32) as i32) as u32;
        extent
            .saturating_add(self.padding)
            .saturating_add(SHADOW_MARGIN)
    }

    /// Preview canvas size for a schematic
    pub fn canvas_size(&self, schematic: &Schematic) -> Result<(u32, u32), RenderError> {
        let (w, h) = self.span(schematic);
        match (w.checked_mul(self.resolution), h.checked_mul(self.resolution)) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(RenderError::CanvasTooLarge {
                width: w.saturating_mul(self.resolution),
                height: h.saturating_mul(self.resolution),
                max: u32::MAX,
            }),
        }
    }

    /// Schematic size plus padding, in tiles
    fn span(&self, schematic: &Schematic) -> (u32, u32) {
        (
            (schematic.width().max(1) as u32).saturating_add(self.padding),
            (schematic.height().max(1) as u32).saturating_add(self.padding),
        )
    }
}

/// Render `schematic` into a newly allocated canvas.
///
/// `shadow` is cleared before use. The renderer's transform is restored
/// before returning, and the new canvas is released again if drawing fails.
pub fn render_preview<R: Renderer + ?Sized>(
    renderer: &mut R,
    shadow: &mut Canvas,
    schematic: &Schematic,
    layout: PreviewLayout,
) -> Result<Canvas, RenderError> {
    let (span_w, span_h) = layout.span(schematic);
    if span_w > shadow.width() || span_h > shadow.height() {
        return Err(RenderError::ShadowOverflow {
            width: schematic.width(),
            height: schematic.height(),
            capacity: shadow.width().min(shadow.height()),
        });
    }

    let (width, height) = layout.canvas_size(schematic)?;
    let mut buffer = renderer.allocate(width, height)?;

    match compose(renderer, shadow, &mut buffer, schematic, layout) {
        Ok(()) => Ok(buffer),
        Err(e) => {
            renderer.release(&buffer);
            Err(e)
        }
    }
}

fn compose<R: Renderer + ?Sized>(
    renderer: &mut R,
    shadow: &mut Canvas,
    buffer: &mut Canvas,
    schematic: &Schematic,
    layout: PreviewLayout,
) -> Result<(), RenderError> {
    let mut scope = TransformScope::new(renderer);
    let half_pad = layout.padding as f32 / 2.0;
    let tiles = schematic.tiles();

    // Silhouette: one unit square per occupied cell.
    scope.clear(shadow, CLEAR);
    {
        let transform = scope.transform_mut();
        transform.reset_model();
        transform.set_ortho(0.0, 0.0, shadow.width() as f32, shadow.height() as f32);
    }
    for tile in tiles {
        let (bot, top) = tile.block.footprint();
        for dx in bot..=top {
            for dy in bot..=top {
                let wx = (tile.x + dx) as f32;
                let wy = (tile.y + dy) as f32;
                scope.fill_square(shadow, half_pad + wx + 0.5, half_pad + wy + 0.5, 0.5, WHITE);
            }
        }
    }

    // Composition: drop shadow, then blocks, then config overlays.
    let (bw, bh) = (buffer.width() as f32, buffer.height() as f32);
    let (span_w, span_h) = layout.span(schematic);
    scope.clear(buffer, CLEAR);
    scope.transform_mut().set_ortho(0.0, 0.0, bw, bh);
    scope.draw_region(
        buffer,
        shadow,
        Region::new(0, 0, span_w, span_h),
        Rect::centered(bw / 2.0, bh / 2.0, bw, bh),
        BLACK,
    );

    let res = layout.resolution as f32;
    scope
        .transform_mut()
        .scale(res, res)
        .translate(half_pad + 0.5, half_pad + 0.5);

    for tile in tiles {
        scope.draw_tile(buffer, tile, tiles)?;
    }
    for tile in tiles {
        scope.draw_tile_config(buffer, tile, tiles)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareRenderer;
    use crate::state::data::Stile;
    use crate::world::Block;
    use image::Rgba;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const LAYOUT: PreviewLayout = PreviewLayout {
        padding: 2,
        resolution: 4,
    };

    fn single_tile(config: Value) -> Schematic {
        let block = Arc::new(Block::new("wall", 1).with_color([10, 200, 10, 255]));
        Schematic::new(vec![Stile::new(block, 0, 0, config, 0)], BTreeMap::new(), 1, 1)
    }

    #[test]
    fn test_single_tile_preview_layout() {
        let mut renderer = SoftwareRenderer::default();
        let mut shadow = renderer.allocate(26, 26).unwrap();

        let canvas = render_preview(&mut renderer, &mut shadow, &single_tile(Value::Null), LAYOUT)
            .unwrap();

        assert_eq!((canvas.width(), canvas.height()), (12, 12));
        // Padding stays transparent, the tile cell takes the block colour.
        assert_eq!(canvas.pixel(0, 0), CLEAR);
        assert_eq!(canvas.pixel(11, 11), CLEAR);
        assert_eq!(canvas.pixel(4, 4), Rgba([10, 200, 10, 255]));
        // Silhouette pixel for tile (0, 0) sits one padding tile in.
        assert_eq!(shadow.pixel(1, 1), WHITE);
        assert_eq!(shadow.pixel(0, 0), CLEAR);
    }

    #[test]
    fn test_config_overlay_drawn_on_top() {
        let mut renderer = SoftwareRenderer::default();
        let mut shadow = renderer.allocate(26, 26).unwrap();

        let canvas =
            render_preview(&mut renderer, &mut shadow, &single_tile(json!(3)), LAYOUT).unwrap();

        // Tile centre is at pixel 6; the overlay covers it.
        assert_eq!(canvas.pixel(5, 5), WHITE);
    }

    #[test]
    fn test_shadow_is_drained_between_renders() {
        let mut renderer = SoftwareRenderer::default();
        let mut shadow = renderer.allocate(26, 26).unwrap();
        let big = Arc::new(Block::new("big", 3));
        let wide = Schematic::new(
            vec![Stile::new(big, 1, 1, Value::Null, 0)],
            BTreeMap::new(),
            3,
            3,
        );

        render_preview(&mut renderer, &mut shadow, &wide, LAYOUT).unwrap();
        assert_eq!(shadow.pixel(3, 3), WHITE);

        render_preview(&mut renderer, &mut shadow, &single_tile(Value::Null), LAYOUT).unwrap();
        assert_eq!(shadow.pixel(3, 3), CLEAR);
        assert_eq!(shadow.pixel(1, 1), WHITE);
    }

    #[test]
    fn test_oversized_schematic_rejected_before_allocation() {
        let mut renderer = SoftwareRenderer::default();
        let mut shadow = renderer.allocate(8, 8).unwrap();
        let schematic = Schematic::new(Vec::new(), BTreeMap::new(), 7, 2);

        let err = render_preview(&mut renderer, &mut shadow, &schematic, LAYOUT).unwrap_err();
        assert!(matches!(err, RenderError::ShadowOverflow { .. }));
        assert_eq!(renderer.live_canvases(), 1);
    }

    #[test]
    fn test_canvas_size_overflow_is_an_error() {
        let layout = PreviewLayout {
            padding: 2,
            resolution: u32::MAX / 2,
        };
        let schematic = Schematic::new(Vec::new(), BTreeMap::new(), 1, 1);

        assert!(matches!(
            layout.canvas_size(&schematic),
            Err(RenderError::CanvasTooLarge { max: u32::MAX, .. })
        ));
        assert_eq!(LAYOUT.canvas_size(&schematic).unwrap(), (12, 12));

        let mut renderer = SoftwareRenderer::default();
        let mut shadow = renderer.allocate(26, 26).unwrap();
        assert!(render_preview(&mut renderer, &mut shadow, &schematic, layout).is_err());
        assert_eq!(renderer.live_canvases(), 1);
    }

    #[test]
    fn test_shadow_holds_largest_extraction() {
        assert_eq!(PreviewLayout::default().shadow_size(512), 512 + 16 + 2 + 8);
    }

    #[test]
    fn test_transform_restored_after_render() {
        let mut renderer = SoftwareRenderer::default();
        renderer.transform_mut().set_ortho(5.0, 5.0, 3.0, 3.0);
        let before = *renderer.transform();
        let mut shadow = renderer.allocate(26, 26).unwrap();

        render_preview(&mut renderer, &mut shadow, &single_tile(Value::Null), LAYOUT).unwrap();

        assert_eq!(*renderer.transform(), before);
    }
}
