//! Offscreen RGBA canvases.

use image::{Rgba, RgbaImage};

/// Id of canvases that were not allocated by a renderer (e.g. the placeholder)
pub const UNMANAGED: u64 = 0;

/// An RGBA bitmap that can be drawn into and displayed.
///
/// Row 0 is the bottom edge of the projected area, as with GL framebuffers.
/// Use [`Canvas::to_top_down`] when handing the pixels to an image viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixels: RgbaImage,
    id: u64,
}

impl Canvas {
    /// Wrap a bitmap that no renderer manages.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            id: UNMANAGED,
        }
    }

    pub(crate) fn managed(width: u32, height: u32, id: u64) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            id,
        }
    }

    /// Renderer-assigned resource id, [`UNMANAGED`] for wrapped bitmaps
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// Copy of the pixels with row 0 at the top
    pub fn to_top_down(&self) -> RgbaImage {
        image::imageops::flip_vertical(&self.pixels)
    }
}

/// A sub-rectangle of a canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A destination rectangle in world units, given by its centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn centered(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_down_copy_flips_rows() {
        let mut pixels = RgbaImage::new(2, 3);
        pixels.put_pixel(1, 0, Rgba([9, 9, 9, 255]));
        let canvas = Canvas::from_image(pixels);

        let flipped = canvas.to_top_down();

        assert_eq!(*flipped.get_pixel(1, 2), Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.pixel(1, 0), Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.id(), UNMANAGED);
    }
}
