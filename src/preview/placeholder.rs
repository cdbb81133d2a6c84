//! Placeholder preview for schematics that fail to render.
//!
//! Loaded from an image file when one is configured, otherwise a red X
//! pattern is generated.

use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::warn;

use crate::render::Canvas;

/// Generated placeholder size in pixels.
pub const PLACEHOLDER_SIZE: u32 = 64;

/// Create a red placeholder image with an X pattern.
pub fn create_placeholder_image() -> RgbaImage {
    let size = PLACEHOLDER_SIZE;
    let red = Rgba([200, 50, 50, 255]);
    let dark_red = Rgba([120, 30, 30, 255]);

    RgbaImage::from_fn(size, size, |x, y| {
        // 2px border
        let is_border = x < 2 || x >= size - 2 || y < 2 || y >= size - 2;
        let on_diagonal = (x as i32 - y as i32).abs() <= 2
            || ((size - 1 - x) as i32 - y as i32).abs() <= 2;

        if is_border || on_diagonal {
            red
        } else {
            dark_red
        }
    })
}

/// Load the placeholder from `path`, falling back to the generated one.
pub fn load_placeholder(path: Option<&Path>) -> Canvas {
    if let Some(path) = path {
        match image::open(path) {
            Ok(img) => return Canvas::from_image(image::imageops::flip_vertical(&img.to_rgba8())),
            Err(e) => warn!("Failed to load placeholder image {:?}: {}", path, e),
        }
    }
    Canvas::from_image(create_placeholder_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::UNMANAGED;

    #[test]
    fn test_generated_placeholder_has_x() {
        let canvas = load_placeholder(None);
        assert_eq!(canvas.width(), PLACEHOLDER_SIZE);
        assert_eq!(canvas.id(), UNMANAGED);
        assert_eq!(canvas.pixel(32, 32), Rgba([200, 50, 50, 255]));
        assert_eq!(canvas.pixel(20, 40), Rgba([120, 30, 30, 255]));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let canvas = load_placeholder(Some(Path::new("/nonexistent/error.png")));
        assert_eq!(canvas.height(), PLACEHOLDER_SIZE);
    }

    #[test]
    fn test_loads_placeholder_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.png");
        RgbaImage::from_pixel(3, 5, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        let canvas = load_placeholder(Some(&path));
        assert_eq!((canvas.width(), canvas.height()), (3, 5));
        assert_eq!(canvas.pixel(0, 0), Rgba([1, 2, 3, 255]));
    }
}
