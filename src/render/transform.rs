/// Projection and model transforms shared by every draw call
///
/// Points are transformed as `projection × model × (x, y, 1)` into
/// normalised device coordinates, where both axes run from -1 to +1.
/// Matrices are cgmath 3x3 homogeneous (column-major) matrices.
use cgmath::{Matrix3, SquareMatrix, Vector2, Vector3};
use std::ops::{Deref, DerefMut};

use super::Renderer;

/// The renderer's mutable transform state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World rectangle to NDC
    pub projection: Matrix3<f32>,
    /// Applied to every point before the projection
    pub model: Matrix3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            projection: Matrix3::identity(),
            model: Matrix3::identity(),
        }
    }
}

impl Transform {
    /// Project the world rectangle `(x, y, width, height)` onto the whole target.
    ///
    /// A negative height flips the vertical axis.
    pub fn set_ortho(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let scale = Matrix3::from_nonuniform_scale(2.0 / width, 2.0 / height);
        let shift = Matrix3::from_translation(Vector2::new(-x, -y));
        let recentre = Matrix3::from_translation(Vector2::new(-1.0, -1.0));
        self.projection = recentre * scale * shift;
    }

    /// Reset the model matrix to identity
    pub fn reset_model(&mut self) {
        self.model = Matrix3::identity();
    }

    /// Scale subsequent drawing (applied after any later translation)
    pub fn scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.model = self.model * Matrix3::from_nonuniform_scale(sx, sy);
        self
    }

    /// Translate subsequent drawing
    pub fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.model = self.model * Matrix3::from_translation(Vector2::new(dx, dy));
        self
    }

    /// Map a world point to normalised device coordinates
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let p = self.projection * self.model * Vector3::new(x, y, 1.0);
        (p.x, p.y)
    }
}

/// Scoped access to a renderer whose transform is restored on drop
///
/// Every render path that touches the projection or model matrix goes
/// through a scope, so ambient transform state is the same after the
/// scope ends as before it started, whichever way the scope is left.
pub struct TransformScope<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    saved: Transform,
}

impl<'a, R: Renderer + ?Sized> TransformScope<'a, R> {
    pub fn new(renderer: &'a mut R) -> Self {
        let saved = *renderer.transform();
        Self { renderer, saved }
    }
}

impl<R: Renderer + ?Sized> Deref for TransformScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for TransformScope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for TransformScope<'_, R> {
    fn drop(&mut self) {
        *self.renderer.transform_mut() = self.saved;
    }
}
