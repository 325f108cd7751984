/// 2-D linear transform of an overlay (scale + rotation)
///
/// Translation is not part of the transform: an overlay's position is its
/// center point, and the transform is applied around that center.
///
/// The matrix is stored column-major like every cgmath matrix:
/// column `x = (a, b)` is the image of the x axis, column `y = (c, d)` the
/// image of the y axis, so a point maps to `(a·x + c·y, b·x + d·y)`.

use cgmath::{Matrix2, Rad, SquareMatrix, Vector2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D(Matrix2<f32>);

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self(Matrix2::identity())
    }

    /// Uniform scale followed by a rotation in radians
    pub fn from_parts(scale: f32, rotation: f32) -> Self {
        Self::identity().scaled(scale).rotated(rotation)
    }

    /// Compose a uniform scale onto this transform
    pub fn scaled(self, factor: f32) -> Self {
        Self(self.0 * factor)
    }

    /// Compose a rotation (radians) onto this transform
    pub fn rotated(self, radians: f32) -> Self {
        Self(self.0 * Matrix2::from_angle(Rad(radians)))
    }

    pub fn a(&self) -> f32 {
        self.0.x.x
    }

    pub fn b(&self) -> f32 {
        self.0.x.y
    }

    pub fn c(&self) -> f32 {
        self.0.y.x
    }

    pub fn d(&self) -> f32 {
        self.0.y.y
    }

    /// Rotation angle in radians, `atan2(b, a)`
    pub fn rotation(&self) -> f32 {
        self.b().atan2(self.a())
    }

    /// Uniform scale, `sqrt(a² + c²)`
    pub fn scale(&self) -> f32 {
        (self.a() * self.a() + self.c() * self.c()).sqrt()
    }

    /// Axis-aligned extents of a `width × height` box under this transform
    pub fn bounding_size(&self, width: f32, height: f32) -> Vector2<f32> {
        Vector2::new(
            self.a().abs() * width + self.c().abs() * height,
            self.b().abs() * width + self.d().abs() * height,
        )
    }

    /// Apply to a vector
    pub fn apply(&self, v: Vector2<f32>) -> Vector2<f32> {
        self.0 * v
    }
}
