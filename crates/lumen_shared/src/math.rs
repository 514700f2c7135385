//! Vector types shared between the engine and its renderer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D Vector - positions, sizes, deltas
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Broadcasts one scalar to both components
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }

    /// Component-wise linear interpolation. Exact at both endpoints.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x * (1.0 - t) + other.x * t,
            self.y * (1.0 - t) + other.y * t,
        )
    }

    /// Returns true if either component is non-zero.
    #[must_use]
    pub fn is_nonzero(self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// 4D Vector - RGBA colors (0-255) and edge quadruples
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec4 {
    /// X component (red)
    pub x: f32,
    /// Y component (green)
    pub y: f32,
    /// Z component (blue)
    pub z: f32,
    /// W component (alpha)
    pub w: f32,
}

impl Vec4 {
    /// Creates a new Vec4
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Zero vector (transparent black)
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Opaque white
    pub const WHITE: Self = Self::new(255.0, 255.0, 255.0, 255.0);

    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 255.0);

    /// Creates an opaque color from 0-255 channels.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 255.0)
    }

    /// Creates a color from a hex value (0xRRGGBBAA).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 24) & 0xFF) as f32,
            ((hex >> 16) & 0xFF) as f32,
            ((hex >> 8) & 0xFF) as f32,
            (hex & 0xFF) as f32,
        )
    }

    /// Broadcasts one scalar to all components
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Component-wise linear interpolation. Exact at both endpoints.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Self::new(
            mix(self.x, other.x),
            mix(self.y, other.y),
            mix(self.z, other.z),
            mix(self.w, other.w),
        )
    }

    /// Returns true when the alpha channel is zero.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.w <= 0.0
    }
}
