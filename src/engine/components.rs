// Scene-graph components for the orrery.
// Every renderable thing in the world is one entity with a Transform,
// a Drawable that names its GPU mesh, and a Material.

use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

/// Placement of an entity in world space.
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Linear RGB color, 0..1 per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// `0xRRGGBB` as used in CSS/hex notation. Channels are treated as sRGB
    /// and converted to linear so they survive an sRGB surface unchanged.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    pub fn to_array(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// How a drawable is blended into the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blend {
    /// Depth-tested, depth-writing, back faces culled.
    Opaque,
    /// Alpha blended, depth-writing. `double_sided` disables culling.
    Translucent { double_sided: bool },
    /// Additive, no depth writes. Used by the star field.
    Additive,
    /// Alpha blended, textured, no depth writes. Used by the sun glow.
    Sprite,
}

/// Flat unlit material.
#[derive(Component, Debug, Clone, Copy)]
pub struct Material {
    pub color: Color,
    pub opacity: f32,
    pub blend: Blend,
}

impl Material {
    pub fn opaque(color: Color) -> Self {
        Self { color, opacity: 1.0, blend: Blend::Opaque }
    }
}

/// Index of a mesh uploaded to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Links an entity to its GPU mesh and per-object uniform slot.
#[derive(Component, Debug, Clone, Copy)]
pub struct Drawable {
    pub mesh: MeshId,
    pub slot: usize,
}

/// What an attachment of an orbiting body is. Replaces probing the
/// geometry type at runtime: rings follow the body, orbits stay put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentRole {
    Body,
    Orbit,
    Ring,
}

/// Marks an entity as belonging to the orbiting body at `owner`
/// (index into the animation loop's body list).
#[derive(Component, Debug, Clone, Copy)]
pub struct Attachment {
    pub owner: usize,
    pub role: AttachmentRole,
}

/// Tag for the star field entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StarField;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels_are_extracted() {
        let white = Color::from_hex(0xffffff);
        assert!((white.r - 1.0).abs() < 1e-6);
        assert!((white.g - 1.0).abs() < 1e-6);
        assert!((white.b - 1.0).abs() < 1e-6);

        let red = Color::from_hex(0xff0000);
        assert!((red.r - 1.0).abs() < 1e-6);
        assert_eq!(red.g, 0.0);
        assert_eq!(red.b, 0.0);
    }

    #[test]
    fn hex_is_linearized() {
        // sRGB 0x80 is roughly 0.216 linear.
        let grey = Color::from_hex(0x808080);
        assert!((grey.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn transform_matrix_applies_translation_last() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::splat(2.0));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
    }
}
