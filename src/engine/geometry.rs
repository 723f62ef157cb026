// Procedural geometry for the orrery.
//
// Every builder is a pure function of its numeric parameters (plus an RNG
// for the star field) and is called once at startup. Nothing here is
// regenerated at runtime.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::mesh::{GpuVertex, PointCloud, Primitive, RenderMesh};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const STAR_COUNT: usize = 800;
/// Outer radius of the star shell.
pub const STAR_SHELL_RADIUS: f32 = 220.0;
/// Stars sit between this fraction of the shell radius and the full radius.
pub const STAR_SHELL_INNER: f32 = 0.6;
pub const STAR_SIZE: f32 = 1.2;

pub const ORBIT_SEGMENTS: u32 = 128;
pub const SPHERE_WIDTH_SEGMENTS: u32 = 48;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 32;
pub const RING_THETA_SEGMENTS: u32 = 64;

// ============================================================================
// STAR FIELD
// ============================================================================

/// `count` points on a spherical shell of radius
/// `[STAR_SHELL_INNER, 1.0] × STAR_SHELL_RADIUS`.
///
/// Azimuth is uniform in [0, 2π), elevation uniform in [-π/2, π/2).
/// Elevation is sampled uniformly (not by area), so stars bunch slightly
/// toward the poles.
pub fn star_field<R: Rng>(rng: &mut R, count: usize) -> PointCloud {
    let positions = (0..count)
        .map(|_| {
            let r = STAR_SHELL_RADIUS * rng.gen_range(STAR_SHELL_INNER..1.0);
            let theta = rng.gen_range(0.0..TAU);
            let phi = rng.gen_range(-FRAC_PI_2..FRAC_PI_2);
            Vec3::new(
                r * theta.cos() * phi.cos(),
                r * phi.sin(),
                r * theta.sin() * phi.cos(),
            )
        })
        .collect();

    PointCloud { positions, size: STAR_SIZE }
}

// ============================================================================
// ORBIT RING
// ============================================================================

/// Closed polyline of `segments` points on a circle of `radius` in the XZ plane.
pub fn orbit_ring(radius: f32, segments: u32) -> RenderMesh {
    let vertices = (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * TAU;
            GpuVertex::new(Vec3::new(a.cos() * radius, 0.0, a.sin() * radius), i as f32 / segments as f32, 0.0)
        })
        .collect();

    // Repeat the first vertex so a line strip closes the loop.
    let indices = (0..segments).chain(std::iter::once(0)).collect();

    RenderMesh { vertices, indices, primitive: Primitive::LineLoop }
}

// ============================================================================
// SPHERE
// ============================================================================

/// UV sphere centred at the origin. North pole is (0, radius, 0).
///
/// Produces `(width + 1) × (height + 1)` vertices (the seam column is
/// duplicated so UVs stay continuous). The polar rows emit one triangle per
/// segment instead of two. Faces wind CCW seen from outside.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> RenderMesh {
    let width = width_segments.max(3);
    let height = height_segments.max(2);

    let mut vertices = Vec::with_capacity(((width + 1) * (height + 1)) as usize);
    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        let theta = v * PI;
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let phi = u * TAU;
            let position = Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            vertices.push(GpuVertex::new(position, u, 1.0 - v));
        }
    }

    let row = width + 1;
    let mut indices = Vec::with_capacity((width * height * 6) as usize);
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    RenderMesh { vertices, indices, primitive: Primitive::Triangles }
}

// ============================================================================
// PLANETARY RING
// ============================================================================

/// Flat annulus in the XY plane (facing +Z) between `inner` and `outer`.
/// Callers rotate it into the orbital plane and draw it double-sided.
pub fn ring(inner: f32, outer: f32, theta_segments: u32) -> RenderMesh {
    let segments = theta_segments.max(3);

    let mut vertices = Vec::with_capacity(((segments + 1) * 2) as usize);
    for radius in [inner, outer] {
        for i in 0..=segments {
            let a = i as f32 / segments as f32 * TAU;
            let position = Vec3::new(radius * a.cos(), radius * a.sin(), 0.0);
            let u = (position.x / outer + 1.0) / 2.0;
            let v = (position.y / outer + 1.0) / 2.0;
            vertices.push(GpuVertex::new(position, u, v));
        }
    }

    let row = segments + 1;
    let mut indices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let a = i;
        let b = i + row;
        let c = i + row + 1;
        let d = i + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    RenderMesh { vertices, indices, primitive: Primitive::Triangles }
}

// ============================================================================
// BILLBOARD QUAD
// ============================================================================

/// Unit quad centred at the origin, used for sprites and star points.
/// The vertex shader expands it in camera space, so only XY matter.
pub fn billboard_quad() -> RenderMesh {
    let vertices = vec![
        GpuVertex::new(Vec3::new(-0.5, -0.5, 0.0), 0.0, 1.0),
        GpuVertex::new(Vec3::new( 0.5, -0.5, 0.0), 1.0, 1.0),
        GpuVertex::new(Vec3::new( 0.5,  0.5, 0.0), 1.0, 0.0),
        GpuVertex::new(Vec3::new(-0.5,  0.5, 0.0), 0.0, 0.0),
    ];
    RenderMesh {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
        primitive: Primitive::Triangles,
    }
}
