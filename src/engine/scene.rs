// Scene bootstrap and resize handling.
//
// SceneContext is the explicit replacement for page-level globals: it owns
// the ECS world, the camera, the orbit controller, the renderer's backing
// size and the animation loop, and is handed to whoever needs them.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use log::{debug, info};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::animation::{AnimationLoop, OrbitingBody, SatelliteOrbit};
use super::camera::{INITIAL_EYE, OrbitController, PerspectiveCamera};
use super::components::*;
use super::geometry::{self, ORBIT_SEGMENTS, RING_THETA_SEGMENTS, SPHERE_HEIGHT_SEGMENTS, SPHERE_WIDTH_SEGMENTS};
use super::glow::{GLOW_SCALE, GLOW_TEXTURE_SIZE, RadialGradient};
use super::input::InputState;
use super::mesh::{PointCloud, RenderMesh};

/// Height used when the container reports zero height.
pub const FALLBACK_HEIGHT: u32 = 320;

// ============================================================================
// BODY DESCRIPTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDescriptor {
    pub radius: f32,
    pub orbit_radius: f32,
    /// Radians per baseline (60 fps) frame.
    pub angular_speed: f32,
    pub color: u32,
    pub has_ring: bool,
}

pub const PLANETS: [BodyDescriptor; 5] = [
    BodyDescriptor { radius: 0.6, orbit_radius: 5.0,  angular_speed: 0.020, color: 0xb8e0d2, has_ring: false },
    BodyDescriptor { radius: 0.9, orbit_radius: 7.2,  angular_speed: 0.014, color: 0xf7c5cc, has_ring: false },
    BodyDescriptor { radius: 1.0, orbit_radius: 9.6,  angular_speed: 0.011, color: 0xc7d2fe, has_ring: false },
    BodyDescriptor { radius: 1.1, orbit_radius: 12.4, angular_speed: 0.009, color: 0xfde68a, has_ring: false },
    BodyDescriptor { radius: 0.9, orbit_radius: 15.2, angular_speed: 0.007, color: 0xd1fae5, has_ring: true },
];

pub const SUN_RADIUS: f32 = 2.6;
pub const SUN_COLOR: u32 = 0xffe08a;
pub const ORBIT_COLOR: u32 = 0x9fb3d1;
pub const ORBIT_OPACITY: f32 = 0.35;
pub const RING_COLOR: u32 = 0xdbeafe;
pub const RING_OPACITY: f32 = 0.85;
pub const RING_INNER: f32 = 1.8;
pub const RING_OUTER: f32 = 3.0;
pub const RING_TILT: f32 = 0.5;
pub const STAR_OPACITY: f32 = 0.85;
pub const MOON_RADIUS: f32 = 0.35;
/// The moon circles the third planet.
pub const MOON_HOST: usize = 2;

// ============================================================================
// MESH REGISTRY
// ============================================================================

/// Where built geometry goes. The GPU renderer uploads it; tests just count.
pub trait MeshRegistry {
    fn register_mesh(&mut self, mesh: &RenderMesh) -> MeshId;
    fn register_points(&mut self, points: &PointCloud) -> MeshId;
    /// A billboard quad textured with a square RGBA8 image.
    fn register_sprite(&mut self, quad: &RenderMesh, rgba: &[u8], size: u32) -> MeshId;
    /// Reserve a per-object uniform slot for one drawable entity.
    fn allocate_slot(&mut self) -> usize;
}

// ============================================================================
// VIEWPORT / RESIZE
// ============================================================================

/// Pixel size reported by the display container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
}

impl ContainerSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size the renderer should use: zero height falls back to 320.
    pub fn effective(self) -> Viewport {
        let height = if self.height == 0 { FALLBACK_HEIGHT } else { self.height };
        Viewport { width: self.width, height }
    }
}

/// Renderer backing-surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

// ============================================================================
// SCENE CONTEXT
// ============================================================================

pub struct SceneContext {
    pub world: World,
    pub camera: PerspectiveCamera,
    pub controller: OrbitController,
    pub viewport: Viewport,
    pub animation: AnimationLoop,
}

impl SceneContext {
    /// Camera, controller and viewport for `container`, with an empty world.
    /// No container, no scene.
    pub fn bootstrap(container: Option<ContainerSize>, damping_factor: f32) -> Option<Self> {
        let container = container?;
        let viewport = container.effective();

        let mut controller = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        controller.damping_factor = damping_factor;

        info!(
            "scene bootstrap: {}x{} (aspect {:.3})",
            viewport.width,
            viewport.height,
            viewport.aspect()
        );

        Some(Self {
            world: World::new(),
            camera: PerspectiveCamera::new(viewport.aspect()),
            controller,
            viewport,
            animation: AnimationLoop::new(Vec::new(), None),
        })
    }

    /// Resize handler: recompute aspect and the renderer size from the
    /// container. Returns the new renderer size.
    pub fn resize(&mut self, container: ContainerSize) -> Viewport {
        self.viewport = container.effective();
        self.camera.aspect = self.viewport.aspect();
        self.viewport
    }

    /// Build every scene object once and hand their runtime state to the
    /// animation loop.
    pub fn populate<R: Rng>(&mut self, registry: &mut dyn MeshRegistry, rng: &mut R, star_count: usize) {
        let world = &mut self.world;

        // Stars
        let stars = geometry::star_field(rng, star_count);
        let mesh = registry.register_points(&stars);
        world.spawn((
            Transform::default(),
            Drawable { mesh, slot: registry.allocate_slot() },
            Material { color: Color::WHITE, opacity: STAR_OPACITY, blend: Blend::Additive },
            StarField,
        ));

        // Sun + glow
        let sun = registry.register_mesh(&geometry::sphere(SUN_RADIUS, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS));
        world.spawn((
            Transform::default(),
            Drawable { mesh: sun, slot: registry.allocate_slot() },
            Material::opaque(Color::from_hex(SUN_COLOR)),
        ));

        let glow = RadialGradient::sun_glow().paint(GLOW_TEXTURE_SIZE);
        let glow_mesh = registry.register_sprite(&geometry::billboard_quad(), &glow, GLOW_TEXTURE_SIZE);
        world.spawn((
            Transform::default().with_scale(Vec3::new(GLOW_SCALE, GLOW_SCALE, 1.0)),
            Drawable { mesh: glow_mesh, slot: registry.allocate_slot() },
            Material { color: Color::WHITE, opacity: 1.0, blend: Blend::Sprite },
        ));

        // Planets
        let mut bodies = Vec::with_capacity(PLANETS.len());
        for (index, def) in PLANETS.iter().enumerate() {
            let angle = rng.gen_range(0.0..TAU);
            let start = Vec3::new(angle.cos(), 0.0, angle.sin()) * def.orbit_radius;

            let sphere = registry.register_mesh(&geometry::sphere(def.radius, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS));
            let body = world
                .spawn((
                    Transform::from_position(start),
                    Drawable { mesh: sphere, slot: registry.allocate_slot() },
                    Material::opaque(Color::from_hex(def.color)),
                    Attachment { owner: index, role: AttachmentRole::Body },
                ))
                .id();

            let orbit = registry.register_mesh(&geometry::orbit_ring(def.orbit_radius, ORBIT_SEGMENTS));
            world.spawn((
                Transform::default(),
                Drawable { mesh: orbit, slot: registry.allocate_slot() },
                Material {
                    color: Color::from_hex(ORBIT_COLOR),
                    opacity: ORBIT_OPACITY,
                    blend: Blend::Translucent { double_sided: true },
                },
                Attachment { owner: index, role: AttachmentRole::Orbit },
            ));

            if def.has_ring {
                let ring = registry.register_mesh(&geometry::ring(
                    def.radius * RING_INNER,
                    def.radius * RING_OUTER,
                    RING_THETA_SEGMENTS,
                ));
                world.spawn((
                    Transform::from_position(start).with_rotation(ring_orientation()),
                    Drawable { mesh: ring, slot: registry.allocate_slot() },
                    Material {
                        color: Color::from_hex(RING_COLOR),
                        opacity: RING_OPACITY,
                        blend: Blend::Translucent { double_sided: true },
                    },
                    Attachment { owner: index, role: AttachmentRole::Ring },
                ));
            }

            bodies.push(OrbitingBody {
                body,
                angle,
                speed: def.angular_speed,
                orbit_radius: def.orbit_radius,
            });
        }

        // Moon
        let moon_mesh = registry.register_mesh(&geometry::sphere(MOON_RADIUS, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS));
        let moon = world
            .spawn((
                Transform::default(),
                Drawable { mesh: moon_mesh, slot: registry.allocate_slot() },
                Material::opaque(Color::WHITE),
            ))
            .id();
        let satellite = (MOON_HOST < bodies.len()).then_some(SatelliteOrbit { entity: moon, host: MOON_HOST });

        debug!(
            "scene populated: {} stars, {} planets, {} entities",
            star_count,
            bodies.len(),
            world.entities().len()
        );

        self.animation = AnimationLoop::new(bodies, satellite);
    }

    /// One animation step: move the bodies, then advance the controller.
    /// Input is consumed here so drag and zoom feed the same damped update.
    pub fn tick(&mut self, input: &InputState, dt: f32) {
        self.animation.tick(&mut self.world, dt);
        self.controller.apply_input(input, self.viewport.height as f32);
        self.controller.update();
    }

    pub fn view_projection(&self) -> glam::Mat4 {
        self.camera.projection_matrix() * self.controller.view_matrix()
    }

    pub fn body_count(&self) -> usize {
        self.animation.bodies.len()
    }
}

/// Ring laid into the orbital plane (-90° about X), then tilted about world Z.
pub fn ring_orientation() -> Quat {
    Quat::from_rotation_z(RING_TILT) * Quat::from_rotation_x(-FRAC_PI_2)
}
