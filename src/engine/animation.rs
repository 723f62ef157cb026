// Per-frame orbital animation.
//
// The loop owns every orbiting body's runtime state in an index-addressed
// Vec; the ECS world only holds transforms. Each tick derives positions from
// angles and writes them into the entities tagged with an Attachment.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use std::time::Instant;

use super::components::{Attachment, AttachmentRole, StarField, Transform};

/// Speeds are tuned as "radians per frame at 60 fps".
pub const BASELINE_FPS: f32 = 60.0;
/// Star field spin, radians per baseline frame.
pub const STAR_SPIN: f32 = 0.002;

pub const MOON_DISTANCE: f32 = 1.7;
pub const MOON_RATE: f32 = 1.8;
pub const MOON_HEIGHT: f32 = 0.2;

// ============================================================================
// CLOCK
// ============================================================================

/// Measures the time between successive ticks.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Seconds since the previous call (or since construction).
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RUNTIME STATE
// ============================================================================

/// Runtime state of one planet. The angle is never wrapped; sin/cos do it.
#[derive(Debug, Clone)]
pub struct OrbitingBody {
    /// The sphere entity. Rings and orbit lines reference this body by index
    /// through their Attachment component.
    pub body: Entity,
    pub angle: f32,
    /// Radians per baseline frame.
    pub speed: f32,
    pub orbit_radius: f32,
}

impl OrbitingBody {
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.orbit_radius,
            0.0,
            self.angle.sin() * self.orbit_radius,
        )
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle += self.speed * dt * BASELINE_FPS;
    }
}

/// A moon circling one of the orbiting bodies.
///
/// Its phase depends only on total elapsed time, not on the host's angle,
/// so the relative phase drifts with the frame-time history.
#[derive(Debug, Clone, Copy)]
pub struct SatelliteOrbit {
    pub entity: Entity,
    /// Index into the body list.
    pub host: usize,
}

impl SatelliteOrbit {
    pub fn position(host: Vec3, elapsed: f32) -> Vec3 {
        let a = elapsed * MOON_RATE;
        Vec3::new(
            host.x + MOON_DISTANCE * a.cos(),
            MOON_HEIGHT,
            host.z + MOON_DISTANCE * a.sin(),
        )
    }
}

// ============================================================================
// ANIMATION LOOP
// ============================================================================

pub struct AnimationLoop {
    pub bodies: Vec<OrbitingBody>,
    pub satellite: Option<SatelliteOrbit>,
    star_rotation: f32,
    elapsed: f32,
}

impl AnimationLoop {
    pub fn new(bodies: Vec<OrbitingBody>, satellite: Option<SatelliteOrbit>) -> Self {
        Self {
            bodies,
            satellite,
            star_rotation: 0.0,
            elapsed: 0.0,
        }
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f32 { self.elapsed }

    /// Advance the simulation by `dt` seconds and write the new transforms.
    pub fn tick(&mut self, world: &mut World, dt: f32) {
        self.elapsed += dt;

        // Star field spin
        self.star_rotation += STAR_SPIN * dt * BASELINE_FPS;
        let spin = Quat::from_rotation_y(self.star_rotation);
        let mut stars = world.query_filtered::<&mut Transform, With<StarField>>();
        for mut transform in stars.iter_mut(world) {
            transform.rotation = spin;
        }

        // Planets: bodies and their rings follow the angle, orbit lines stay.
        let mut positions = Vec::with_capacity(self.bodies.len());
        for body in &mut self.bodies {
            body.advance(dt);
            let p = body.position();
            if let Some(mut transform) = world.get_mut::<Transform>(body.body) {
                transform.position = p;
            }
            positions.push(p);
        }

        let mut attached = world.query::<(&Attachment, &mut Transform)>();
        for (attachment, mut transform) in attached.iter_mut(world) {
            if attachment.role != AttachmentRole::Ring {
                continue;
            }
            if let Some(p) = positions.get(attachment.owner) {
                transform.position = *p;
            }
        }

        // Moon
        if let Some(moon) = self.satellite {
            if let Some(host) = positions.get(moon.host) {
                let p = SatelliteOrbit::position(*host, self.elapsed);
                if let Some(mut transform) = world.get_mut::<Transform>(moon.entity) {
                    transform.position = p;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn world_with_bodies(defs: &[(f32, f32, f32)]) -> (World, AnimationLoop) {
        let mut world = World::new();
        let mut bodies = Vec::new();
        for (i, &(angle, speed, radius)) in defs.iter().enumerate() {
            let body = world
                .spawn((
                    Transform::default(),
                    Attachment { owner: i, role: AttachmentRole::Body },
                ))
                .id();
            world.spawn((
                Transform::default(),
                Attachment { owner: i, role: AttachmentRole::Orbit },
            ));
            bodies.push(OrbitingBody { body, angle, speed, orbit_radius: radius });
        }
        (world, AnimationLoop::new(bodies, None))
    }

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn angles_advance_linearly_with_fixed_dt() {
        let defs = [(0.3, 0.02, 5.0), (1.0, 0.014, 7.2), (4.0, 0.007, 15.2)];
        let (mut world, mut anim) = world_with_bodies(&defs);
        let dt = 1.0 / 60.0;
        let ticks = 240;
        for _ in 0..ticks {
            anim.tick(&mut world, dt);
        }

        for (body, &(a0, speed, radius)) in anim.bodies.iter().zip(&defs) {
            let expected = a0 + speed * dt * 60.0 * ticks as f32;
            assert!((body.angle - expected).abs() < 1e-3);

            let p = world.get::<Transform>(body.body).unwrap().position;
            assert_vec_close(p, Vec3::new(radius * expected.cos(), 0.0, radius * expected.sin()));
        }
    }

    #[test]
    fn body_is_moved_through_its_entity() {
        let mut world = World::new();
        let body = world.spawn(Transform::default()).id();
        let mut anim = AnimationLoop::new(
            vec![OrbitingBody { body, angle: 0.0, speed: 0.0, orbit_radius: 9.6 }],
            None,
        );
        anim.tick(&mut world, 1.0 / 60.0);
        assert_vec_close(world.get::<Transform>(body).unwrap().position, Vec3::new(9.6, 0.0, 0.0));
    }

    #[test]
    fn angle_is_not_wrapped() {
        let (mut world, mut anim) = world_with_bodies(&[(0.0, 1.0, 5.0)]);
        for _ in 0..10 {
            anim.tick(&mut world, 1.0 / 60.0);
        }
        assert!(anim.bodies[0].angle > TAU);
    }

    #[test]
    fn rings_follow_body_but_orbits_stay() {
        let (mut world, mut anim) = world_with_bodies(&[(0.0, 0.01, 15.2)]);
        let ring = world
            .spawn((
                Transform::default(),
                Attachment { owner: 0, role: AttachmentRole::Ring },
            ))
            .id();

        anim.tick(&mut world, 0.5);

        let body_pos = world.get::<Transform>(anim.bodies[0].body).unwrap().position;
        assert_vec_close(world.get::<Transform>(ring).unwrap().position, body_pos);

        let mut orbits = world.query::<(&Attachment, &Transform)>();
        for (a, t) in orbits.iter(&world) {
            if a.role == AttachmentRole::Orbit {
                assert_eq!(t.position, Vec3::ZERO);
            }
        }
    }

    #[test]
    fn moon_circles_host_at_fixed_distance() {
        let (mut world, mut anim) = world_with_bodies(&[(0.0, 0.02, 5.0), (2.0, 0.011, 9.6)]);
        let moon = world.spawn(Transform::default()).id();
        anim.satellite = Some(SatelliteOrbit { entity: moon, host: 1 });

        for i in 0..300 {
            // Uneven frame times
            anim.tick(&mut world, if i % 3 == 0 { 0.033 } else { 0.011 });
            let host = world.get::<Transform>(anim.bodies[1].body).unwrap().position;
            let m = world.get::<Transform>(moon).unwrap().position;
            let horizontal = Vec3::new(m.x - host.x, 0.0, m.z - host.z).length();
            assert!((horizontal - MOON_DISTANCE).abs() < 1e-4);
            assert!((m.y - MOON_HEIGHT).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn moon_phase_depends_only_on_elapsed_time() {
        let host = Vec3::new(3.0, 0.0, -4.0);
        let t = 2.5;
        let p = SatelliteOrbit::position(host, t);
        let offset = p - host;
        let phase = offset.z.atan2(offset.x);
        let expected = (t * MOON_RATE).sin().atan2((t * MOON_RATE).cos());
        assert!((phase - expected).abs() < 1e-4);

        // Same elapsed time from a different host angle gives the same offset.
        let other = SatelliteOrbit::position(Vec3::new(-9.0, 0.0, 1.0), t);
        assert_vec_close(other - Vec3::new(-9.0, 0.0, 1.0), offset);
    }

    #[test]
    fn star_field_spins_with_time() {
        let (mut world, mut anim) = world_with_bodies(&[]);
        let stars = world.spawn((Transform::default(), StarField)).id();
        anim.tick(&mut world, 1.0);
        let expected = Quat::from_rotation_y(0.12);
        let actual = world.get::<Transform>(stars).unwrap().rotation;
        assert!(actual.angle_between(expected) < 1e-5);
    }

    #[test]
    fn elapsed_accumulates_deltas() {
        let (mut world, mut anim) = world_with_bodies(&[]);
        anim.tick(&mut world, 0.25);
        anim.tick(&mut world, 0.5);
        assert!((anim.elapsed() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn clock_delta_is_non_negative() {
        let mut clock = FrameClock::new();
        assert!(clock.delta() >= 0.0);
        assert!(clock.delta() >= 0.0);
    }
}
