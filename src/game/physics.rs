//! Minimal arcade physics for the platformer.
//!
//! Bodies are axis-aligned boxes. Each frame: gravity, velocity integration,
//! contact resolution against the static platforms, then confinement to the
//! world bounds. The whole pass is gated on `RoundState::Playing`, which is
//! what suspends the simulation while the round is over.

use bevy::prelude::*;

use super::{GameSystems, level::WORLD_HALF, round::RoundState};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Velocity>();
    app.register_type::<Grounded>();

    app.add_systems(
        Update,
        (apply_gravity, integrate, collide_with_platforms, confine_to_world)
            .chain()
            .in_set(GameSystems::Physics)
            .run_if(in_state(RoundState::Playing)),
    );
}

/// Downward acceleration in pixels per second squared.
const GRAVITY: f32 = 300.0;

/// Rebound speeds below this are zeroed so bodies settle instead of
/// micro-bouncing forever.
const REST_SPEED: f32 = 10.0;

/// Linear velocity in pixels per second.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// Axis-aligned collision box, stored as half-extents around the transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub half: Vec2,
}

/// Marker for immovable bodies (the platforms).
#[derive(Component, Debug)]
pub struct StaticBody;

/// Per-axis restitution applied when a contact reverses the velocity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Bounce(pub Vec2);

/// Whether the body rested on top of something during the last physics pass.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Grounded(pub bool);

/// Marker for bodies clamped to the visible play field.
#[derive(Component, Debug)]
pub struct ConfinedToWorld;

fn apply_gravity(time: Res<Time>, mut bodies: Query<&mut Velocity>) {
    for mut velocity in &mut bodies {
        velocity.0.y -= GRAVITY * time.delta_secs();
    }
}

fn integrate(time: Res<Time>, mut bodies: Query<(&mut Transform, &Velocity)>) {
    for (mut transform, velocity) in &mut bodies {
        transform.translation += velocity.0.extend(0.0) * time.delta_secs();
    }
}

/// Push moving bodies out of the platforms along the shallower axis.
fn collide_with_platforms(
    platforms: Query<(&Transform, &Collider), With<StaticBody>>,
    mut bodies: Query<
        (&mut Transform, &mut Velocity, &Collider, &Bounce, &mut Grounded),
        Without<StaticBody>,
    >,
) {
    for (mut transform, mut velocity, collider, bounce, mut grounded) in &mut bodies {
        grounded.0 = false;

        for (platform_transform, platform_collider) in &platforms {
            let delta =
                transform.translation.truncate() - platform_transform.translation.truncate();
            let overlap = collider.half + platform_collider.half - delta.abs();
            if overlap.x <= 0.0 || overlap.y <= 0.0 {
                continue;
            }

            if overlap.y <= overlap.x {
                if delta.y >= 0.0 {
                    // Landing on top
                    transform.translation.y += overlap.y;
                    if velocity.0.y <= 0.0 {
                        velocity.0.y = rebound(-velocity.0.y * bounce.0.y);
                        grounded.0 = true;
                    }
                } else {
                    // Bumping the underside
                    transform.translation.y -= overlap.y;
                    if velocity.0.y > 0.0 {
                        velocity.0.y = rebound(-velocity.0.y * bounce.0.y);
                    }
                }
            } else if delta.x >= 0.0 {
                transform.translation.x += overlap.x;
                if velocity.0.x < 0.0 {
                    velocity.0.x = rebound(-velocity.0.x * bounce.0.x);
                }
            } else {
                transform.translation.x -= overlap.x;
                if velocity.0.x > 0.0 {
                    velocity.0.x = rebound(-velocity.0.x * bounce.0.x);
                }
            }
        }
    }
}

/// Keep confined bodies inside the play field, reflecting off the edges.
fn confine_to_world(
    mut bodies: Query<
        (&mut Transform, &mut Velocity, &Collider, &Bounce, &mut Grounded),
        With<ConfinedToWorld>,
    >,
) {
    for (mut transform, mut velocity, collider, bounce, mut grounded) in &mut bodies {
        let min = -WORLD_HALF + collider.half;
        let max = WORLD_HALF - collider.half;

        if transform.translation.x < min.x {
            transform.translation.x = min.x;
            velocity.0.x = rebound(velocity.0.x.abs() * bounce.0.x);
        } else if transform.translation.x > max.x {
            transform.translation.x = max.x;
            velocity.0.x = rebound(-velocity.0.x.abs() * bounce.0.x);
        }

        if transform.translation.y < min.y {
            transform.translation.y = min.y;
            velocity.0.y = rebound(velocity.0.y.abs() * bounce.0.y);
            grounded.0 = true;
        } else if transform.translation.y > max.y {
            transform.translation.y = max.y;
            velocity.0.y = rebound(-velocity.0.y.abs() * bounce.0.y);
        }
    }
}

fn rebound(speed: f32) -> f32 {
    if speed.abs() < REST_SPEED { 0.0 } else { speed }
}

/// Overlap test between two axis-aligned boxes given as (center, half-extents).
pub(super) fn aabbs_overlap(a_center: Vec2, a_half: Vec2, b_center: Vec2, b_half: Vec2) -> bool {
    let delta = (a_center - b_center).abs();
    let reach = a_half + b_half;
    delta.x < reach.x && delta.y < reach.y
}
