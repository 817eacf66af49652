//! Star pickups.
//!
//! A wave of twelve stars drops in from the top of the field on a fixed
//! grid, each with its own vertical bounciness. Overlapping the player
//! reports a pickup; the round rules decide what happens next.

use bevy::prelude::*;
use rand::Rng;

use super::{
    GameAssets, GameSystems,
    level::TOP_Y,
    physics::{Bounce, Collider, Grounded, Velocity, aabbs_overlap},
    player::Player,
    round::RoundState,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Star>();
    app.add_message::<StarCollected>();

    app.add_systems(OnEnter(RoundState::Playing), spawn_stars);

    app.add_systems(
        Update,
        check_star_pickup
            .in_set(GameSystems::Contacts)
            .run_if(in_state(RoundState::Playing)),
    );
}

/// How many stars make up a wave.
pub(super) const STAR_COUNT: usize = 12;

/// Horizontal spacing of the wave grid.
const STAR_STEP: f32 = 70.0;

/// X of the leftmost star; the rest follow at `STAR_STEP` intervals.
const FIRST_STAR_X: f32 = -388.0;

/// Range the per-star vertical restitution is drawn from.
const BOUNCE_RANGE: std::ops::Range<f32> = 0.4..0.8;

/// Half-extents of the star sprite.
const STAR_HALF: Vec2 = Vec2::new(12.0, 11.0);

/// Marker component for star entities.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Star;

/// Message sent when the player overlaps an active star.
#[derive(Message, Debug, Clone)]
pub struct StarCollected {
    pub star: Entity,
    /// Where the collector stood, used to aim the bomb spawn.
    pub collector_x: f32,
}

pub(super) fn spawn_stars(mut commands: Commands, game_assets: Res<GameAssets>) {
    spawn_star_wave(&mut commands, &game_assets);
}

/// Drop a full wave of stars in from the top of the field.
pub(super) fn spawn_star_wave(commands: &mut Commands, game_assets: &GameAssets) {
    let mut rng = rand::rng();

    for i in 0..STAR_COUNT {
        let x = FIRST_STAR_X + i as f32 * STAR_STEP;
        commands.spawn((
            Name::new(format!("Star {i}")),
            Star,
            Sprite::from_image(game_assets.star_image.clone()),
            Transform::from_xyz(x, TOP_Y, 1.0),
            Velocity(Vec2::ZERO),
            Bounce(Vec2::new(0.0, rng.random_range(BOUNCE_RANGE))),
            Collider { half: STAR_HALF },
            Grounded(false),
            DespawnOnExit(RoundState::GameOver),
        ));
    }

    info!("Spawned a wave of {} stars", STAR_COUNT);
}

/// Report every star the player is overlapping this frame.
fn check_star_pickup(
    players: Query<(&Transform, &Collider), With<Player>>,
    stars: Query<(Entity, &Transform, &Collider), With<Star>>,
    mut collected: MessageWriter<StarCollected>,
) {
    let Ok((player_transform, player_collider)) = players.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (star, star_transform, star_collider) in &stars {
        if aabbs_overlap(
            player_pos,
            player_collider.half,
            star_transform.translation.truncate(),
            star_collider.half,
        ) {
            collected.write(StarCollected {
                star,
                collector_x: player_pos.x,
            });
        }
    }
}
