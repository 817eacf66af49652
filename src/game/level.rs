//! Static level layout: the sky backdrop, the ground, and three ledges.
//!
//! All geometry lives in Bevy's centered, Y-up coordinate space with the
//! camera at the origin.

use bevy::prelude::*;

use super::{
    GameAssets,
    physics::{Collider, StaticBody},
    round::RoundState,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(RoundState::Playing), spawn_level);
}

/// Half-extents of the visible play field (an 800x600 window).
pub(super) const WORLD_HALF: Vec2 = Vec2::new(400.0, 300.0);

/// The Y coordinate stars and bombs drop in from.
pub(super) const TOP_Y: f32 = WORLD_HALF.y;

/// The full-width ground slab, as (center, half-extents).
const GROUND: (Vec2, Vec2) = (Vec2::new(0.0, -268.0), Vec2::new(400.0, 32.0));

/// The three floating ledges, as (center, half-extents).
const LEDGES: [(Vec2, Vec2); 3] = [
    (Vec2::new(200.0, -100.0), Vec2::new(200.0, 16.0)),
    (Vec2::new(-350.0, 50.0), Vec2::new(200.0, 16.0)),
    (Vec2::new(350.0, 80.0), Vec2::new(200.0, 16.0)),
];

pub(super) fn spawn_level(mut commands: Commands, game_assets: Res<GameAssets>) {
    commands.spawn((
        Name::new("Sky"),
        Sprite {
            image: game_assets.sky_image.clone(),
            custom_size: Some(WORLD_HALF * 2.0),
            ..default()
        },
        // Z=-1 to sit behind everything else
        Transform::from_xyz(0.0, 0.0, -1.0),
        DespawnOnExit(RoundState::GameOver),
    ));

    let mut count = 0;
    for (center, half) in std::iter::once(GROUND).chain(LEDGES) {
        commands.spawn((
            Name::new(format!("Platform {count}")),
            StaticBody,
            Collider { half },
            Sprite {
                image: game_assets.platform_image.clone(),
                custom_size: Some(half * 2.0),
                ..default()
            },
            Transform::from_translation(center.extend(0.0)),
            DespawnOnExit(RoundState::GameOver),
        ));
        count += 1;
    }

    info!("Spawned level with {} platforms", count);
}
