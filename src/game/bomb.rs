//! Bombs - the hazards.
//!
//! Bombs drop in from the top of the field with a random sideways kick and
//! full restitution, so they keep ricocheting around the level until the
//! round is torn down. Touching one is the end of the round.

use bevy::prelude::*;
use rand::Rng;

use super::{
    GameAssets, GameSystems,
    level::TOP_Y,
    physics::{Bounce, Collider, ConfinedToWorld, Grounded, Velocity, aabbs_overlap},
    player::Player,
    round::RoundState,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Bomb>();
    app.add_message::<SpawnBomb>();
    app.add_message::<PlayerHit>();

    app.add_systems(
        Update,
        check_bomb_collision
            .in_set(GameSystems::Contacts)
            .run_if(in_state(RoundState::Playing)),
    );
    app.add_systems(
        Update,
        spawn_bombs
            .in_set(GameSystems::Present)
            .run_if(in_state(RoundState::Playing)),
    );
}

/// Hard ceiling on the bomb pool. Requests beyond it are dropped silently;
/// the gameplay cap the round rules enforce is far below this.
pub(super) const POOL_LIMIT: usize = 32;

/// Range of the random sideways kick at spawn, in pixels per second.
const LAUNCH_SPEED: f32 = 200.0;

/// Initial downward speed at spawn.
const DROP_SPEED: f32 = 20.0;

/// Half-extents of the bomb sprite.
const BOMB_HALF: Vec2 = Vec2::splat(7.0);

/// Marker component for bomb entities.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Bomb;

/// Message asking the spawner for one new bomb at the given x.
#[derive(Message, Debug, Clone)]
pub struct SpawnBomb {
    pub x: f32,
}

/// Message sent when a bomb touches the player.
#[derive(Message, Debug, Clone)]
pub struct PlayerHit;

/// Create one bomb per request, up to the pool ceiling.
fn spawn_bombs(
    mut commands: Commands,
    mut requests: MessageReader<SpawnBomb>,
    bombs: Query<Entity, With<Bomb>>,
    game_assets: Res<GameAssets>,
) {
    let mut active = bombs.iter().count();
    let mut rng = rand::rng();

    for request in requests.read() {
        if active >= POOL_LIMIT {
            // Pool exhaustion is not an error, just a dropped request.
            continue;
        }

        commands.spawn((
            Name::new("Bomb"),
            Bomb,
            Sprite::from_image(game_assets.bomb_image.clone()),
            Transform::from_xyz(request.x, TOP_Y, 1.0),
            Velocity(Vec2::new(
                rng.random_range(-LAUNCH_SPEED..LAUNCH_SPEED),
                -DROP_SPEED,
            )),
            Bounce(Vec2::splat(1.0)),
            Collider { half: BOMB_HALF },
            Grounded(false),
            ConfinedToWorld,
            DespawnOnExit(RoundState::GameOver),
        ));
        active += 1;

        info!("Spawned bomb at x={}", request.x);
    }
}

/// Report the first bomb found touching the player.
fn check_bomb_collision(
    players: Query<(&Transform, &Collider), With<Player>>,
    bombs: Query<(&Transform, &Collider), With<Bomb>>,
    mut hits: MessageWriter<PlayerHit>,
) {
    let Ok((player_transform, player_collider)) = players.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (bomb_transform, bomb_collider) in &bombs {
        if aabbs_overlap(
            player_pos,
            player_collider.half,
            bomb_transform.translation.truncate(),
            bomb_collider.half,
        ) {
            hits.write(PlayerHit);
            break;
        }
    }
}
