//! The main game module for the platformer.
//!
//! This module contains all the gameplay logic including:
//! - Level layout (sky, ground, ledges)
//! - Arcade physics (gravity, AABB contacts, world bounds)
//! - Player movement and sprite-sheet animation
//! - Star pickups and the respawning star wave
//! - Bomb spawning and the round state machine

mod bomb;
mod debug;
mod hud;
mod level;
mod physics;
mod player;
pub mod round;
mod score;
mod star;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    configure_update_phases(app);

    // Load game assets before any of the round's spawn systems run.
    app.add_systems(
        OnEnter(round::RoundState::Playing),
        load_game_assets
            .before(level::spawn_level)
            .before(player::spawn_player)
            .before(star::spawn_stars),
    );

    app.add_plugins((
        level::plugin,
        physics::plugin,
        player::plugin,
        star::plugin,
        bomb::plugin,
        round::plugin,
        score::plugin,
        hud::plugin,
        debug::plugin,
    ));
}

/// The phases a gameplay frame passes through, in order.
///
/// Messages flow forward through the chain: contact detection sees the
/// positions the physics phase just resolved, and the rule handlers see the
/// contacts of the same frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum GameSystems {
    /// Sample input and steer the player.
    Input,
    /// Integrate velocities and resolve contacts against level geometry.
    Physics,
    /// Detect star pickups and bomb hits from the fresh positions.
    Contacts,
    /// Apply the round rules to this frame's events.
    Rules,
    /// Spawning and presentation driven by the rules.
    Present,
}

/// Register the `GameSystems` chain on the `Update` schedule.
///
/// Split out of [`plugin`] so the headless test harness can set up the same
/// frame ordering without the asset loader.
fn configure_update_phases(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameSystems::Input,
            GameSystems::Physics,
            GameSystems::Contacts,
            GameSystems::Rules,
            GameSystems::Present,
        )
            .chain(),
    );
}

/// Holds handles for every image the game renders.
#[derive(Resource, Default)]
pub(crate) struct GameAssets {
    pub sky_image: Handle<Image>,
    pub platform_image: Handle<Image>,
    pub star_image: Handle<Image>,
    pub bomb_image: Handle<Image>,
    pub player_image: Handle<Image>,
    pub player_layout: Handle<TextureAtlasLayout>,
}

/// Load game assets - must run before any systems that use `GameAssets`.
fn load_game_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    commands.insert_resource(GameAssets {
        sky_image: asset_server.load("images/sky.png"),
        platform_image: asset_server.load("images/platform.png"),
        star_image: asset_server.load("images/star.png"),
        bomb_image: asset_server.load("images/bomb.png"),
        player_image: asset_server.load("images/dude.png"),
        // 9 frames of 32x48: 0-3 run left, 4 face the camera, 5-8 run right.
        player_layout: layouts.add(TextureAtlasLayout::from_grid(
            UVec2::new(32, 48),
            9,
            1,
            None,
            None,
        )),
    });
}
