//! The player character.
//!
//! Keyboard-driven: left/right set a fixed horizontal speed, up jumps when
//! the body reports ground contact. The sprite sheet has three clips: run
//! left, face the camera, run right.

use bevy::prelude::*;

use super::{
    GameAssets, GameSystems,
    physics::{Bounce, Collider, ConfinedToWorld, Grounded, Velocity},
    round::RoundState,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>();
    app.register_type::<PlayerAnimation>();

    app.add_systems(OnEnter(RoundState::Playing), spawn_player);

    app.add_systems(
        Update,
        drive_player
            .in_set(GameSystems::Input)
            .run_if(in_state(RoundState::Playing)),
    );
    app.add_systems(
        Update,
        animate_player
            .in_set(GameSystems::Present)
            .run_if(in_state(RoundState::Playing)),
    );
}

/// Horizontal run speed in pixels per second.
const RUN_SPEED: f32 = 160.0;

/// Upward jump impulse in pixels per second.
const JUMP_SPEED: f32 = 330.0;

/// Where the player starts the round.
const PLAYER_START: Vec2 = Vec2::new(-300.0, -150.0);

/// Half-extents of the 32x48 player frame.
const PLAYER_HALF: Vec2 = Vec2::new(16.0, 24.0);

/// Seconds per animation frame (10 fps, like the sheet was authored for).
const FRAME_SECONDS: f32 = 0.1;

/// Tint applied when a bomb gets the player.
pub(super) const HIT_TINT: Color = Color::srgb(1.0, 0.0, 0.0);

/// Marker component for the player entity.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Player;

/// The three clips on the player sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Default)]
pub enum AnimClip {
    Left,
    #[default]
    Turn,
    Right,
}

impl AnimClip {
    fn frames(self) -> &'static [usize] {
        match self {
            AnimClip::Left => &[0, 1, 2, 3],
            AnimClip::Turn => &[4],
            AnimClip::Right => &[5, 6, 7, 8],
        }
    }
}

/// Sprite-sheet playback state for the player.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct PlayerAnimation {
    clip: AnimClip,
    frame: usize,
    timer: Timer,
}

impl PlayerAnimation {
    fn new() -> Self {
        Self {
            clip: AnimClip::Turn,
            frame: 0,
            timer: Timer::from_seconds(FRAME_SECONDS, TimerMode::Repeating),
        }
    }

    /// Switch clips, restarting playback only on an actual change.
    pub fn play(&mut self, clip: AnimClip) {
        if self.clip != clip {
            self.clip = clip;
            self.frame = 0;
            self.timer.reset();
        }
    }
}

pub(super) fn spawn_player(mut commands: Commands, game_assets: Res<GameAssets>) {
    commands.spawn((
        Name::new("Player"),
        Player,
        PlayerAnimation::new(),
        Sprite::from_atlas_image(
            game_assets.player_image.clone(),
            TextureAtlas {
                layout: game_assets.player_layout.clone(),
                index: AnimClip::Turn.frames()[0],
            },
        ),
        Transform::from_xyz(PLAYER_START.x, PLAYER_START.y, 1.0),
        Velocity(Vec2::ZERO),
        Bounce(Vec2::splat(0.2)),
        Collider { half: PLAYER_HALF },
        Grounded(false),
        ConfinedToWorld,
        DespawnOnExit(RoundState::GameOver),
    ));
}

/// Translate held keys into velocity and a clip choice.
fn drive_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut players: Query<(&mut Velocity, &Grounded, &mut PlayerAnimation), With<Player>>,
) {
    let Ok((mut velocity, grounded, mut animation)) = players.single_mut() else {
        return;
    };

    if keyboard.pressed(KeyCode::ArrowLeft) {
        velocity.0.x = -RUN_SPEED;
        animation.play(AnimClip::Left);
    } else if keyboard.pressed(KeyCode::ArrowRight) {
        velocity.0.x = RUN_SPEED;
        animation.play(AnimClip::Right);
    } else {
        velocity.0.x = 0.0;
        animation.play(AnimClip::Turn);
    }

    // No double jumps: only from the ground.
    if keyboard.pressed(KeyCode::ArrowUp) && grounded.0 {
        velocity.0.y = JUMP_SPEED;
    }
}

/// Advance the active clip and push the frame into the sprite atlas.
fn animate_player(
    time: Res<Time>,
    mut players: Query<(&mut Sprite, &mut PlayerAnimation), With<Player>>,
) {
    let Ok((mut sprite, mut animation)) = players.single_mut() else {
        return;
    };

    animation.timer.tick(time.delta());
    if animation.timer.just_finished() {
        animation.frame = (animation.frame + 1) % animation.clip.frames().len();
    }

    if let Some(atlas) = sprite.texture_atlas.as_mut() {
        atlas.index = animation.clip.frames()[animation.frame];
    }
}

/// Freeze the player facing the camera and tint it for the game-over pose.
pub(super) fn mark_hit(sprite: &mut Sprite, animation: &mut PlayerAnimation) {
    animation.play(AnimClip::Turn);
    sprite.color = HIT_TINT;
    if let Some(atlas) = sprite.texture_atlas.as_mut() {
        atlas.index = AnimClip::Turn.frames()[0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_use_the_authored_frame_ranges() {
        assert_eq!(AnimClip::Left.frames(), &[0, 1, 2, 3]);
        assert_eq!(AnimClip::Turn.frames(), &[4]);
        assert_eq!(AnimClip::Right.frames(), &[5, 6, 7, 8]);
    }

    #[test]
    fn switching_clips_restarts_playback() {
        let mut animation = PlayerAnimation::new();
        animation.frame = 3;
        animation.play(AnimClip::Left);
        assert_eq!(animation.frame, 0);

        // Re-playing the active clip must not restart it.
        animation.frame = 2;
        animation.play(AnimClip::Left);
        assert_eq!(animation.frame, 2);
    }
}
