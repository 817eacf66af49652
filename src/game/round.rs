//! Round state management - collecting, scoring, bomb escalation, game over.
//!
//! The rules react to the contact messages of the same frame: a pickup
//! scores and escalates, an emptied star field refills itself, and a bomb
//! touch ends the round until space rebuilds everything from scratch.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::{
    GameAssets, GameSystems,
    bomb::{Bomb, PlayerHit, SpawnBomb},
    player::{self, Player, PlayerAnimation},
    score::Score,
    star::{self, Star, StarCollected},
};

pub(super) fn plugin(app: &mut App) {
    app.init_state::<RoundState>();

    app.add_systems(
        Update,
        (collect_stars, handle_player_hit)
            .in_set(GameSystems::Rules)
            .run_if(in_state(RoundState::Playing)),
    );

    app.add_systems(
        Update,
        restart_round
            .run_if(in_state(RoundState::GameOver).and(input_just_pressed(KeyCode::Space))),
    );
}

/// Points awarded per collected star.
const POINTS_PER_STAR: u32 = 10;

/// Gameplay cap on simultaneously active bombs.
const BOMB_CAP: usize = 5;

/// Whether the round is live or over.
///
/// Exiting `GameOver` despawns every entity tagged
/// `DespawnOnExit(RoundState::GameOver)`, so the transition back to
/// `Playing` is a full rebuild, not a resume.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum RoundState {
    #[default]
    Playing,
    GameOver,
}

/// Apply the pickup rules for every star collected this frame.
fn collect_stars(
    mut commands: Commands,
    mut collected: MessageReader<StarCollected>,
    mut score: ResMut<Score>,
    mut bomb_requests: MessageWriter<SpawnBomb>,
    stars: Query<Entity, With<Star>>,
    bombs: Query<Entity, With<Bomb>>,
    game_assets: Res<GameAssets>,
) {
    let mut remaining = stars.iter().count();
    let mut pending_bombs = bombs.iter().count();
    let mut taken: Vec<Entity> = Vec::new();

    for pickup in collected.read() {
        // The overlap scan can report a star again before its despawn lands.
        if taken.contains(&pickup.star) {
            continue;
        }
        taken.push(pickup.star);

        commands.entity(pickup.star).despawn();
        score.add(POINTS_PER_STAR);
        remaining = remaining.saturating_sub(1);

        // An emptied field refills in the same event, checked before the
        // bomb gate so both can fire on one pickup.
        if remaining == 0 {
            star::spawn_star_wave(&mut commands, &game_assets);
            remaining = star::STAR_COUNT;
        }

        // Every pickup adds a bomb while the cap allows it. Bombs never
        // despawn mid-round, so a full cap stays full until restart.
        if pending_bombs < BOMB_CAP {
            bomb_requests.write(SpawnBomb {
                x: pickup.collector_x,
            });
            pending_bombs += 1;
        }
    }
}

/// A bomb touched the player: freeze the scene and end the round.
fn handle_player_hit(
    mut hits: MessageReader<PlayerHit>,
    mut players: Query<(&mut Sprite, &mut PlayerAnimation), With<Player>>,
    mut next_state: ResMut<NextState<RoundState>>,
    score: Res<Score>,
) {
    if hits.is_empty() {
        return;
    }
    hits.clear();

    let Ok((mut sprite, mut animation)) = players.single_mut() else {
        return;
    };
    player::mark_hit(&mut sprite, &mut animation);

    next_state.set(RoundState::GameOver);
    info!("Hit by a bomb. Final score: {}", score.value());
}

/// The sole way out of `GameOver`: rebuild the round from scratch.
fn restart_round(mut next_state: ResMut<NextState<RoundState>>) {
    next_state.set(RoundState::Playing);
    info!("Restarting round");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::{state::app::StatesPlugin, time::TimeUpdateStrategy};

    use super::*;
    use crate::game::{
        GameAssets, bomb, configure_update_phases, hud, level,
        physics::{self, Collider, Grounded, Velocity},
        player::HIT_TINT,
        score, star,
    };

    /// A headless app running the full game stack at a fixed 60 Hz step,
    /// already ticked once so the initial round is spawned.
    fn game_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )));
        app.init_resource::<ButtonInput<KeyCode>>();
        app.insert_resource(GameAssets::default());
        configure_update_phases(&mut app);
        app.add_plugins((
            level::plugin,
            physics::plugin,
            player::plugin,
            star::plugin,
            bomb::plugin,
            super::plugin,
            score::plugin,
            hud::plugin,
        ));
        app.update();
        app
    }

    fn count<C: Component>(app: &mut App) -> usize {
        let mut query = app.world_mut().query_filtered::<(), With<C>>();
        query.iter(app.world()).count()
    }

    fn score_of(app: &App) -> u32 {
        app.world().resource::<Score>().value()
    }

    fn round_state(app: &App) -> RoundState {
        *app.world().resource::<State<RoundState>>().get()
    }

    fn player_entity(app: &mut App) -> Entity {
        let mut query = app.world_mut().query_filtered::<Entity, With<Player>>();
        query.single(app.world()).expect("player should exist")
    }

    fn stars_with_positions(app: &mut App) -> Vec<(Entity, Vec2)> {
        let mut query = app
            .world_mut()
            .query_filtered::<(Entity, &Transform), With<Star>>();
        query
            .iter(app.world())
            .map(|(entity, transform)| (entity, transform.translation.truncate()))
            .collect()
    }

    fn place_player(app: &mut App, target: Vec2) {
        let player = player_entity(app);
        let mut transform = app.world_mut().get_mut::<Transform>(player).unwrap();
        transform.translation.x = target.x;
        transform.translation.y = target.y;
    }

    fn keys(app: &mut App) -> Mut<'_, ButtonInput<KeyCode>> {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>()
    }

    /// Park a bomb on the player so the next contact scan reports a hit.
    fn plant_bomb_on_player(app: &mut App) {
        let player = player_entity(app);
        let position = app.world().get::<Transform>(player).unwrap().translation;
        app.world_mut().spawn((
            Bomb,
            Transform::from_translation(position),
            Collider {
                half: Vec2::splat(7.0),
            },
            DespawnOnExit(RoundState::GameOver),
        ));
    }

    #[test]
    fn fresh_round_starts_clean() {
        let mut app = game_app();

        assert_eq!(round_state(&app), RoundState::Playing);
        assert_eq!(score_of(&app), 0);
        assert_eq!(count::<Star>(&mut app), 12);
        assert_eq!(count::<Bomb>(&mut app), 0);
        assert_eq!(count::<Player>(&mut app), 1);
    }

    #[test]
    fn collecting_a_star_scores_and_spawns_a_bomb_at_the_collector() {
        let mut app = game_app();

        let (star, star_pos) = stars_with_positions(&mut app)[0];
        place_player(&mut app, star_pos);
        app.update();

        assert_eq!(score_of(&app), 10);
        assert_eq!(count::<Star>(&mut app), 11);
        assert!(app.world().get_entity(star).is_err());
        assert_eq!(count::<Bomb>(&mut app), 1);

        // The bomb drops in at the collector's x.
        let player = player_entity(&mut app);
        let player_x = app.world().get::<Transform>(player).unwrap().translation.x;
        let mut query = app.world_mut().query_filtered::<&Transform, With<Bomb>>();
        let bomb_x = query.single(app.world()).unwrap().translation.x;
        assert_eq!(bomb_x, player_x);
    }

    #[test]
    fn collecting_the_last_star_refills_the_wave_and_still_spawns_a_bomb() {
        let mut app = game_app();

        let stars = stars_with_positions(&mut app);
        for (star, _) in &stars[..stars.len() - 1] {
            app.world_mut().despawn(*star);
        }
        let (last, last_pos) = stars[stars.len() - 1];

        place_player(&mut app, last_pos);
        app.update();

        // Both effects of the same pickup: a fresh wave and a new bomb.
        assert_eq!(score_of(&app), 10);
        assert_eq!(count::<Star>(&mut app), 12);
        assert!(app.world().get_entity(last).is_err());
        assert_eq!(count::<Bomb>(&mut app), 1);
    }

    #[test]
    fn bomb_cap_blocks_a_sixth_spawn() {
        let mut app = game_app();

        // Five parked bombs saturate the cap; kept away from the play area
        // so the scenario only exercises the spawn gate.
        for i in 0..BOMB_CAP {
            app.world_mut().spawn((
                Bomb,
                Transform::from_xyz(-300.0 + i as f32 * 50.0, -500.0, 0.0),
            ));
        }
        app.update();
        assert_eq!(count::<Bomb>(&mut app), 5);

        // Bombs never despawn mid-round, so the gate stays shut from here
        // on; pickups keep scoring without adding bombs.
        for _ in 0..2 {
            let (_, star_pos) = stars_with_positions(&mut app)[0];
            place_player(&mut app, star_pos);
            app.update();
        }

        assert_eq!(score_of(&app), 20);
        assert_eq!(count::<Bomb>(&mut app), 5);
    }

    #[test]
    fn spawner_pool_ceiling_drops_excess_requests() {
        let mut app = game_app();

        for _ in 0..bomb::POOL_LIMIT + 8 {
            app.world_mut().write_message(SpawnBomb { x: 0.0 });
        }
        app.update();

        assert_eq!(count::<Bomb>(&mut app), bomb::POOL_LIMIT);
    }

    #[test]
    fn bomb_contact_ends_the_round_and_freezes_the_world() {
        let mut app = game_app();

        plant_bomb_on_player(&mut app);
        app.update();
        app.update();

        assert_eq!(round_state(&app), RoundState::GameOver);

        let player = player_entity(&mut app);
        assert_eq!(
            app.world().get::<Sprite>(player).unwrap().color,
            HIT_TINT
        );

        // Physics is suspended and directional input is ignored.
        let before = app.world().get::<Transform>(player).unwrap().translation;
        keys(&mut app).press(KeyCode::ArrowLeft);
        app.update();
        app.update();

        let after = app.world().get::<Transform>(player).unwrap().translation;
        assert_eq!(before, after);
        assert_eq!(
            app.world().get::<Velocity>(player).unwrap().0.x,
            0.0
        );
    }

    #[test]
    fn space_rebuilds_a_fresh_round_after_game_over() {
        let mut app = game_app();

        // Score something first so the reset is observable.
        let (_, star_pos) = stars_with_positions(&mut app)[0];
        place_player(&mut app, star_pos);
        app.update();
        assert_eq!(score_of(&app), 10);

        plant_bomb_on_player(&mut app);
        app.update();
        app.update();
        assert_eq!(round_state(&app), RoundState::GameOver);

        keys(&mut app).press(KeyCode::Space);
        app.update();
        app.update();

        assert_eq!(round_state(&app), RoundState::Playing);
        assert_eq!(score_of(&app), 0);
        assert_eq!(count::<Star>(&mut app), 12);
        assert_eq!(count::<Bomb>(&mut app), 0);

        // The rebuilt player is untinted.
        let player = player_entity(&mut app);
        assert_eq!(app.world().get::<Sprite>(player).unwrap().color, Color::WHITE);
    }

    #[test]
    fn arrows_drive_the_player_and_jumps_need_ground_contact() {
        let mut app = game_app();
        let player = player_entity(&mut app);

        keys(&mut app).press(KeyCode::ArrowRight);
        app.update();
        assert_eq!(app.world().get::<Velocity>(player).unwrap().0.x, 160.0);

        keys(&mut app).release(KeyCode::ArrowRight);
        keys(&mut app).press(KeyCode::ArrowLeft);
        app.update();
        assert_eq!(app.world().get::<Velocity>(player).unwrap().0.x, -160.0);
        keys(&mut app).release(KeyCode::ArrowLeft);

        // Mid-air, up must not add an impulse.
        keys(&mut app).press(KeyCode::ArrowUp);
        app.update();
        assert!(app.world().get::<Velocity>(player).unwrap().0.y <= 0.0);
        keys(&mut app).release(KeyCode::ArrowUp);

        // Let the player settle onto the ground, then jump.
        for _ in 0..240 {
            app.update();
        }
        assert!(app.world().get::<Grounded>(player).unwrap().0);

        keys(&mut app).press(KeyCode::ArrowUp);
        app.update();
        assert!(app.world().get::<Velocity>(player).unwrap().0.y > 0.0);
    }
}
