//! The in-game HUD: a score label and the restart prompt.
//!
//! Plain UI nodes refreshed from the `Score` resource; the prompt stays on
//! screen the whole round.

use bevy::prelude::*;

use super::{GameSystems, round::RoundState, score::Score};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(RoundState::Playing), spawn_hud);

    app.add_systems(Update, update_score_label.in_set(GameSystems::Present));
}

/// Black text, readable against the sky.
const LABEL_TEXT: Color = Color::BLACK;

/// Marker for the score text node.
#[derive(Component)]
struct ScoreLabel;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("Score Label"),
        ScoreLabel,
        Text::new("Score: 0"),
        TextFont::from_font_size(32.0),
        TextColor(LABEL_TEXT),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(16.0),
            ..default()
        },
        DespawnOnExit(RoundState::GameOver),
    ));

    commands.spawn((
        Name::new("Restart Prompt"),
        Text::new("Type space to restart."),
        TextFont::from_font_size(24.0),
        TextColor(LABEL_TEXT),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(56.0),
            ..default()
        },
        DespawnOnExit(RoundState::GameOver),
    ));
}

/// Re-render the label whenever the score changes.
fn update_score_label(score: Res<Score>, mut labels: Query<&mut Text, With<ScoreLabel>>) {
    if !score.is_changed() {
        return;
    }
    for mut text in &mut labels {
        text.0 = format!("Score: {}", score.value());
    }
}
