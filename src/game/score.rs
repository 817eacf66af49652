//! The running score.

use bevy::prelude::*;

use super::round::RoundState;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Score>();
    app.register_type::<Score>();

    app.add_systems(OnEnter(RoundState::Playing), reset_score);
}

/// Resource tracking the current score. Only ever counts up; a round restart
/// resets it along with everything else.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct Score {
    value: u32,
}

impl Score {
    pub fn add(&mut self, amount: u32) {
        self.value += amount;
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// Reset the score when a round starts.
fn reset_score(mut score: ResMut<Score>) {
    score.reset();
    info!("Score reset");
}
