//! Debug visualization for the collision layer.
//!
//! Toggle with the 'D' key during play.
//! Shows:
//! - Collision boxes for every body, static or moving
//! - The world bounds bodies are confined to

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::{
    level::WORLD_HALF,
    physics::{Collider, StaticBody},
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugOverlayVisible>();

    // Toggle debug with 'D' key
    app.add_systems(Update, toggle_debug.run_if(input_just_pressed(KeyCode::KeyD)));

    // Draw collision boxes when visible
    app.add_systems(Update, draw_colliders.run_if(debug_visible));
}

/// Resource to track if the collider overlay is visible.
#[derive(Resource, Default)]
pub struct DebugOverlayVisible(pub bool);

fn debug_visible(debug: Res<DebugOverlayVisible>) -> bool {
    debug.0
}

fn toggle_debug(mut debug: ResMut<DebugOverlayVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Collider overlay: {}", state);
}

/// Draw every collision box using Bevy's Gizmos.
fn draw_colliders(mut gizmos: Gizmos, bodies: Query<(&Transform, &Collider, Has<StaticBody>)>) {
    for (transform, collider, is_static) in &bodies {
        let color = if is_static { css::ORANGE } else { css::LIME };
        gizmos.rect_2d(
            Isometry2d::from_translation(transform.translation.truncate()),
            collider.half * 2.0,
            color,
        );
    }

    // The world box everything is confined to
    gizmos.rect_2d(
        Isometry2d::from_translation(Vec2::ZERO),
        WORLD_HALF * 2.0,
        css::WHITE,
    );
}
