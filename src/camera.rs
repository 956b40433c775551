use bevy::prelude::*;
use bevy::render::camera::{Projection, ScalingMode};

// Logical window size; the race canvas is stretched to fill it
pub const WIN_W: f32 = 1024.;
pub const WIN_H: f32 = 768.;

pub fn camera_setup(mut commands: Commands) {
    let mut projection = OrthographicProjection::default_2d();

    // keep the whole canvas in view if the window is resized
    projection.scaling_mode = ScalingMode::Fixed {
        width: WIN_W,
        height: WIN_H,
    };

    commands
        .spawn(Camera2d)
        .insert(Projection::Orthographic(projection));
}

/// Map a point on a `canvas_w` x `canvas_h` pixel canvas (origin top-left) to
/// world space, where the canvas spans the window centred on the origin.
pub fn canvas_to_world(x: f32, y: f32, canvas_w: f32, canvas_h: f32) -> Vec2 {
    Vec2::new(
        (x / canvas_w - 0.5) * WIN_W,
        (0.5 - y / canvas_h) * WIN_H,
    )
}
