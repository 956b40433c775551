/// Camera position in world space plus its depth (distance to the projection plane).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub depth: f32,
}

/// A world point after projection onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub camera_y: f32,
    pub camera_z: f32,
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    /// Projected road half-width in pixels.
    pub w: f32,
}

/// Project a world point, or `None` when it is at or behind the near plane.
///
/// Nothing closer than `camera.depth` is divided by, so screen coordinates
/// stay finite.
pub fn project(
    world_x: f32,
    world_y: f32,
    world_z: f32,
    camera: &Camera,
    width: f32,
    height: f32,
    road_width: f32,
) -> Option<Projected> {
    let camera_x = world_x - camera.x;
    let camera_y = world_y - camera.y;
    let camera_z = world_z - camera.z;
    if !(camera_z > camera.depth) {
        return None;
    }
    let scale = camera.depth / camera_z;
    let projected = Projected {
        camera_y,
        camera_z,
        scale,
        x: (width / 2.0 + scale * camera_x * width / 2.0).round(),
        y: (height / 2.0 - scale * camera_y * height / 2.0).round(),
        w: (scale * road_width * width / 2.0).round(),
    };
    (projected.x.is_finite() && projected.y.is_finite() && projected.w.is_finite())
        .then_some(projected)
}
