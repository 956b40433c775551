use std::f32::consts::PI;

use rand::Rng;

use crate::game_logic::{
    BackgroundLayer, ColorBand, HILL_SPEED, MAX_SPEED, SEGMENT_LENGTH, SKY_SPEED, SPRITE_SCALE,
    Scene, Slope, SpriteKind, SpriteRect, TREE_SPEED, World, exponential_fog, interpolate,
    percent_remaining, player_sprite,
};
use crate::render::{
    Camera, FOG, Projected, SKY, ScreenRect, Sheet, Surface, TEXT, band_colors, project,
};
use crate::settings::RaceSettings;

/// The parts of the settings the rasterizer needs every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub road_width: f32,
    pub lanes: u32,
    pub camera_height: f32,
    pub fog_density: f32,
}

impl View {
    pub fn from_settings(settings: &RaceSettings) -> Self {
        Self {
            road_width: settings.road_width,
            lanes: settings.lanes.max(1),
            camera_height: settings.camera_height,
            fog_density: settings.fog_density,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderReport {
    /// Segment indices whose road geometry was drawn, in submission order.
    pub drawn_segments: Vec<usize>,
}

// One lookahead slot after the projection pass.
struct Slice {
    segment: usize,
    near: Option<Projected>,
    far: Option<Projected>,
    clip: f32,
    fog: f32,
    road: bool,
}

/// Draw whatever `scene` asks for.
pub fn render_scene<S: Surface, R: Rng>(
    surface: &mut S,
    scene: &Scene,
    view: &View,
    rng: &mut R,
) -> RenderReport {
    match scene {
        Scene::Loading { time } => {
            render_loading(surface, *time);
            RenderReport::default()
        }
        Scene::Idle { world, time } => render_idle(surface, world, view, *time),
        Scene::Racing { world } => render_race(surface, world, view, rng),
    }
}

/// A race frame. The player sprite jitters with speed.
pub fn render_race<S: Surface, R: Rng>(
    surface: &mut S,
    world: &World,
    view: &View,
    rng: &mut R,
) -> RenderReport {
    let resolution = surface.height() / 480.0;
    let speed_percent = world.player.speed / MAX_SPEED;
    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let bounce = 1.5 * rng.random::<f32>() * speed_percent * resolution * direction;
    draw_world(surface, world, view, bounce)
}

/// The waiting screen: the track from the start line with the car idling.
pub fn render_idle<S: Surface>(surface: &mut S, world: &World, view: &View, time: f32) -> RenderReport {
    let resolution = surface.height() / 480.0;
    let bounce = (2.0 * time).sin() * 4.0 * resolution;
    let report = draw_world(surface, world, view, bounce);
    let (width, height) = (surface.width(), surface.height());
    surface.fill_text("Press SPACE to race", width / 2.0, height / 3.0, 32.0 * resolution, TEXT);
    report
}

pub fn render_loading<S: Surface>(surface: &mut S, time: f32) {
    let (width, height) = (surface.width(), surface.height());
    let resolution = height / 480.0;
    surface.clear(FOG);
    let start = (time * 4.0) % (2.0 * PI);
    surface.fill_arc(width / 2.0, height / 2.0, 20.0 * resolution, start, start + 1.5 * PI, TEXT);
    surface.fill_text("Loading...", width / 2.0, height / 2.0 + 50.0 * resolution, 24.0 * resolution, TEXT);
}

fn draw_world<S: Surface>(surface: &mut S, world: &World, view: &View, bounce: f32) -> RenderReport {
    let mut report = RenderReport::default();
    let (width, height) = (surface.width(), surface.height());
    let resolution = height / 480.0;
    let track = &world.track;
    let player = &world.player;
    let position = player.track_position;
    let track_length = world.track_length();

    let base = track.find_segment(position);
    let base_percent = percent_remaining(position, SEGMENT_LENGTH);
    let player_segment = world.player_segment();
    let player_y = world.player_elevation();

    surface.clear(SKY);
    draw_background(surface, BackgroundLayer::Sky, world.parallax.sky, resolution * SKY_SPEED * player_y);
    draw_background(surface, BackgroundLayer::Hills, world.parallax.hill, resolution * HILL_SPEED * player_y);
    draw_background(surface, BackgroundLayer::Trees, world.parallax.tree, resolution * TREE_SPEED * player_y);

    // Near to far: project, bend the ribbon and find what is hidden.
    let draw_distance = world.draw_distance.min(track.len());
    let eye_y = player_y + view.camera_height;
    let mut slices = Vec::with_capacity(draw_distance);
    let mut max_y = height;
    let mut x = 0.0;
    let mut dx = -(base.curve * base_percent);

    for n in 0..draw_distance {
        let segment = &track.segments[(base.index + n) % track.len()];
        let looped = segment.index < base.index;
        let eye = |shift: f32| Camera {
            x: player.lateral_offset * view.road_width - shift,
            y: eye_y,
            z: position - if looped { track_length } else { 0.0 },
            depth: player.camera_depth,
        };
        let near = project(0.0, segment.p1.world_y, segment.p1.world_z, &eye(x), width, height, view.road_width);
        let far = project(0.0, segment.p2.world_y, segment.p2.world_z, &eye(x + dx), width, height, view.road_width);
        x += dx;
        dx += segment.curve;

        let clip = max_y;
        let road = match (near, far) {
            (Some(near), Some(far)) if far.y < near.y && far.y < max_y => {
                max_y = near.y;
                true
            }
            _ => false,
        };
        slices.push(Slice {
            segment: segment.index,
            near,
            far,
            clip,
            fog: exponential_fog(n as f32 / draw_distance as f32, view.fog_density),
            road,
        });
    }

    // Far to near: each segment's road, then whatever stands on it.
    let mut player_drawn = false;
    for slice in slices.iter().rev() {
        let segment = &track.segments[slice.segment];
        if let (true, Some(near), Some(far)) = (slice.road, slice.near, slice.far) {
            draw_segment(surface, view.lanes, &near, &far, slice.fog, segment.color);
            report.drawn_segments.push(segment.index);
        }

        if let (Some(near), Some(far)) = (slice.near, slice.far) {
            for car in segment.cars.iter().filter_map(|&id| world.cars.get(id)) {
                let scale = interpolate(near.scale, far.scale, car.percent);
                let sprite_x = interpolate(near.x, far.x, car.percent)
                    + scale * car.offset * view.road_width * width / 2.0;
                let sprite_y = interpolate(near.y, far.y, car.percent);
                draw_sprite(surface, view, car.sprite, scale, sprite_x, sprite_y, -0.5, -1.0, Some(slice.clip));
            }
        }

        if let Some(near) = slice.near {
            for placement in &segment.sprites {
                let sprite_x = near.x + near.scale * placement.offset * view.road_width * width / 2.0;
                let offset_x = if placement.offset < 0.0 { -1.0 } else { 0.0 };
                draw_sprite(surface, view, placement.sprite, near.scale, sprite_x, near.y, offset_x, -1.0, Some(slice.clip));
            }
        }

        if segment.index == player_segment.index {
            draw_player(surface, world, view, bounce);
            player_drawn = true;
        }
    }
    if !player_drawn {
        draw_player(surface, world, view, bounce);
    }
    report
}

fn draw_player<S: Surface>(surface: &mut S, world: &World, view: &View, bounce: f32) {
    let (width, height) = (surface.width(), surface.height());
    let player = &world.player;
    let segment = world.player_segment();
    let eye_y = world.player_elevation() + view.camera_height;
    let camera_y = interpolate(
        segment.p1.world_y - eye_y,
        segment.p2.world_y - eye_y,
        world.player_percent(),
    );
    let scale = player.camera_depth / player.player_z;
    let y = height / 2.0 - scale * camera_y * height / 2.0;
    let sprite = player_sprite(player.steer, Slope::from_rise(segment.p2.world_y - segment.p1.world_y));
    draw_sprite(surface, view, sprite, scale, width / 2.0, y + bounce, -0.5, -1.0, None);
}

/// Rumble strip width for a projected road half-width.
fn rumble_width(projected_road_width: f32, lanes: u32) -> f32 {
    projected_road_width / (2 * lanes).max(6) as f32
}

fn lane_marker_width(projected_road_width: f32, lanes: u32) -> f32 {
    projected_road_width / (8 * lanes).max(32) as f32
}

fn draw_segment<S: Surface>(
    surface: &mut S,
    lanes: u32,
    near: &Projected,
    far: &Projected,
    fog: f32,
    band: ColorBand,
) {
    let width = surface.width();
    let colors = band_colors(band);
    let (x1, y1, w1) = (near.x, near.y, near.w);
    let (x2, y2, w2) = (far.x, far.y, far.w);
    let r1 = rumble_width(w1, lanes);
    let r2 = rumble_width(w2, lanes);

    surface.fill_rect(ScreenRect::new(0.0, y2, width, y1 - y2), colors.grass);
    surface.fill_polygon(&[(x1 - w1 - r1, y1), (x1 - w1, y1), (x2 - w2, y2), (x2 - w2 - r2, y2)], colors.rumble);
    surface.fill_polygon(&[(x1 + w1 + r1, y1), (x1 + w1, y1), (x2 + w2, y2), (x2 + w2 + r2, y2)], colors.rumble);
    surface.fill_polygon(&[(x1 - w1, y1), (x1 + w1, y1), (x2 + w2, y2), (x2 - w2, y2)], colors.road);

    if let Some(lane) = colors.lane {
        let l1 = lane_marker_width(w1, lanes);
        let l2 = lane_marker_width(w2, lanes);
        let lane_w1 = w1 * 2.0 / lanes as f32;
        let lane_w2 = w2 * 2.0 / lanes as f32;
        for n in 1..lanes {
            let lane_x1 = x1 - w1 + lane_w1 * n as f32;
            let lane_x2 = x2 - w2 + lane_w2 * n as f32;
            surface.fill_polygon(
                &[
                    (lane_x1 - l1 / 2.0, y1),
                    (lane_x1 + l1 / 2.0, y1),
                    (lane_x2 + l2 / 2.0, y2),
                    (lane_x2 - l2 / 2.0, y2),
                ],
                lane,
            );
        }
    }

    if fog < 1.0 {
        surface.fill_rect(ScreenRect::new(0.0, y2, width, y1 - y2), FOG.with_alpha(1.0 - fog));
    }
}

/// One background layer, scrolled by `rotation` in `[0, 1)` and wrapped with a
/// second blit when the visible window runs off the end of the strip.
fn draw_background<S: Surface>(surface: &mut S, layer: BackgroundLayer, rotation: f32, offset: f32) {
    let (width, height) = (surface.width(), surface.height());
    let rect = layer.rect();
    let image_w = rect.w / 2.0;
    let source_x = rect.x + (rect.w * rotation).floor();
    let source_w = image_w.min(rect.x + rect.w - source_x);
    let dest_w = (width * (source_w / image_w)).floor();

    surface.blit(
        Sheet::Background,
        SpriteRect::new(source_x, rect.y, source_w, rect.h),
        ScreenRect::new(0.0, offset, dest_w, height),
    );
    if source_w < image_w {
        surface.blit(
            Sheet::Background,
            SpriteRect::new(rect.x, rect.y, image_w - source_w, rect.h),
            ScreenRect::new(dest_w - 1.0, offset, width - dest_w, height),
        );
    }
}

/// Billboard blit. `offset_x`/`offset_y` shift by fractions of the sprite size
/// (-0.5, -1 anchors bottom centre); rows below `clip_y` are cut off.
#[allow(clippy::too_many_arguments)]
fn draw_sprite<S: Surface>(
    surface: &mut S,
    view: &View,
    sprite: SpriteKind,
    scale: f32,
    x: f32,
    y: f32,
    offset_x: f32,
    offset_y: f32,
    clip_y: Option<f32>,
) {
    let rect = sprite.rect();
    let half_width = surface.width() / 2.0;
    let dest_w = rect.w * scale * half_width * (SPRITE_SCALE * view.road_width);
    let dest_h = rect.h * scale * half_width * (SPRITE_SCALE * view.road_width);
    let dest_x = x + dest_w * offset_x;
    let dest_y = y + dest_h * offset_y;
    let clip_h = clip_y.map_or(0.0, |clip| (dest_y + dest_h - clip).max(0.0));
    if !(clip_h < dest_h) {
        return;
    }
    surface.blit(
        Sheet::Sprites,
        SpriteRect::new(rect.x, rect.y, rect.w, rect.h - rect.h * clip_h / dest_h),
        ScreenRect::new(dest_x, dest_y, dest_w, dest_h - clip_h),
    );
}
