use bevy::asset::RenderAssetUsages;
use bevy::input::ButtonInput;
use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::GameState;
use crate::camera::{WIN_H, WIN_W, canvas_to_world};
use crate::game_logic::{DriveInput, HudSnapshot, RaceMode, RaceSession, default_script};
use crate::lap_record::LapRecordStore;
use crate::render::{Framebuffer, Raster, Sheet, Surface, View, render_scene};
use crate::settings::{RaceSettings, SETTINGS_PATH};

pub const BACKGROUND_SHEET: &str = "background.png";
pub const SPRITE_SHEET: &str = "sprites.png";

/// The running game: simulation session, software canvas and the best lap store.
#[derive(Resource)]
pub struct Race {
    session: RaceSession,
    framebuffer: Framebuffer,
    view: View,
    rng: StdRng,
    lap_record: LapRecordStore,
}

impl Race {
    pub fn hud(&self) -> HudSnapshot {
        self.session.hud()
    }
}

#[derive(Resource)]
struct SheetHandles {
    background: Handle<Image>,
    sprites: Handle<Image>,
}

#[derive(Resource)]
struct Canvas(Handle<Image>);

#[derive(Component)]
struct OverlayText;

pub struct RacePlugin;

impl Plugin for RacePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_race).add_systems(
            Update,
            (
                poll_sheets.run_if(in_state(GameState::Loading)),
                start_race.run_if(in_state(GameState::Waiting)),
                reset_race.run_if(in_state(GameState::Playing)),
                drive_race,
                draw_canvas,
                sync_overlay_text,
                sync_game_state,
            )
                .chain()
                .run_if(resource_exists::<Race>),
        );
    }
}

fn setup_race(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut exit: EventWriter<AppExit>,
) {
    let settings = RaceSettings::load(SETTINGS_PATH).unwrap_or_else(|e| {
        warn!("Using default race settings: {e}");
        RaceSettings::default()
    });

    let lap_record = LapRecordStore::new(&settings.lap_record_path);
    let best_lap_time = lap_record.load().unwrap_or_else(|e| {
        warn!("Ignoring saved lap record {:?}: {e}", lap_record.path());
        None
    });

    let seed = settings.seed.unwrap_or_else(rand::random);
    let session = match RaceSession::new(settings.clone(), default_script(), best_lap_time, seed) {
        Ok(session) => session,
        Err(e) => {
            error!("Could not build the track: {e}");
            exit.write(AppExit::error());
            return;
        }
    };
    info!("Track built with seed {seed}, best lap {best_lap_time:?}");

    let canvas = images.add(Image::new_fill(
        Extent3d {
            width: settings.width,
            height: settings.height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    ));
    commands.spawn((
        Sprite {
            image: canvas.clone(),
            custom_size: Some(Vec2::new(WIN_W, WIN_H)),
            ..default()
        },
        Transform::default(),
    ));
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(0., 0., 10.),
        Visibility::Hidden,
        OverlayText,
    ));

    commands.insert_resource(SheetHandles {
        background: asset_server.load(BACKGROUND_SHEET),
        sprites: asset_server.load(SPRITE_SHEET),
    });
    commands.insert_resource(Canvas(canvas));
    commands.insert_resource(Race {
        session,
        framebuffer: Framebuffer::new(settings.width, settings.height),
        view: View::from_settings(&settings),
        rng: StdRng::seed_from_u64(seed),
        lap_record,
    });
}

/// Decoded pixels of an RGBA8 image, converting other formats first.
fn to_raster(image: &Image) -> Option<Raster> {
    let converted;
    let image = match image.texture_descriptor.format {
        TextureFormat::Rgba8UnormSrgb | TextureFormat::Rgba8Unorm => image,
        _ => {
            converted = image.convert(TextureFormat::Rgba8UnormSrgb)?;
            &converted
        }
    };
    Raster::new(image.width(), image.height(), image.data.clone()?)
}

// Stays in the loading scene until both sheets are decoded.
fn poll_sheets(
    handles: Res<SheetHandles>,
    images: Res<Assets<Image>>,
    asset_server: Res<AssetServer>,
    mut race: ResMut<Race>,
    mut reported: Local<bool>,
) {
    if race.framebuffer.has_sheets() {
        return;
    }
    for handle in [&handles.background, &handles.sprites] {
        if let Some(bevy::asset::LoadState::Failed(e)) = asset_server.get_load_state(handle) {
            if !*reported {
                error!("Could not load {:?}: {e}", handle.path());
                *reported = true;
            }
            return;
        }
    }

    let (Some(background), Some(sprites)) =
        (images.get(&handles.background), images.get(&handles.sprites))
    else {
        return;
    };
    let (Some(background), Some(sprites)) = (to_raster(background), to_raster(sprites)) else {
        if !*reported {
            error!("Sprite sheets are not in a format that converts to RGBA8");
            *reported = true;
        }
        return;
    };

    race.framebuffer.set_sheet(Sheet::Background, background);
    race.framebuffer.set_sheet(Sheet::Sprites, sprites);
    race.session.assets_ready();
}

fn start_race(keys: Res<ButtonInput<KeyCode>>, mut race: ResMut<Race>) {
    if keys.any_just_pressed([KeyCode::Space, KeyCode::Enter]) {
        if let Err(e) = race.session.start() {
            error!("Could not start a race: {e}");
        }
    }
}

fn reset_race(keys: Res<ButtonInput<KeyCode>>, mut race: ResMut<Race>) {
    if keys.any_just_pressed([KeyCode::Escape, KeyCode::KeyR]) {
        if let Err(e) = race.session.reset() {
            error!("Could not reset the race: {e}");
        }
    }
}

fn drive_race(time: Res<Time>, keys: Res<ButtonInput<KeyCode>>, mut race: ResMut<Race>) {
    let input = DriveInput {
        left: keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
        right: keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
        faster: keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]),
        slower: keys.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]),
    };

    let report = race.session.frame(time.delta_secs(), &input);
    if !report.completed_laps.iter().any(|lap| lap.new_best) {
        return;
    }
    if let Some(best) = race.session.best_lap_time() {
        match race.lap_record.save(best) {
            Ok(()) => info!("Saved new best lap {best:.2}s"),
            Err(e) => warn!("Could not save best lap: {e}"),
        }
    }
}

fn draw_canvas(mut race: ResMut<Race>, canvas: Res<Canvas>, mut images: ResMut<Assets<Image>>) {
    let race = &mut *race;
    render_scene(&mut race.framebuffer, &race.session.scene(), &race.view, &mut race.rng);

    let Some(image) = images.get_mut(&canvas.0) else {
        return;
    };
    let pixels = race.framebuffer.pixels();
    match image.data.as_mut() {
        Some(data) if data.len() == pixels.len() => data.copy_from_slice(pixels),
        _ => image.data = Some(pixels.to_vec()),
    }
}

// The framebuffer only records text; bevy draws it over the canvas.
fn sync_overlay_text(
    race: Res<Race>,
    mut overlay: Single<(&mut Text2d, &mut TextFont, &mut Transform, &mut Visibility), With<OverlayText>>,
) {
    let (text, font, transform, visibility) = &mut *overlay;
    let runs = race.framebuffer.text_runs();
    let Some(first) = runs.first() else {
        **visibility = Visibility::Hidden;
        return;
    };

    let joined = runs.iter().map(|run| run.text.as_str()).collect::<Vec<_>>().join("\n");
    if text.0 != joined {
        text.0 = joined;
    }
    let (canvas_w, canvas_h) = (race.framebuffer.width(), race.framebuffer.height());
    let at = canvas_to_world(first.x, first.y, canvas_w, canvas_h);
    transform.translation = at.extend(10.);
    let font_size = first.size * WIN_H / canvas_h;
    if font.font_size != font_size {
        font.font_size = font_size;
    }
    **visibility = Visibility::Visible;
}

fn sync_game_state(
    race: Res<Race>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let wanted = match race.session.mode() {
        RaceMode::Loading => GameState::Loading,
        RaceMode::Waiting => GameState::Waiting,
        RaceMode::Playing => GameState::Playing,
    };
    if *state.get() != wanted {
        info!("Entering {wanted:?}");
        next_state.set(wanted);
    }
}
