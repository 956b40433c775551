mod camera;
mod game_logic;
mod hud;
mod lap_record;
mod race_plugin;
mod render;
mod settings;

use bevy::{prelude::*, window::PresentMode};
use camera::{camera_setup, WIN_H, WIN_W};
use hud::{spawn_hud, update_hud};
use race_plugin::{Race, RacePlugin};

/// Mirrors the race session's mode so systems can gate on it.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Loading,
    Waiting,
    Playing,
}

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Road Racer".into(),
                        resolution: (WIN_W, WIN_H).into(),
                        present_mode: PresentMode::AutoVsync,
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(ClearColor(Color::BLACK))
        .init_state::<GameState>()
        .add_plugins(RacePlugin)
        .add_systems(Startup, (camera_setup, spawn_hud))
        .add_systems(Update, update_hud.run_if(resource_exists::<Race>))
        .run();
}
