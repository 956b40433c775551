use bevy::prelude::*;

use crate::game_logic::{HudSnapshot, RaceMode, format_time};
use crate::race_plugin::Race;

#[derive(Component)]
pub struct HudRoot;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudField {
    Speed,
    CurrentLap,
    LastLap,
    FastestLap,
}

impl HudField {
    const ALL: [HudField; 4] = [
        HudField::Speed,
        HudField::CurrentLap,
        HudField::LastLap,
        HudField::FastestLap,
    ];

    fn label(self, hud: &HudSnapshot) -> String {
        let lap = |time: Option<f32>| time.map_or_else(|| "-".to_string(), format_time);
        match self {
            HudField::Speed => format!("Speed: {} mph", hud.speed_mph()),
            HudField::CurrentLap => format!("Time: {}", format_time(hud.current_lap_time)),
            HudField::LastLap => format!("Last Lap: {}", lap(hud.last_lap_time)),
            HudField::FastestLap => format!("Fastest Lap: {}", lap(hud.best_lap_time)),
        }
    }
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                // Top left corner of screen
                left: Val::Px(20.0),
                top: Val::Px(20.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)), // Semi-transparent black
            Visibility::Hidden,
            HudRoot,
        ))
        .with_children(|parent| {
            for field in HudField::ALL {
                parent.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 22.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    field,
                ));
            }
        });
}

// The HUD is race chrome: shown while playing, hidden on the waiting screen
pub fn update_hud(
    race: Res<Race>,
    mut root: Single<&mut Visibility, With<HudRoot>>,
    mut fields: Query<(&mut Text, &HudField)>,
) {
    let hud = race.hud();
    let wanted = if hud.mode == RaceMode::Playing {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if **root != wanted {
        **root = wanted;
    }

    for (mut text, field) in fields.iter_mut() {
        let label = field.label(&hud);
        if text.0 != label {
            text.0 = label;
        }
    }
}
