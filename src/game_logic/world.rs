use rand::Rng;

use crate::game_logic::{
    BuiltTrack, Car, LapTimer, RoadElement, Segment, Steer, Track, TrackError, build_track,
    increase, percent_remaining, SEGMENT_LENGTH,
};
use crate::settings::RaceSettings;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Camera position along the track; the car sits `player_z` ahead of it.
    pub track_position: f32,
    /// 0 is the road centre, ±1 the road edges.
    pub lateral_offset: f32,
    pub speed: f32,
    pub camera_depth: f32,
    pub player_z: f32,
    /// Steering as last applied, for picking the player sprite.
    pub steer: Steer,
}

impl PlayerState {
    pub fn new(settings: &RaceSettings) -> Self {
        Self {
            track_position: 0.0,
            lateral_offset: 0.0,
            speed: 0.0,
            camera_depth: settings.camera_depth(),
            player_z: settings.player_z(),
            steer: Steer::Straight,
        }
    }
}

/// Horizontal scroll of the three background layers, each in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parallax {
    pub sky: f32,
    pub hill: f32,
    pub tree: f32,
}

/// Everything the simulation writes and the renderer reads.
#[derive(Clone, Debug)]
pub struct World {
    pub track: Track,
    pub cars: Vec<Car>,
    pub player: PlayerState,
    pub lap_timer: LapTimer,
    pub parallax: Parallax,
    pub draw_distance: usize,
}

impl World {
    pub fn new<R: Rng>(
        script: &[RoadElement],
        settings: &RaceSettings,
        best_lap_time: Option<f32>,
        rng: &mut R,
    ) -> Result<Self, TrackError> {
        let player = PlayerState::new(settings);
        let BuiltTrack { track, cars } =
            build_track(script, settings.total_cars, player.player_z, rng)?;
        Ok(Self {
            track,
            cars,
            player,
            lap_timer: LapTimer::new(best_lap_time),
            parallax: Parallax::default(),
            draw_distance: settings.draw_distance,
        })
    }

    pub fn track_length(&self) -> f32 {
        self.track.track_length()
    }

    /// Where the car itself is, as opposed to the camera.
    pub fn player_world_z(&self) -> f32 {
        increase(self.player.track_position, self.player.player_z, self.track_length())
    }

    pub fn player_segment(&self) -> &Segment {
        self.track.find_segment(self.player_world_z())
    }

    pub fn player_percent(&self) -> f32 {
        percent_remaining(self.player_world_z(), SEGMENT_LENGTH)
    }

    /// Road height under the car.
    pub fn player_elevation(&self) -> f32 {
        self.track.elevation_at(self.player_world_z())
    }
}
