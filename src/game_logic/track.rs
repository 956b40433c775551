use bevy::log::info;
use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::game_logic::{
    BILLBOARDS, CURVE_EASY, CURVE_MEDIUM, CURVE_NONE, Car, HILL_HIGH, HILL_LOW, HILL_MEDIUM,
    HILL_NONE, LENGTH_LONG, LENGTH_MEDIUM, LENGTH_SHORT, PLANTS, RUMBLE_LENGTH, SEGMENT_LENGTH,
    SpriteKind, ease_in, ease_in_out, interpolate, percent_remaining, seed_traffic,
};

#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    #[error("track script has no elements")]
    EmptyScript,
    #[error("track element {index} expands to zero segments")]
    EmptyElement { index: usize },
    #[error("track element {index} has a non-finite curve or height")]
    NonFiniteElement { index: usize },
    #[error("track has {segments} segments but needs at least {required}")]
    TooShort { segments: usize, required: usize },
}

/// One macro element of a track script.
///
/// Every element expands into one or more enter/hold/leave runs. Heights are in
/// units of `SEGMENT_LENGTH`.
#[derive(Clone, Debug, PartialEq)]
pub enum RoadElement {
    Road {
        enter: usize,
        hold: usize,
        leave: usize,
        curve: f32,
        height: f32,
    },
    Straight { length: usize },
    Hill { length: usize, height: f32 },
    Curve { length: usize, curve: f32, height: f32 },
    LowRollingHills { length: usize, height: f32 },
    SCurves,
    Bumps,
    DownhillToEnd { length: usize },
}

/// The classic course: rolling hills, S-curves, bumps, and a long downhill home.
pub fn default_script() -> Vec<RoadElement> {
    use RoadElement::*;
    vec![
        Straight { length: LENGTH_SHORT },
        LowRollingHills { length: LENGTH_SHORT, height: HILL_LOW },
        SCurves,
        Curve { length: LENGTH_MEDIUM, curve: CURVE_MEDIUM, height: HILL_LOW },
        Bumps,
        LowRollingHills { length: LENGTH_SHORT, height: HILL_LOW },
        Curve { length: LENGTH_LONG * 2, curve: CURVE_MEDIUM, height: HILL_MEDIUM },
        Straight { length: LENGTH_MEDIUM },
        Hill { length: LENGTH_MEDIUM, height: HILL_HIGH },
        SCurves,
        Curve { length: LENGTH_LONG, curve: -CURVE_MEDIUM, height: HILL_NONE },
        Hill { length: LENGTH_LONG, height: HILL_HIGH },
        Curve { length: LENGTH_LONG, curve: CURVE_MEDIUM, height: -HILL_LOW },
        Bumps,
        Hill { length: LENGTH_LONG, height: -HILL_MEDIUM },
        Straight { length: LENGTH_MEDIUM },
        SCurves,
        DownhillToEnd { length: 200 },
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorBand {
    Light,
    Dark,
    Start,
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPoint {
    pub world_y: f32,
    pub world_z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePlacement {
    pub sprite: SpriteKind,
    pub offset: f32,
}

#[derive(Clone, Debug)]
pub struct Segment {
    pub index: usize,
    pub p1: WorldPoint,
    pub p2: WorldPoint,
    pub curve: f32,
    pub color: ColorBand,
    pub sprites: Vec<SpritePlacement>,
    // ids into the world's car list; each car also records its segment
    pub cars: Vec<usize>,
}

/// A closed loop of road segments.
#[derive(Clone, Debug)]
pub struct Track {
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn track_length(&self) -> f32 {
        self.segments.len() as f32 * SEGMENT_LENGTH
    }

    pub fn segment_index(&self, z: f32) -> usize {
        if self.segments.is_empty() {
            return 0;
        }
        let raw = (z / SEGMENT_LENGTH).floor();
        if raw.is_finite() && raw >= 0.0 {
            raw as usize % self.segments.len()
        } else {
            0
        }
    }

    pub fn find_segment(&self, z: f32) -> &Segment {
        &self.segments[self.segment_index(z)]
    }

    /// Road elevation at track position `z`, interpolated within its segment.
    pub fn elevation_at(&self, z: f32) -> f32 {
        let segment = self.find_segment(z);
        let percent = percent_remaining(z, SEGMENT_LENGTH);
        interpolate(segment.p1.world_y, segment.p2.world_y, percent)
    }
}

pub struct BuiltTrack {
    pub track: Track,
    pub cars: Vec<Car>,
}

/// Compile `script` into a fresh track, scatter decorations and seed traffic.
pub fn build_track<R: Rng>(
    script: &[RoadElement],
    total_cars: usize,
    player_z: f32,
    rng: &mut R,
) -> Result<BuiltTrack, TrackError> {
    validate_script(script)?;

    let mut builder = TrackBuilder::default();
    for element in script {
        builder.add_element(element);
    }
    let mut segments = builder.segments;

    let start_index = (player_z / SEGMENT_LENGTH).floor().max(0.0) as usize;
    let required = (start_index + 4).max(RUMBLE_LENGTH);
    if segments.len() < required {
        return Err(TrackError::TooShort {
            segments: segments.len(),
            required,
        });
    }

    scatter_sprites(&mut segments, rng);

    segments[start_index + 2].color = ColorBand::Start;
    segments[start_index + 3].color = ColorBand::Start;
    let last = segments.len() - 1;
    for n in 0..RUMBLE_LENGTH {
        segments[last - n].color = ColorBand::Finish;
    }

    let mut track = Track { segments };
    let cars = seed_traffic(&mut track, total_cars, rng);

    info!(
        "Built track: {} segments, length {}, {} cars",
        track.len(),
        track.track_length(),
        cars.len()
    );

    Ok(BuiltTrack { track, cars })
}

fn validate_script(script: &[RoadElement]) -> Result<(), TrackError> {
    if script.is_empty() {
        return Err(TrackError::EmptyScript);
    }
    for (index, element) in script.iter().enumerate() {
        let (segments, values) = match *element {
            RoadElement::Road { enter, hold, leave, curve, height } => {
                (enter + hold + leave, vec![curve, height])
            }
            RoadElement::Straight { length } => (length, vec![]),
            RoadElement::Hill { length, height } => (length, vec![height]),
            RoadElement::Curve { length, curve, height } => (length, vec![curve, height]),
            RoadElement::LowRollingHills { length, height } => (length, vec![height]),
            RoadElement::SCurves | RoadElement::Bumps => (1, vec![]),
            RoadElement::DownhillToEnd { length } => (length, vec![]),
        };
        if segments == 0 {
            return Err(TrackError::EmptyElement { index });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TrackError::NonFiniteElement { index });
        }
    }
    Ok(())
}

// Each build owns its own builder, so nothing leaks between builds.
#[derive(Default)]
struct TrackBuilder {
    segments: Vec<Segment>,
}

impl TrackBuilder {
    fn last_y(&self) -> f32 {
        self.segments.last().map_or(0.0, |s| s.p2.world_y)
    }

    fn add_segment(&mut self, curve: f32, y: f32) {
        let n = self.segments.len();
        let color = if (n / RUMBLE_LENGTH) % 2 == 1 {
            ColorBand::Dark
        } else {
            ColorBand::Light
        };
        self.segments.push(Segment {
            index: n,
            p1: WorldPoint {
                world_y: self.last_y(),
                world_z: n as f32 * SEGMENT_LENGTH,
            },
            p2: WorldPoint {
                world_y: y,
                world_z: (n + 1) as f32 * SEGMENT_LENGTH,
            },
            curve,
            color,
            sprites: Vec::new(),
            cars: Vec::new(),
        });
    }

    fn add_road(&mut self, enter: usize, hold: usize, leave: usize, curve: f32, height: f32) {
        let start_y = self.last_y();
        let end_y = start_y + height * SEGMENT_LENGTH;
        let total = (enter + hold + leave) as f32;

        for n in 0..enter {
            self.add_segment(
                ease_in(0.0, curve, n as f32 / enter as f32),
                ease_in_out(start_y, end_y, n as f32 / total),
            );
        }
        for n in 0..hold {
            self.add_segment(curve, ease_in_out(start_y, end_y, (enter + n) as f32 / total));
        }
        for n in 0..leave {
            self.add_segment(
                ease_in_out(curve, 0.0, n as f32 / leave as f32),
                ease_in_out(start_y, end_y, (enter + hold + n) as f32 / total),
            );
        }
    }

    fn add_element(&mut self, element: &RoadElement) {
        match *element {
            RoadElement::Road { enter, hold, leave, curve, height } => {
                self.add_road(enter, hold, leave, curve, height)
            }
            RoadElement::Straight { length } => self.add_road(length, length, length, 0.0, 0.0),
            RoadElement::Hill { length, height } => {
                self.add_road(length, length, length, 0.0, height)
            }
            RoadElement::Curve { length, curve, height } => {
                self.add_road(length, length, length, curve, height)
            }
            RoadElement::LowRollingHills { length: n, height } => {
                self.add_road(n, n, n, 0.0, height / 2.0);
                self.add_road(n, n, n, 0.0, -height);
                self.add_road(n, n, n, CURVE_EASY, height);
                self.add_road(n, n, n, 0.0, 0.0);
                self.add_road(n, n, n, -CURVE_EASY, height / 2.0);
                self.add_road(n, n, n, 0.0, 0.0);
            }
            RoadElement::SCurves => {
                let n = LENGTH_MEDIUM;
                self.add_road(n, n, n, -CURVE_EASY, HILL_NONE);
                self.add_road(n, n, n, CURVE_MEDIUM, HILL_MEDIUM);
                self.add_road(n, n, n, CURVE_EASY, -HILL_LOW);
                self.add_road(n, n, n, -CURVE_EASY, HILL_MEDIUM);
                self.add_road(n, n, n, -CURVE_MEDIUM, -HILL_MEDIUM);
            }
            RoadElement::Bumps => {
                for height in [5.0, -2.0, -5.0, 8.0, 5.0, -7.0, 5.0, -2.0] {
                    self.add_road(10, 10, 10, CURVE_NONE, height);
                }
            }
            RoadElement::DownhillToEnd { length } => {
                let height = -self.last_y() / SEGMENT_LENGTH;
                self.add_road(length, length, length, -CURVE_EASY, height);
            }
        }
    }
}

fn add_sprite(segments: &mut [Segment], n: usize, sprite: SpriteKind, offset: f32) {
    if let Some(segment) = segments.get_mut(n) {
        segment.sprites.push(SpritePlacement { sprite, offset });
    }
}

fn random_side<R: Rng>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

fn random_plant<R: Rng>(rng: &mut R) -> SpriteKind {
    *PLANTS.choose(rng).unwrap_or(&SpriteKind::Bush1)
}

/// Canyon-like palm clusters and billboards early, roadside variety later.
fn scatter_sprites<R: Rng>(segments: &mut [Segment], rng: &mut R) {
    use SpriteKind::*;
    let len = segments.len();

    let intro = [
        Billboard07, Billboard06, Billboard08, Billboard09, Billboard01, Billboard02,
        Billboard03, Billboard04, Billboard05,
    ];
    for (i, sprite) in intro.into_iter().enumerate() {
        add_sprite(segments, 20 + i * 20, sprite, -1.0);
    }

    add_sprite(segments, 240, Billboard07, -1.2);
    add_sprite(segments, 240, Billboard06, 1.2);
    if len > 25 {
        add_sprite(segments, len - 25, Billboard07, -1.2);
        add_sprite(segments, len - 25, Billboard06, 1.2);
    }

    let mut n = 10;
    while n < 200 {
        add_sprite(segments, n, PalmTree, 0.5 + rng.random::<f32>() * 0.5);
        add_sprite(segments, n, PalmTree, 1.0 + rng.random::<f32>() * 2.0);
        n += 4 + n / 100;
    }

    for n in (250..1000).step_by(5) {
        add_sprite(segments, n, Column, 1.1);
        add_sprite(segments, n + rng.random_range(0..=5), Tree1, -1.0 - rng.random::<f32>() * 2.0);
        add_sprite(segments, n + rng.random_range(0..=5), Tree2, -1.0 - rng.random::<f32>() * 2.0);
    }

    for n in (200..len).step_by(3) {
        let sprite = random_plant(rng);
        let offset = random_side(rng) * (2.0 + rng.random::<f32>() * 5.0);
        add_sprite(segments, n, sprite, offset);
    }

    let mut n = 1000;
    while n + 50 < len {
        let side = random_side(rng);
        let billboard = *BILLBOARDS.choose(rng).unwrap_or(&Billboard01);
        add_sprite(segments, n + rng.random_range(0..=50), billboard, -side);
        for _ in 0..20 {
            let sprite = random_plant(rng);
            let offset = side * (1.5 + rng.random::<f32>());
            add_sprite(segments, n + rng.random_range(0..=50), sprite, offset);
        }
        n += 100;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const PLAYER_Z: f32 = 839.1;

    fn build(script: &[RoadElement], seed: u64) -> Result<BuiltTrack, TrackError> {
        let mut rng = StdRng::seed_from_u64(seed);
        build_track(script, 50, PLAYER_Z, &mut rng)
    }

    #[test]
    fn test_default_track_segment_count() {
        let built = build(&default_script(), 1).unwrap();
        assert_eq!(built.track.len(), 6705);
        assert_eq!(built.track.track_length(), 6705.0 * SEGMENT_LENGTH);
        assert_eq!(built.cars.len(), 50);
    }

    #[test]
    fn test_segment_count_is_deterministic_across_builds() {
        let script = default_script();
        let a = build(&script, 1).unwrap();
        let b = build(&script, 2).unwrap();
        assert_eq!(a.track.len(), b.track.len());
        // indices restart at zero for each build
        assert_eq!(b.track.segments[0].index, 0);
    }

    #[test]
    fn test_same_seed_same_decorations() {
        let script = default_script();
        let a = build(&script, 9).unwrap();
        let b = build(&script, 9).unwrap();
        for (sa, sb) in a.track.segments.iter().zip(b.track.segments.iter()) {
            assert_eq!(sa.sprites, sb.sprites);
        }
    }

    #[test]
    fn test_world_z_and_elevation_continuity() {
        let built = build(&default_script(), 3).unwrap();
        let segments = &built.track.segments;
        for (n, segment) in segments.iter().enumerate() {
            assert_eq!(segment.p1.world_z, n as f32 * SEGMENT_LENGTH);
            assert_eq!(segment.p2.world_z, (n + 1) as f32 * SEGMENT_LENGTH);
        }
        for pair in segments.windows(2) {
            assert_eq!(pair[0].p2.world_y, pair[1].p1.world_y);
        }
    }

    #[test]
    fn test_transitions_are_smooth() {
        let built = build(&default_script(), 3).unwrap();
        let segments = &built.track.segments;
        for pair in segments.windows(2) {
            assert!((pair[1].curve - pair[0].curve).abs() <= 0.2);
        }
        for segment in segments {
            assert!((segment.p2.world_y - segment.p1.world_y).abs() <= 130.0);
        }
    }

    #[test]
    fn test_loop_closes_near_ground_level() {
        let built = build(&default_script(), 3).unwrap();
        let last = built.track.segments.last().unwrap();
        assert!(last.p2.world_y.abs() < 10.0);
    }

    #[test]
    fn test_start_and_finish_bands() {
        let built = build(&default_script(), 3).unwrap();
        let segments = &built.track.segments;
        let start = (PLAYER_Z / SEGMENT_LENGTH).floor() as usize;
        assert_eq!(segments[start + 2].color, ColorBand::Start);
        assert_eq!(segments[start + 3].color, ColorBand::Start);
        for segment in &segments[segments.len() - RUMBLE_LENGTH..] {
            assert_eq!(segment.color, ColorBand::Finish);
        }
        assert_eq!(segments[0].color, ColorBand::Light);
        assert_eq!(segments[RUMBLE_LENGTH].color, ColorBand::Dark);
    }

    #[test]
    fn test_rejects_empty_and_malformed_scripts() {
        assert!(matches!(build(&[], 1), Err(TrackError::EmptyScript)));
        let zero = [RoadElement::Straight { length: 0 }];
        assert!(matches!(build(&zero, 1), Err(TrackError::EmptyElement { index: 0 })));
        let nan = [
            RoadElement::Straight { length: 10 },
            RoadElement::Hill { length: 10, height: f32::NAN },
        ];
        assert!(matches!(build(&nan, 1), Err(TrackError::NonFiniteElement { index: 1 })));
        let tiny = [RoadElement::Road { enter: 1, hold: 1, leave: 1, curve: 0.0, height: 0.0 }];
        assert!(matches!(build(&tiny, 1), Err(TrackError::TooShort { .. })));
    }

    #[test]
    fn test_loop_closure_same_segment_and_elevation() {
        let built = build(&default_script(), 4).unwrap();
        let track = &built.track;
        let length = track.track_length();
        for position in [0.0, 1234.5, 250_000.0, length - 1.0] {
            let wrapped = crate::game_logic::increase(position, length, length);
            assert_eq!(track.segment_index(position), track.segment_index(wrapped));
            assert!((track.elevation_at(position) - track.elevation_at(wrapped)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_short_custom_script_skips_out_of_range_sprites() {
        let script = [RoadElement::Straight { length: 10 }];
        let built = build(&script, 5).unwrap();
        assert_eq!(built.track.len(), 30);
        let placed: usize = built.track.segments.iter().map(|s| s.sprites.len()).sum();
        assert!(placed > 0);
    }
}
