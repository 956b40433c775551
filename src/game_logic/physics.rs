use crate::game_logic::{
    ACCEL, BREAKING, CENTRIFUGAL, CRASH_SPEED, CompletedLap, DECEL, HILL_SPEED, MAX_LATERAL_OFFSET,
    MAX_SPEED, OFF_ROAD_DECEL, OFF_ROAD_LIMIT, PlayerFootprint, SEGMENT_LENGTH, SKY_SPEED,
    SpriteKind, Steer, TREE_SPEED, World, accelerate, hits_scenery, hits_traffic, increase,
    update_traffic,
};

/// Held/not-held state of the driving keys, sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub left: bool,
    pub right: bool,
    pub faster: bool,
    pub slower: bool,
}

/// What the player ran into this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Impact {
    Scenery { segment: usize },
    Traffic { car_speed: f32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub completed_lap: Option<CompletedLap>,
    pub impact: Option<Impact>,
}

/// Advance the world by one fixed tick.
///
/// Traffic moves first, then the player: position, steering with centrifugal
/// drift, speed, off-road and collision penalties, parallax, and finally lap
/// timing. Nothing here can fail; crashes are just slower, repositioned cars.
pub fn step(world: &mut World, input: &DriveInput, dt: f32) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let track_length = world.track_length();
    let player_z = world.player.player_z;

    let player_segment = world.track.segment_index(world.player.track_position + player_z);
    let segment_curve = world.track.segments[player_segment].curve;
    let player_w = SpriteKind::PlayerStraight.world_width();
    let speed_percent = world.player.speed / MAX_SPEED;
    let dx = dt * 2.0 * speed_percent;
    let start_position = world.player.track_position;

    let footprint = PlayerFootprint {
        segment: player_segment,
        offset: world.player.lateral_offset,
        width: player_w,
        speed: world.player.speed,
    };
    update_traffic(&mut world.track, &mut world.cars, &footprint, world.draw_distance, dt);

    let player = &mut world.player;
    player.track_position = increase(player.track_position, dt * player.speed, track_length);

    let steer = if input.left {
        player.lateral_offset -= dx;
        Steer::Left
    } else if input.right {
        player.lateral_offset += dx;
        Steer::Right
    } else {
        Steer::Straight
    };
    player.steer = if player.speed > 0.0 { steer } else { Steer::Straight };

    // cornering at speed pushes the car to the outside of the bend
    player.lateral_offset -= dx * speed_percent * segment_curve * CENTRIFUGAL;

    player.speed = if input.faster {
        accelerate(player.speed, ACCEL, dt)
    } else if input.slower {
        accelerate(player.speed, BREAKING, dt)
    } else {
        accelerate(player.speed, DECEL, dt)
    };

    if player.lateral_offset.abs() > 1.0 {
        if player.speed > OFF_ROAD_LIMIT {
            player.speed = accelerate(player.speed, OFF_ROAD_DECEL, dt);
        }
        let segment = &world.track.segments[player_segment];
        if hits_scenery(segment, player.lateral_offset, player_w) {
            player.speed = CRASH_SPEED;
            player.track_position = increase(segment.p1.world_z, -player_z, track_length);
            outcome.impact = Some(Impact::Scenery { segment: player_segment });
        }
    }

    let segment = &world.track.segments[player_segment];
    if let Some(car) = hits_traffic(segment, &world.cars, player.lateral_offset, player_w, player.speed) {
        player.speed = car.speed * (car.speed / player.speed);
        player.track_position = increase(car.z, -player_z, track_length);
        outcome.impact = Some(Impact::Traffic { car_speed: car.speed });
    }

    player.lateral_offset = player.lateral_offset.clamp(-MAX_LATERAL_OFFSET, MAX_LATERAL_OFFSET);
    player.speed = player.speed.clamp(0.0, MAX_SPEED);

    let mut travelled = player.track_position - start_position;
    if travelled < -track_length / 2.0 {
        travelled += track_length;
    }
    let turn = segment_curve * travelled / SEGMENT_LENGTH;
    let parallax = &mut world.parallax;
    parallax.sky = increase(parallax.sky, SKY_SPEED * turn, 1.0);
    parallax.hill = increase(parallax.hill, HILL_SPEED * turn, 1.0);
    parallax.tree = increase(parallax.tree, TREE_SPEED * turn, 1.0);

    outcome.completed_lap =
        world
            .lap_timer
            .update(start_position, world.player.track_position, player_z, track_length, dt);

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::{
        FIXED_TIMESTEP, RoadElement, SpritePlacement, default_script, percent_remaining,
    };
    use crate::settings::RaceSettings;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const DT: f32 = FIXED_TIMESTEP;

    fn quiet_settings() -> RaceSettings {
        RaceSettings {
            total_cars: 0,
            ..RaceSettings::default()
        }
    }

    fn world_from(script: &[RoadElement], settings: &RaceSettings) -> World {
        let mut rng = StdRng::seed_from_u64(21);
        World::new(script, settings, None, &mut rng).unwrap()
    }

    // 25 flat, straight segments: a 5000 long loop
    fn short_loop() -> World {
        let script = [RoadElement::Road { enter: 10, hold: 5, leave: 10, curve: 0.0, height: 0.0 }];
        let mut world = world_from(&script, &quiet_settings());
        clear_scenery(&mut world);
        world
    }

    fn clear_scenery(world: &mut World) {
        for segment in &mut world.track.segments {
            segment.sprites.clear();
        }
    }

    #[test]
    fn test_accelerates_and_coasts() {
        let mut world = short_loop();
        let faster = DriveInput { faster: true, ..Default::default() };
        step(&mut world, &faster, DT);
        assert!((world.player.speed - ACCEL * DT).abs() < 1e-3);

        world.player.speed = 6000.0;
        step(&mut world, &DriveInput::default(), DT);
        assert!((world.player.speed - (6000.0 + DECEL * DT)).abs() < 1e-3);

        let slower = DriveInput { slower: true, ..Default::default() };
        world.player.speed = 100.0;
        step(&mut world, &slower, DT);
        assert_eq!(world.player.speed, 0.0);
    }

    #[test]
    fn test_speed_and_lateral_bounds_hold() {
        let mut world = world_from(&default_script(), &RaceSettings::default());
        let mut rng = StdRng::seed_from_u64(5);
        let mut input = DriveInput::default();
        for tick in 0..6000 {
            if tick % 30 == 0 {
                input = DriveInput {
                    left: rng.random_bool(0.4),
                    right: rng.random_bool(0.4),
                    faster: rng.random_bool(0.8),
                    slower: rng.random_bool(0.1),
                };
            }
            step(&mut world, &input, DT);
            assert!(world.player.speed >= 0.0 && world.player.speed <= MAX_SPEED);
            assert!(world.player.lateral_offset.abs() <= MAX_LATERAL_OFFSET);
            assert!(world.player.track_position.is_finite());
        }
    }

    #[test]
    fn test_holding_a_direction_is_clamped() {
        let mut world = short_loop();
        world.player.speed = MAX_SPEED;
        let input = DriveInput { right: true, faster: true, ..Default::default() };
        for _ in 0..2000 {
            step(&mut world, &input, DT);
        }
        assert_eq!(world.player.lateral_offset, MAX_LATERAL_OFFSET);
    }

    #[test]
    fn test_centrifugal_drift_scales_with_speed_and_curve() {
        let mut world = short_loop();
        for segment in &mut world.track.segments {
            segment.curve = 4.0;
        }
        let drift_at = |world: &mut World, speed: f32| {
            world.player.lateral_offset = 0.0;
            world.player.track_position = 0.0;
            world.player.speed = speed;
            step(world, &DriveInput::default(), DT);
            world.player.lateral_offset
        };
        let slow = drift_at(&mut world, 3000.0);
        let fast = drift_at(&mut world, 9000.0);
        // a right-hand bend throws the car left, harder the faster it goes
        assert!(slow < 0.0);
        assert!(fast < slow);

        for segment in &mut world.track.segments {
            segment.curve = 6.0;
        }
        let sharper = drift_at(&mut world, 9000.0);
        assert!(sharper < fast);
    }

    #[test]
    fn test_off_road_penalty_slows_more() {
        let mut on_road = short_loop();
        on_road.player.speed = 8000.0;
        let mut off_road = on_road.clone();
        off_road.player.lateral_offset = 1.5;

        let input = DriveInput { faster: true, ..Default::default() };
        step(&mut on_road, &input, DT);
        step(&mut off_road, &input, DT);
        assert!(off_road.player.speed < on_road.player.speed);
    }

    #[test]
    fn test_no_off_road_penalty_below_limit() {
        let mut on_road = short_loop();
        on_road.player.speed = OFF_ROAD_LIMIT / 2.0;
        let mut off_road = on_road.clone();
        off_road.player.lateral_offset = 1.5;
        step(&mut on_road, &DriveInput::default(), DT);
        step(&mut off_road, &DriveInput::default(), DT);
        assert_eq!(off_road.player.speed, on_road.player.speed);
    }

    #[test]
    fn test_scenery_collision_snaps_to_segment_start() {
        let mut world = short_loop();
        world.player.track_position = 1000.0;
        world.player.speed = 8000.0;
        world.player.lateral_offset = 1.5;
        let player_z = world.player.player_z;
        let segment = world.track.segment_index(1000.0 + player_z);
        world.track.segments[segment].sprites.push(SpritePlacement {
            sprite: SpriteKind::Column,
            offset: 1.4,
        });

        let outcome = step(&mut world, &DriveInput::default(), DT);

        assert_eq!(outcome.impact, Some(Impact::Scenery { segment }));
        assert_eq!(world.player.speed, MAX_SPEED / 5.0);
        let segment_start = world.track.segments[segment].p1.world_z;
        assert_eq!(
            world.player.track_position,
            increase(segment_start, -player_z, world.track_length())
        );
        assert!((world.player_world_z() - segment_start).abs() < 1e-2);
    }

    #[test]
    fn test_traffic_collision_drops_behind_car() {
        let settings = RaceSettings { total_cars: 1, ..RaceSettings::default() };
        let script = [RoadElement::Straight { length: 10 }];
        let mut world = world_from(&script, &settings);
        clear_scenery(&mut world);

        let player_z = world.player.player_z;
        world.player.track_position = 1000.0;
        world.player.speed = 8000.0;
        let target = world.track.segment_index(1000.0 + player_z);
        // park the car a little ahead within the player's segment
        crate::game_logic::relocate_car(&mut world.track, &mut world.cars, 0, target);
        let car = &mut world.cars[0];
        car.offset = 0.0;
        car.speed = 0.0;
        car.z = world.track.segments[target].p1.world_z + 150.0;
        car.percent = percent_remaining(car.z, SEGMENT_LENGTH);
        let car_z = car.z;

        let outcome = step(&mut world, &DriveInput::default(), DT);

        assert_eq!(outcome.impact, Some(Impact::Traffic { car_speed: 0.0 }));
        assert_eq!(world.player.speed, 0.0);
        assert_eq!(
            world.player.track_position,
            increase(car_z, -player_z, world.track_length())
        );
    }

    #[test]
    fn test_lap_rolls_over_after_wrap() {
        let mut world = short_loop();
        assert_eq!(world.track_length(), 5000.0);
        world.player.player_z = 300.0;
        world.player.speed = 6000.0;
        world.lap_timer.current_lap_time = 42.0;
        world.lap_timer.lap_distance = 4900.0;
        // 5000 + 250, already wrapped
        world.player.track_position = increase(0.0, 5250.0, 5000.0);

        let outcome = step(&mut world, &DriveInput { faster: true, ..Default::default() }, DT);

        assert!(world.player.track_position > 300.0);
        assert_eq!(world.lap_timer.last_lap_time, Some(42.0));
        assert_eq!(world.lap_timer.current_lap_time, 0.0);
        let lap = outcome.completed_lap.unwrap();
        assert_eq!(lap.time, 42.0);
        assert!(lap.new_best);
        assert_eq!(world.lap_timer.best_lap_time, Some(42.0));
    }

    #[test]
    fn test_knocked_back_over_lap_line_is_not_a_lap() {
        let settings = RaceSettings { total_cars: 1, ..RaceSettings::default() };
        let script = [RoadElement::Straight { length: 20 }];
        let mut world = world_from(&script, &settings);
        clear_scenery(&mut world);

        let player_z = world.player.player_z;
        world.player.track_position = player_z + 5.0;
        world.player.speed = 6000.0;
        world.lap_timer.current_lap_time = DT;
        let target = world.track.segment_index(world.player.track_position + player_z);
        // a slow car just behind the player's car in the same segment
        crate::game_logic::relocate_car(&mut world.track, &mut world.cars, 0, target);
        let car = &mut world.cars[0];
        car.offset = 0.0;
        car.speed = 100.0;
        car.z = world.track.segments[target].p1.world_z + 1.0;
        car.percent = percent_remaining(car.z, SEGMENT_LENGTH);

        let faster = DriveInput { faster: true, ..Default::default() };
        let first = step(&mut world, &faster, DT);
        assert!(matches!(first.impact, Some(Impact::Traffic { .. })));
        assert!(world.player.track_position < player_z);

        for _ in 1..120 {
            let outcome = step(&mut world, &faster, DT);
            assert_eq!(outcome.completed_lap, None);
        }
        assert!(world.player.track_position > player_z);
        assert_eq!(world.lap_timer.last_lap_time, None);
        assert_eq!(world.lap_timer.best_lap_time, None);
    }

    #[test]
    fn test_lap_clock_runs_between_crossings() {
        let mut world = short_loop();
        world.player.player_z = 300.0;
        world.player.track_position = 1000.0;
        world.player.speed = 6000.0;
        world.lap_timer.current_lap_time = 1.0;
        let outcome = step(&mut world, &DriveInput { faster: true, ..Default::default() }, DT);
        assert!(outcome.completed_lap.is_none());
        assert!((world.lap_timer.current_lap_time - (1.0 + DT)).abs() < 1e-6);
    }

    #[test]
    fn test_parallax_follows_curve() {
        let mut world = short_loop();
        for segment in &mut world.track.segments {
            segment.curve = 2.0;
        }
        world.player.speed = 6000.0;
        step(&mut world, &DriveInput { faster: true, ..Default::default() }, DT);
        let p = world.parallax;
        assert!(p.sky > 0.0 && p.hill > p.sky && p.tree > p.hill);
        assert!(p.tree < 1.0);
    }
}
