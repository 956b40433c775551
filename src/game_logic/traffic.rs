use rand::Rng;
use rand::seq::IndexedRandom;

use crate::game_logic::{
    CARS, MAX_SPEED, SEGMENT_LENGTH, SpriteKind, TRAFFIC_AVOID_OVERLAP, TRAFFIC_LOOKAHEAD, Track,
    increase, overlap, percent_remaining,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub offset: f32,
    pub z: f32,
    pub speed: f32,
    pub sprite: SpriteKind,
    /// Progress through the current segment, for interpolating the sprite.
    pub percent: f32,
    /// Back-pointer to the segment bucket holding this car.
    pub segment: usize,
}

/// Where the player is, as seen by traffic deciding whether to steer.
#[derive(Clone, Copy, Debug)]
pub struct PlayerFootprint {
    pub segment: usize,
    pub offset: f32,
    pub width: f32,
    pub speed: f32,
}

/// Scatter `count` cars around the loop and file each into its segment bucket.
pub fn seed_traffic<R: Rng>(track: &mut Track, count: usize, rng: &mut R) -> Vec<Car> {
    let mut cars = Vec::with_capacity(count);
    if track.is_empty() {
        return cars;
    }
    for id in 0..count {
        let side = if rng.random_bool(0.5) { -0.8 } else { 0.8 };
        let offset = rng.random::<f32>() * side;
        let z = rng.random_range(0..track.len()) as f32 * SEGMENT_LENGTH;
        let sprite = *CARS.choose(rng).unwrap_or(&SpriteKind::Car01);
        let spread = if sprite == SpriteKind::Semi { 4.0 } else { 2.0 };
        let speed = MAX_SPEED / 4.0 + rng.random::<f32>() * MAX_SPEED / spread;
        let segment = track.segment_index(z);
        track.segments[segment].cars.push(id);
        cars.push(Car {
            offset,
            z,
            speed,
            sprite,
            percent: 0.0,
            segment,
        });
    }
    cars
}

/// Move car `id` from its current bucket into `to`, keeping both sides in step.
pub fn relocate_car(track: &mut Track, cars: &mut [Car], id: usize, to: usize) {
    let from = cars[id].segment;
    if from == to {
        return;
    }
    let bucket = &mut track.segments[from].cars;
    if let Some(slot) = bucket.iter().position(|&c| c == id) {
        bucket.swap_remove(slot);
    }
    track.segments[to].cars.push(id);
    cars[id].segment = to;
}

/// Advance every car one tick: steer around slower traffic, move, re-bucket.
pub fn update_traffic(track: &mut Track, cars: &mut [Car], player: &PlayerFootprint, draw_distance: usize, dt: f32) {
    let track_length = track.track_length();
    for id in 0..cars.len() {
        let steer = steer_offset(track, cars, id, player, draw_distance);
        let car = &mut cars[id];
        car.offset += steer;
        car.z = increase(car.z, dt * car.speed, track_length);
        car.percent = percent_remaining(car.z, SEGMENT_LENGTH);
        let new_segment = track.segment_index(car.z);
        relocate_car(track, cars, id, new_segment);
    }
}

fn avoid_direction(obstacle_offset: f32, own_offset: f32) -> f32 {
    if obstacle_offset > 0.5 {
        -1.0
    } else if obstacle_offset < -0.5 {
        1.0
    } else if own_offset > obstacle_offset {
        1.0
    } else {
        -1.0
    }
}

fn steer_offset(track: &Track, cars: &[Car], id: usize, player: &PlayerFootprint, draw_distance: usize) -> f32 {
    let car = &cars[id];
    let car_width = car.sprite.world_width();

    // out of the player's sight, nobody cares how traffic drives
    if car.segment as isize - player.segment as isize > draw_distance as isize {
        return 0.0;
    }

    for i in 1..TRAFFIC_LOOKAHEAD {
        let segment = &track.segments[(car.segment + i) % track.len()];

        if segment.index == player.segment
            && car.speed > player.speed
            && overlap(player.offset, player.width, car.offset, car_width, TRAFFIC_AVOID_OVERLAP)
        {
            let dir = avoid_direction(player.offset, car.offset);
            return dir * (1.0 / i as f32) * (car.speed - player.speed) / MAX_SPEED;
        }

        for &other_id in &segment.cars {
            let other = &cars[other_id];
            if car.speed > other.speed
                && overlap(car.offset, car_width, other.offset, other.sprite.world_width(), TRAFFIC_AVOID_OVERLAP)
            {
                let dir = avoid_direction(other.offset, car.offset);
                return dir * (1.0 / i as f32) * (car.speed - other.speed) / MAX_SPEED;
            }
        }
    }

    // nothing ahead, drift back towards the road
    if car.offset < -0.9 {
        0.1
    } else if car.offset > 0.9 {
        -0.1
    } else {
        0.0
    }
}
