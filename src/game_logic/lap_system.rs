/// Lap timing for the player car.
///
/// `best_lap_time` is the only value that outlives a race; it is handed in when
/// a world is built and reported back whenever it improves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LapTimer {
    pub current_lap_time: f32,
    pub last_lap_time: Option<f32>,
    pub best_lap_time: Option<f32>,
    /// Net forward travel since the running lap started.
    pub lap_distance: f32,
}

/// A lap that just finished.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletedLap {
    pub time: f32,
    pub new_best: bool,
}

impl LapTimer {
    pub fn new(best_lap_time: Option<f32>) -> Self {
        Self {
            current_lap_time: 0.0,
            last_lap_time: None,
            best_lap_time,
            lap_distance: 0.0,
        }
    }

    /// Close the running lap and start the next one from zero.
    pub fn complete_lap(&mut self) -> CompletedLap {
        let time = self.current_lap_time;
        self.last_lap_time = Some(time);
        self.current_lap_time = 0.0;
        self.lap_distance = 0.0;

        let new_best = self.best_lap_time.is_none_or(|best| time <= best);
        if new_best {
            self.best_lap_time = Some(time);
        }
        CompletedLap { time, new_best }
    }

    /// Called once per tick with the camera position before and after the move.
    ///
    /// The lap line sits at `player_z`: the clock only runs once the car is past
    /// it, and a lap completes when the position crosses it from below after
    /// covering at least half the loop. Crash snaps that drop the car back over
    /// the line count as backward travel.
    pub fn update(
        &mut self,
        start_position: f32,
        position: f32,
        player_z: f32,
        track_length: f32,
        dt: f32,
    ) -> Option<CompletedLap> {
        let running = self.current_lap_time > 0.0;
        if running || position > player_z {
            self.lap_distance += wrapped_travel(start_position, position, track_length);
        }
        if position <= player_z {
            return None;
        }
        let crossed = start_position < player_z;
        if running && crossed && self.lap_distance >= track_length / 2.0 {
            Some(self.complete_lap())
        } else {
            self.current_lap_time += dt;
            None
        }
    }
}

// Signed distance from `from` to `to` on a loop, taking the short way round.
fn wrapped_travel(from: f32, to: f32, track_length: f32) -> f32 {
    let travelled = to - from;
    if travelled < -track_length / 2.0 {
        travelled + track_length
    } else if travelled > track_length / 2.0 {
        travelled - track_length
    } else {
        travelled
    }
}

/// HUD formatting: `S.t` under a minute, `M.SS.t` otherwise.
pub fn format_time(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor();
    let whole = (seconds - minutes * 60.0).floor();
    let tenths = (10.0 * (seconds - seconds.floor())).floor();
    if minutes > 0.0 {
        format!("{}.{:02}.{}", minutes as u32, whole as u32, tenths as u32)
    } else {
        format!("{}.{}", whole as u32, tenths as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_lap_sets_best() {
        let mut timer = LapTimer::new(None);
        timer.current_lap_time = 61.5;
        let lap = timer.complete_lap();
        assert!(lap.new_best);
        assert_eq!(timer.best_lap_time, Some(61.5));
        assert_eq!(timer.last_lap_time, Some(61.5));
        assert_eq!(timer.current_lap_time, 0.0);
    }

    #[test]
    fn test_best_lap_never_increases() {
        let mut timer = LapTimer::new(Some(70.0));
        let mut previous = timer.best_lap_time.unwrap();
        for time in [75.0, 68.0, 68.0, 90.0, 55.5, 60.0, 55.5, 120.0] {
            timer.current_lap_time = time;
            timer.complete_lap();
            let best = timer.best_lap_time.unwrap();
            assert!(best <= previous);
            previous = best;
        }
        assert_eq!(previous, 55.5);
    }

    #[test]
    fn test_slower_lap_is_not_best() {
        let mut timer = LapTimer::new(Some(50.0));
        timer.current_lap_time = 51.0;
        let lap = timer.complete_lap();
        assert!(!lap.new_best);
        assert_eq!(timer.best_lap_time, Some(50.0));
        assert_eq!(timer.last_lap_time, Some(51.0));
    }

    #[test]
    fn test_clock_waits_for_lap_line() {
        let mut timer = LapTimer::new(None);
        assert_eq!(timer.update(0.0, 200.0, 300.0, 5000.0, 0.1), None);
        assert_eq!(timer.current_lap_time, 0.0);
        // first crossing starts the clock rather than closing an empty lap
        assert_eq!(timer.update(200.0, 400.0, 300.0, 5000.0, 0.1), None);
        assert!(timer.current_lap_time > 0.0);
        assert_eq!(timer.lap_distance, 200.0);
    }

    #[test]
    fn test_short_recrossing_is_not_a_lap() {
        let mut timer = LapTimer::new(None);
        timer.update(250.0, 350.0, 300.0, 5000.0, 0.1);
        // knocked back over the line, then across it again
        assert_eq!(timer.update(350.0, 280.0, 300.0, 5000.0, 0.1), None);
        assert_eq!(timer.update(280.0, 320.0, 300.0, 5000.0, 0.1), None);
        assert_eq!(timer.last_lap_time, None);
        assert!((timer.current_lap_time - 0.2).abs() < 1e-6);
        assert!((timer.lap_distance - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_full_loop_completes_across_wrap() {
        let mut timer = LapTimer::new(None);
        timer.update(250.0, 350.0, 300.0, 5000.0, 0.1);
        let mut position = 350.0;
        while position < 4950.0 {
            timer.update(position, position + 100.0, 300.0, 5000.0, 0.1);
            position += 100.0;
        }
        // 4950 -> 50 wraps forward
        assert_eq!(timer.update(4950.0, 50.0, 300.0, 5000.0, 0.1), None);
        assert_eq!(timer.update(50.0, 150.0, 300.0, 5000.0, 0.1), None);
        assert_eq!(timer.update(150.0, 250.0, 300.0, 5000.0, 0.1), None);
        let lap = timer.update(250.0, 350.0, 300.0, 5000.0, 0.1).unwrap();
        assert!(lap.new_best);
        assert!(lap.time > 4.0);
        assert_eq!(timer.lap_distance, 0.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(5.25), "5.2");
        assert_eq!(format_time(65.0), "1.05.0");
        assert_eq!(format_time(125.75), "2.05.7");
    }
}
