// Simulation timing
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0; // 60 Hz, independent of display refresh
pub const MAX_FRAME_DELTA: f32 = 1.0; // a stalled window must not cause a catch-up spiral

// Track geometry
pub const SEGMENT_LENGTH: f32 = 200.0;
pub const RUMBLE_LENGTH: usize = 3; // segments per light/dark band

// Physics constants
pub const MAX_SPEED: f32 = SEGMENT_LENGTH / FIXED_TIMESTEP; // one segment per tick
pub const ACCEL: f32 = MAX_SPEED / 5.0;
pub const BREAKING: f32 = -MAX_SPEED;
pub const DECEL: f32 = -MAX_SPEED / 5.0;
pub const OFF_ROAD_DECEL: f32 = -MAX_SPEED / 2.0;
pub const OFF_ROAD_LIMIT: f32 = MAX_SPEED / 4.0;
pub const CENTRIFUGAL: f32 = 0.3;
pub const MAX_LATERAL_OFFSET: f32 = 3.0;

// Collision responses, tuned for feel
pub const CRASH_SPEED: f32 = MAX_SPEED / 5.0;
pub const TRAFFIC_OVERLAP: f32 = 0.8;
pub const TRAFFIC_LOOKAHEAD: usize = 20;
pub const TRAFFIC_AVOID_OVERLAP: f32 = 1.2;

// Background parallax, in layer widths per segment of curve
pub const SKY_SPEED: f32 = 0.001;
pub const HILL_SPEED: f32 = 0.002;
pub const TREE_SPEED: f32 = 0.003;

// Track script vocabulary
pub const LENGTH_SHORT: usize = 25;
pub const LENGTH_MEDIUM: usize = 50;
pub const LENGTH_LONG: usize = 100;

pub const HILL_NONE: f32 = 0.0;
pub const HILL_LOW: f32 = 20.0;
pub const HILL_MEDIUM: f32 = 40.0;
pub const HILL_HIGH: f32 = 60.0;

pub const CURVE_NONE: f32 = 0.0;
pub const CURVE_EASY: f32 = 2.0;
pub const CURVE_MEDIUM: f32 = 4.0;
pub const CURVE_HARD: f32 = 6.0;
