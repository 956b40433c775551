// Fixed pixel rectangles into the two raster sheets.

/// A source rectangle on one of the raster sheets, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SpriteRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Background sheet layers, drawn back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundLayer {
    Sky,
    Hills,
    Trees,
}

impl BackgroundLayer {
    pub fn rect(self) -> SpriteRect {
        match self {
            Self::Hills => SpriteRect::new(5.0, 5.0, 1280.0, 480.0),
            Self::Sky => SpriteRect::new(5.0, 495.0, 1280.0, 480.0),
            Self::Trees => SpriteRect::new(5.0, 985.0, 1280.0, 480.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    PalmTree,
    Billboard01,
    Billboard02,
    Billboard03,
    Billboard04,
    Billboard05,
    Billboard06,
    Billboard07,
    Billboard08,
    Billboard09,
    Tree1,
    Tree2,
    DeadTree1,
    DeadTree2,
    Boulder1,
    Boulder2,
    Boulder3,
    Column,
    Bush1,
    Bush2,
    Cactus,
    Stump,
    Semi,
    Truck,
    Car01,
    Car02,
    Car03,
    Car04,
    PlayerUphillLeft,
    PlayerUphillStraight,
    PlayerUphillRight,
    PlayerLeft,
    PlayerStraight,
    PlayerRight,
}

pub const BILLBOARDS: [SpriteKind; 9] = [
    SpriteKind::Billboard01,
    SpriteKind::Billboard02,
    SpriteKind::Billboard03,
    SpriteKind::Billboard04,
    SpriteKind::Billboard05,
    SpriteKind::Billboard06,
    SpriteKind::Billboard07,
    SpriteKind::Billboard08,
    SpriteKind::Billboard09,
];

pub const PLANTS: [SpriteKind; 11] = [
    SpriteKind::Tree1,
    SpriteKind::Tree2,
    SpriteKind::DeadTree1,
    SpriteKind::DeadTree2,
    SpriteKind::PalmTree,
    SpriteKind::Bush1,
    SpriteKind::Bush2,
    SpriteKind::Cactus,
    SpriteKind::Stump,
    SpriteKind::Boulder1,
    SpriteKind::Boulder2,
];

pub const CARS: [SpriteKind; 6] = [
    SpriteKind::Car01,
    SpriteKind::Car02,
    SpriteKind::Car03,
    SpriteKind::Car04,
    SpriteKind::Semi,
    SpriteKind::Truck,
];

impl SpriteKind {
    pub fn rect(self) -> SpriteRect {
        use SpriteKind::*;
        match self {
            PalmTree => SpriteRect::new(5.0, 5.0, 215.0, 540.0),
            Billboard08 => SpriteRect::new(230.0, 5.0, 385.0, 265.0),
            Tree1 => SpriteRect::new(625.0, 5.0, 360.0, 360.0),
            DeadTree1 => SpriteRect::new(5.0, 555.0, 135.0, 332.0),
            Billboard09 => SpriteRect::new(150.0, 555.0, 328.0, 282.0),
            Boulder3 => SpriteRect::new(230.0, 280.0, 320.0, 220.0),
            Column => SpriteRect::new(995.0, 5.0, 200.0, 315.0),
            Billboard01 => SpriteRect::new(625.0, 375.0, 300.0, 170.0),
            Billboard06 => SpriteRect::new(488.0, 555.0, 298.0, 190.0),
            Billboard05 => SpriteRect::new(5.0, 897.0, 298.0, 190.0),
            Billboard07 => SpriteRect::new(313.0, 897.0, 298.0, 190.0),
            Boulder2 => SpriteRect::new(621.0, 897.0, 298.0, 140.0),
            Tree2 => SpriteRect::new(1205.0, 5.0, 282.0, 295.0),
            Billboard04 => SpriteRect::new(1205.0, 310.0, 268.0, 170.0),
            DeadTree2 => SpriteRect::new(1205.0, 490.0, 150.0, 260.0),
            Boulder1 => SpriteRect::new(1205.0, 760.0, 168.0, 248.0),
            Bush1 => SpriteRect::new(5.0, 1097.0, 240.0, 155.0),
            Cactus => SpriteRect::new(929.0, 897.0, 235.0, 118.0),
            Bush2 => SpriteRect::new(255.0, 1097.0, 232.0, 152.0),
            Billboard03 => SpriteRect::new(5.0, 1262.0, 230.0, 220.0),
            Billboard02 => SpriteRect::new(245.0, 1262.0, 215.0, 220.0),
            Stump => SpriteRect::new(995.0, 330.0, 195.0, 140.0),
            Semi => SpriteRect::new(1365.0, 490.0, 122.0, 144.0),
            Truck => SpriteRect::new(1365.0, 644.0, 100.0, 78.0),
            Car03 => SpriteRect::new(1383.0, 760.0, 88.0, 55.0),
            Car02 => SpriteRect::new(1383.0, 825.0, 80.0, 59.0),
            Car04 => SpriteRect::new(1383.0, 894.0, 80.0, 57.0),
            Car01 => SpriteRect::new(1205.0, 1018.0, 80.0, 56.0),
            PlayerUphillLeft => SpriteRect::new(1383.0, 961.0, 80.0, 45.0),
            PlayerUphillStraight => SpriteRect::new(1295.0, 1018.0, 80.0, 45.0),
            PlayerUphillRight => SpriteRect::new(1385.0, 1018.0, 80.0, 45.0),
            PlayerLeft => SpriteRect::new(995.0, 480.0, 80.0, 41.0),
            PlayerStraight => SpriteRect::new(1085.0, 480.0, 80.0, 41.0),
            PlayerRight => SpriteRect::new(995.0, 531.0, 80.0, 41.0),
        }
    }

    /// Footprint in road half-widths.
    pub fn world_width(self) -> f32 {
        self.rect().w * SPRITE_SCALE
    }
}

/// Scale that makes the player sprite a third of the road half-width.
pub const SPRITE_SCALE: f32 = 0.3 / 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Steer {
    Left,
    #[default]
    Straight,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slope {
    Uphill,
    Level,
}

impl Slope {
    pub fn from_rise(rise: f32) -> Self {
        if rise > 0.0 { Slope::Uphill } else { Slope::Level }
    }
}

// Indexed by [slope][steer]
const PLAYER_SPRITES: [[SpriteKind; 3]; 2] = [
    [
        SpriteKind::PlayerUphillLeft,
        SpriteKind::PlayerUphillStraight,
        SpriteKind::PlayerUphillRight,
    ],
    [
        SpriteKind::PlayerLeft,
        SpriteKind::PlayerStraight,
        SpriteKind::PlayerRight,
    ],
];

pub fn player_sprite(steer: Steer, slope: Slope) -> SpriteKind {
    let row = match slope {
        Slope::Uphill => 0,
        Slope::Level => 1,
    };
    let col = match steer {
        Steer::Left => 0,
        Steer::Straight => 1,
        Steer::Right => 2,
    };
    PLAYER_SPRITES[row][col]
}
