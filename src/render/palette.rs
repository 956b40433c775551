use crate::game_logic::ColorBand;
use crate::render::Rgba;

pub const SKY: Rgba = Rgba::hex(0x72D7EE);
pub const FOG: Rgba = Rgba::hex(0x005108);
pub const TEXT: Rgba = Rgba::WHITE;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandColors {
    pub road: Rgba,
    pub grass: Rgba,
    pub rumble: Rgba,
    /// Lane markers, only painted on light bands.
    pub lane: Option<Rgba>,
}

const LIGHT: BandColors = BandColors {
    road: Rgba::hex(0x6B6B6B),
    grass: Rgba::hex(0x10AA10),
    rumble: Rgba::hex(0x555555),
    lane: Some(Rgba::hex(0xCCCCCC)),
};

const DARK: BandColors = BandColors {
    road: Rgba::hex(0x696969),
    grass: Rgba::hex(0x009A00),
    rumble: Rgba::hex(0xBBBBBB),
    lane: None,
};

const START: BandColors = BandColors {
    road: Rgba::WHITE,
    grass: Rgba::WHITE,
    rumble: Rgba::WHITE,
    lane: None,
};

const FINISH: BandColors = BandColors {
    road: Rgba::BLACK,
    grass: Rgba::BLACK,
    rumble: Rgba::BLACK,
    lane: None,
};

pub fn band_colors(band: ColorBand) -> BandColors {
    match band {
        ColorBand::Light => LIGHT,
        ColorBand::Dark => DARK,
        ColorBand::Start => START,
        ColorBand::Finish => FINISH,
    }
}
