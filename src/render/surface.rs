use crate::game_logic::SpriteRect;

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::hex(0xFFFFFF);
    pub const BLACK: Rgba = Rgba::hex(0x000000);

    /// Opaque colour from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 255,
        }
    }

    /// Same colour with its alpha scaled by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            a: (self.a as f32 * alpha).round() as u8,
            ..self
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Screen-space rectangle in pixels. Width and height may be negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ScreenRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Same area with non-negative width and height.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.w < 0.0 { (self.x + self.w, -self.w) } else { (self.x, self.w) };
        let (y, h) = if self.h < 0.0 { (self.y + self.h, -self.h) } else { (self.y, self.h) };
        Self { x, y, w, h }
    }
}

/// The two raster images everything is blitted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sheet {
    Background,
    Sprites,
}

/// A 2D drawing target. Origin is the top-left corner, y grows downwards.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Start a new frame: every pixel set to `color`, no text.
    fn clear(&mut self, color: Rgba);

    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba);

    /// Fill a simple polygon given as screen points.
    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgba);

    /// Fill the pie slice from `start` to `end` radians, clockwise on screen.
    fn fill_arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32, color: Rgba);

    /// Copy `src` from `sheet` stretched onto `dest`, clipped to the surface.
    fn blit(&mut self, sheet: Sheet, src: SpriteRect, dest: ScreenRect);

    /// Draw a line of text whose centre sits at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba);
}
