use std::f32::consts::TAU;

use crate::game_logic::SpriteRect;
use crate::render::{Rgba, ScreenRect, Sheet, Surface};

/// A decoded RGBA8 image, row-major, top row first.
#[derive(Clone, Debug)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// `None` when `pixels` does not hold exactly `width * height` RGBA texels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }
}

/// Text the framebuffer cannot rasterize itself; the host draws these on top.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
}

/// CPU-side RGBA8 render target.
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    background: Option<Raster>,
    sprites: Option<Raster>,
    text: Vec<TextRun>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            background: None,
            sprites: None,
            text: Vec::new(),
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text
    }

    pub fn set_sheet(&mut self, sheet: Sheet, raster: Raster) {
        match sheet {
            Sheet::Background => self.background = Some(raster),
            Sheet::Sprites => self.sprites = Some(raster),
        }
    }

    pub fn has_sheets(&self) -> bool {
        self.background.is_some() && self.sprites.is_some()
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    fn blend(&mut self, x: usize, y: usize, src: [u8; 4]) {
        let i = (y * self.width as usize + x) * 4;
        let alpha = src[3] as u32;
        if alpha == 0 {
            return;
        }
        let dst = &mut self.pixels[i..i + 4];
        if alpha == 255 {
            dst.copy_from_slice(&src);
            return;
        }
        for c in 0..3 {
            dst[c] = ((src[c] as u32 * alpha + dst[c] as u32 * (255 - alpha) + 127) / 255) as u8;
        }
        dst[3] = (alpha + dst[3] as u32 * (255 - alpha) / 255).min(255) as u8;
    }

    /// Pixel columns whose centres fall in `[x0, x1)`, clipped to the buffer.
    fn span(&self, x0: f32, x1: f32) -> std::ops::Range<usize> {
        let start = (x0 - 0.5).ceil().max(0.0);
        let end = (x1 - 0.5).ceil().min(self.width as f32);
        if !(start < end) {
            return 0..0;
        }
        start as usize..end as usize
    }

    fn rows(&self, y0: f32, y1: f32) -> std::ops::Range<usize> {
        let start = (y0 - 0.5).ceil().max(0.0);
        let end = (y1 - 0.5).ceil().min(self.height as f32);
        if !(start < end) {
            return 0..0;
        }
        start as usize..end as usize
    }
}

impl Surface for Framebuffer {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for texel in self.pixels.chunks_exact_mut(4) {
            texel.copy_from_slice(&rgba);
        }
        self.text.clear();
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) {
        let rect = rect.normalized();
        let src = color.to_array();
        for y in self.rows(rect.y, rect.y + rect.h) {
            for x in self.span(rect.x, rect.x + rect.w) {
                self.blend(x, y, src);
            }
        }
    }

    // Even-odd scanline fill sampled at pixel centres.
    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgba) {
        if points.len() < 3 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }
        let src = color.to_array();
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let mut crossings = Vec::with_capacity(points.len());

        for row in self.rows(min_y, max_y) {
            let y = row as f32 + 0.5;
            crossings.clear();
            for (i, &(ax, ay)) in points.iter().enumerate() {
                let (bx, by) = points[(i + 1) % points.len()];
                if (ay <= y && y < by) || (by <= y && y < ay) {
                    crossings.push(ax + (y - ay) * (bx - ax) / (by - ay));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                for x in self.span(pair[0], pair[1]) {
                    self.blend(x, row, src);
                }
            }
        }
    }

    fn fill_arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32, color: Rgba) {
        if !(radius > 0.0) || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let src = color.to_array();
        let sweep = end - start;
        for row in self.rows(cy - radius, cy + radius) {
            for col in self.span(cx - radius, cx + radius) {
                let dx = col as f32 + 0.5 - cx;
                let dy = row as f32 + 0.5 - cy;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let inside = sweep >= TAU || (dy.atan2(dx) - start).rem_euclid(TAU) <= sweep;
                if inside {
                    self.blend(col, row, src);
                }
            }
        }
    }

    // Nearest-neighbour, alpha blended.
    fn blit(&mut self, sheet: Sheet, src: SpriteRect, dest: ScreenRect) {
        if !(dest.w > 0.0 && dest.h > 0.0 && src.w > 0.0 && src.h > 0.0) {
            return;
        }
        let raster = match sheet {
            Sheet::Background => self.background.take(),
            Sheet::Sprites => self.sprites.take(),
        };
        let Some(raster) = raster else {
            return;
        };

        let max_u = (src.x + src.w).min(raster.width() as f32) - 1.0;
        let max_v = (src.y + src.h).min(raster.height() as f32) - 1.0;
        if max_u >= src.x.max(0.0) && max_v >= src.y.max(0.0) {
            for row in self.rows(dest.y, dest.y + dest.h) {
                let v = (src.y + (row as f32 + 0.5 - dest.y) / dest.h * src.h)
                    .floor()
                    .clamp(src.y.max(0.0), max_v);
                for col in self.span(dest.x, dest.x + dest.w) {
                    let u = (src.x + (col as f32 + 0.5 - dest.x) / dest.w * src.w)
                        .floor()
                        .clamp(src.x.max(0.0), max_u);
                    self.blend(col, row, raster.texel(u as u32, v as u32));
                }
            }
        }

        match sheet {
            Sheet::Background => self.background = Some(raster),
            Sheet::Sprites => self.sprites = Some(raster),
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba) {
        self.text.push(TextRun {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }
}
