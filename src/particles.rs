use rand::Rng;
use ratatui::{
    prelude::{Line, Span},
    style::{Color, Stylize},
};

use crate::constants::{AMBIENT_SETTINGS, BRAILLE_GRID, CONFETTI_SETTINGS};

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0) / 360.0;

    if s <= 0.0 {
        let gray = (l * 255.0).round() as u8;
        return (gray, gray, gray);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let r = hue_to_channel(p, q, h + 1.0 / 3.0);
    let g = hue_to_channel(p, q, h);
    let b = hue_to_channel(p, q, h - 1.0 / 3.0);

    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

struct Mote {
    x: f32,
    y: f32,
    speed: f32,
    alpha: f32,
}

struct Confetti {
    x: f32,
    y: f32,
    color: (u8, u8, u8),
    speed: f32,
    life: i32,
}

pub struct ParticleScene {
    motes: Vec<Mote>,
    confetti: Vec<Confetti>,
    pub width: u16,
    pub height: u16,
}

impl ParticleScene {
    pub fn new(width: u16, height: u16) -> Self {
        let mut scene = Self {
            motes: vec![],
            confetti: vec![],
            width,
            height,
        };
        scene.resize(width, height);
        scene
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width * BRAILLE_GRID.dot_width as u16;
        self.height = height * BRAILLE_GRID.dot_height as u16;
        self.seed_motes();
    }

    fn seed_motes(&mut self) {
        self.motes.clear();
        if self.width == 0 || self.height == 0 {
            return;
        }

        let mut rng = rand::thread_rng();
        let width = self.width as f32;
        let height = self.height as f32;

        for _ in 0..AMBIENT_SETTINGS.count {
            self.motes.push(Mote {
                x: rng.gen_range(0.0..width),
                y: rng.gen_range(0.0..height),
                speed: rng.gen_range(AMBIENT_SETTINGS.speed_min..AMBIENT_SETTINGS.speed_max),
                alpha: rng.gen_range(AMBIENT_SETTINGS.alpha_min..AMBIENT_SETTINGS.alpha_max),
            });
        }
    }

    pub fn spawn_confetti(&mut self) {
        self.confetti.clear();
        if self.width == 0 || self.height == 0 {
            return;
        }

        let mut rng = rand::thread_rng();
        let width = self.width as f32;
        let height = self.height as f32;

        for _ in 0..CONFETTI_SETTINGS.count {
            let hue = rng.gen_range(0.0..360.0);
            self.confetti.push(Confetti {
                x: rng.gen_range(0.0..width),
                y: rng.gen_range(-height..0.0),
                color: hsl_to_rgb(hue, CONFETTI_SETTINGS.saturation, CONFETTI_SETTINGS.lightness),
                speed: rng.gen_range(CONFETTI_SETTINGS.speed_min..CONFETTI_SETTINGS.speed_max),
                life: rng.gen_range(CONFETTI_SETTINGS.life_min..CONFETTI_SETTINGS.life_max),
            });
        }
    }

    pub fn clear_confetti(&mut self) {
        self.confetti.clear();
    }

    pub fn update(&mut self) {
        let height = self.height as f32;

        for mote in &mut self.motes {
            mote.y += mote.speed;
            if mote.y > height {
                mote.y = -2.0;
            }
        }

        for piece in &mut self.confetti {
            piece.y += piece.speed;
            piece.life -= 1;
        }
        self.confetti.retain(|piece| piece.life > 0);
    }

    pub fn render(&self) -> Vec<Line<'static>> {
        let grid_w = self.width as usize;
        let grid_h = self.height as usize;
        let cell_w = grid_w / BRAILLE_GRID.dot_width;
        let cell_h = grid_h / BRAILLE_GRID.dot_height;

        let mut grid: Vec<Vec<Option<(u8, u8, u8)>>> = vec![vec![None; grid_w]; grid_h];

        for mote in &self.motes {
            if mote.y < 0.0 {
                continue;
            }
            let x = mote.x as usize;
            let y = mote.y as usize;
            if x < grid_w && y < grid_h {
                let gray = (mote.alpha * 255.0) as u8;
                grid[y][x] = Some((gray, gray, gray));
            }
        }

        // confetti draws over the ambient field
        for piece in &self.confetti {
            if piece.x < 0.0 || piece.y < 0.0 {
                continue;
            }
            let x = piece.x as usize;
            let y = piece.y as usize;
            if x < grid_w && y < grid_h {
                grid[y][x] = Some(piece.color);
            }
        }

        let mut lines: Vec<Line<'static>> = Vec::with_capacity(cell_h);

        for cy in 0..cell_h {
            let mut spans: Vec<Span<'static>> = Vec::with_capacity(cell_w);

            for cx in 0..cell_w {
                let mut dots = 0u8;
                let mut blended_r = 0f32;
                let mut blended_g = 0f32;
                let mut blended_b = 0f32;
                let mut colored = 0usize;

                for dy in 0..BRAILLE_GRID.dot_height {
                    for dx in 0..BRAILLE_GRID.dot_width {
                        let gx = cx * BRAILLE_GRID.dot_width + dx;
                        let gy = cy * BRAILLE_GRID.dot_height + dy;

                        if gy < grid_h && gx < grid_w {
                            if let Some((r, g, b)) = grid[gy][gx] {
                                let dot_index = match (dx, dy) {
                                    (0, 0) => 0,
                                    (0, 1) => 1,
                                    (0, 2) => 2,
                                    (0, 3) => 6,
                                    (1, 0) => 3,
                                    (1, 1) => 4,
                                    (1, 2) => 5,
                                    (1, 3) => 7,
                                    _ => 0,
                                };
                                dots |= 1 << dot_index;

                                blended_r += r as f32;
                                blended_g += g as f32;
                                blended_b += b as f32;
                                colored += 1;
                            }
                        }
                    }
                }

                let color = if colored > 0 {
                    Color::Rgb(
                        (blended_r / colored as f32) as u8,
                        (blended_g / colored as f32) as u8,
                        (blended_b / colored as f32) as u8,
                    )
                } else {
                    Color::White
                };

                let ch = char::from_u32(BRAILLE_GRID.base + dots as u32).unwrap_or(' ');
                spans.push(Span::raw(ch.to_string()).fg(color));
            }

            lines.push(Line::from(spans));
        }

        lines
    }
}
