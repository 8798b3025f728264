//! ASCII rasterizer for terminal rendering

use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use prism_core::{Color, Rasterizer, Vec2};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const LINE_CHAR: char = '*';
const POINT_CHAR: char = 'o';

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::WHITE,
};

/// Character grid the software path paints into.
///
/// There is no depth buffer: every primitive overwrites the cells it covers,
/// so the painter's ordering of the render queue decides visibility.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Character at a cell, mainly for inspection
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].character)
    }

    fn plot(&mut self, x: i32, y: i32, cell: Cell) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.cells[idx] = cell;
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(term_color(cell.color)))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Rasterizer for AsciiRenderer {
    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color) {
        let [v0, v1, v2] = points;
        let cell = Cell {
            character: shade_char(color),
            color,
        };

        // Bounding box, clipped to the grid
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f32 - 1.0) as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f32 - 1.0) as i32;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(&v0, &v1, &v2, &p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, cell);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let cell = Cell {
            character: LINE_CHAR,
            color,
        };
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil();
        // Off-screen lines can be arbitrarily long; stop well past the grid
        let limit = (2 * (self.width + self.height)) as f32;
        if !steps.is_finite() || steps > limit * 64.0 {
            return;
        }
        let steps = steps.max(1.0) as i32;

        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            self.plot(p.x.floor() as i32, p.y.floor() as i32, cell);
        }
    }

    fn draw_point(&mut self, point: Vec2, color: Color) {
        let cell = Cell {
            character: POINT_CHAR,
            color,
        };
        self.plot(point.x.floor() as i32, point.y.floor() as i32, cell);
    }
}

/// Ramp character for a shaded color
fn shade_char(color: Color) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    // Keep lit faces visible even for dark base colors
    let index = (color.luminance() * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: &Vec2, v1: &Vec2, v2: &Vec2, p: &Vec2) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
