use crate::config::Settings;
use crate::model::{ActionKind, Facing, Vec2};
use crate::motion::SPRITE_SIZE;
use crate::pet::Pet;
use crate::schedule::Millis;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// World pixels per braille dot.
pub(crate) const PX_PER_DOT: f32 = SPRITE_SIZE / SPRITE_DOTS as f32;
pub(crate) const CELL_W_PX: f32 = PX_PER_DOT * 2.0;
pub(crate) const CELL_H_PX: f32 = PX_PER_DOT * 4.0;

/// The sprite is authored on a 64×64 grid and drawn at half resolution.
const SPRITE_UNITS: f32 = 64.0;
const SPRITE_DOTS: i32 = 32;
pub(crate) const SPRITE_PX: f32 = SPRITE_SIZE;

const PAGE_BG: Color = Color::Rgb {
    r: 238,
    g: 236,
    b: 230,
};
const FOCUS_BG: Color = Color::Rgb {
    r: 24,
    g: 24,
    b: 27,
};
const INK: Color = Color::Rgb {
    r: 39,
    g: 39,
    b: 42,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x < self.w && y < self.h {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = INK;
            c.bg = bg;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Pixel {
    pub(crate) fn rgb((r, g, b): (u8, u8, u8), a: u8) -> Self {
        Self { r, g, b, a }
    }
}

pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }
    fn slot(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.w || y as u32 >= self.h {
            return None;
        }
        Some(self.idx(x as u32, y as u32))
    }
    pub(crate) fn erase(&mut self, x: i32, y: i32) {
        if let Some(i) = self.slot(x, y) {
            self.px[i] = Pixel::default();
        }
    }
    pub(crate) fn blend_over(&mut self, x: i32, y: i32, src: Pixel) {
        let Some(i) = self.slot(x, y) else {
            return;
        };
        let dst = self.px[i];

        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            self.px[i] = Pixel::default();
            return;
        }

        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f32 / 255.0;
            let dc = dc as f32 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };
        self.px[i] = Pixel {
            r: blend(src.r, dst.r),
            g: blend(src.g, dst.g),
            b: blend(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            // Braille: 2×4 dots per cell
            canvas: PixelCanvas::new(cols as u32 * 2, rows as u32 * 4),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = PixelCanvas::new(c as u32 * 2, r as u32 * 4);
        Ok(true)
    }

    /// Terminal area in world pixels.
    pub(crate) fn world_size(&self) -> (f32, f32) {
        (self.cols as f32 * CELL_W_PX, self.rows as f32 * CELL_H_PX)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Converts inked dots to braille glyphs. Cells with no ink are left alone so
/// text drawn earlier survives.
pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, enable_color: bool) {
    let cols = out.w as u32;
    let rows = out.h as u32;

    for cy in 0..rows {
        for cx in 0..cols {
            let mut mask: u8 = 0;
            let (mut sum_r, mut sum_g, mut sum_b, mut ink) = (0u32, 0u32, 0u32, 0u32);

            for dy in 0..4 {
                for dx in 0..2 {
                    let (x, y) = (cx * 2 + dx, cy * 4 + dy);
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];
                    if p.a >= 32 {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        ink += 1;
                    }
                }
            }
            if ink == 0 {
                continue;
            }

            let ch = char::from_u32(0x2800 + mask as u32).unwrap_or(' ');
            let fg = if enable_color {
                Color::Rgb {
                    r: (sum_r / ink) as u8,
                    g: (sum_g / ink) as u8,
                    b: (sum_b / ink) as u8,
                }
            } else {
                Color::White
            };
            let bg = out.get(cx as u16, cy as u16).map(|c| c.bg).unwrap_or(Color::Black);
            out.set(cx as u16, cy as u16, Cell { ch, fg, bg });
        }
    }
}

/* -----------------------------
   Pixel cat
------------------------------ */

const WHITE: (u8, u8, u8) = (255, 255, 255);
const BLUSH: (u8, u8, u8) = (0xff, 0xaa, 0xa5);
const GOGGLE: (u8, u8, u8) = (129, 140, 248);

fn in_rect(p: Vec2, x: f32, y: f32, w: f32, h: f32) -> bool {
    p.x >= x && p.x < x + w && p.y >= y && p.y < y + h
}

fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let sign = |p1: Vec2, p2: Vec2, p3: Vec2| {
        (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
    };
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);
    let neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(neg && pos)
}

fn wave(now: Millis, period: Millis) -> f32 {
    let t = (now % period) as f32 / period as f32;
    (t * std::f32::consts::TAU).sin()
}

/// Eyes shut for 200ms out of every 4.2s.
fn blinking(now: Millis) -> bool {
    now % 4200 >= 4000
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ink {
    Fill((u8, u8, u8), u8),
    Hole,
}

/// What the sprite shows at sprite-space point `p` (0..64 on both axes).
fn sprite_sample(p: Vec2, action: ActionKind, body: (u8, u8, u8), now: Millis) -> Option<Ink> {
    let body_ink = Ink::Fill(body, 255);

    // eyes
    match action {
        ActionKind::Sleep => {
            if in_rect(p, 20.0, 36.0, 8.0, 2.0) || in_rect(p, 36.0, 36.0, 8.0, 2.0) {
                return Some(Ink::Hole);
            }
        }
        ActionKind::Happy => {
            for cx in [24.0, 40.0] {
                let dx = (p.x - cx).abs();
                if dx <= 4.0 && (p.y - (34.0 + dx)).abs() <= 1.2 {
                    return Some(Ink::Hole);
                }
            }
        }
        _ => {
            let (y, h) = if blinking(now) { (35.0, 2.0) } else { (32.0, 8.0) };
            if in_rect(p, 20.0, y, 8.0, h) || in_rect(p, 36.0, y, 8.0, h) {
                return Some(Ink::Hole);
            }
        }
    }

    if action == ActionKind::Focus {
        for cx in [24.0, 40.0] {
            let d = ((p.x - cx).powi(2) + (p.y - 36.0).powi(2)).sqrt();
            if (5.0..=7.5).contains(&d) {
                return Some(Ink::Fill(GOGGLE, 255));
            }
        }
        if in_rect(p, 30.0, 35.0, 4.0, 2.0) || in_rect(p, 4.0, 35.0, 13.0, 2.0) || in_rect(p, 47.0, 35.0, 13.0, 2.0) {
            return Some(Ink::Fill(GOGGLE, 255));
        }
    } else if in_rect(p, 30.0, 46.0, 4.0, 2.0) {
        return Some(Ink::Fill(BLUSH, 255));
    }

    if in_rect(p, 14.0, 42.0, 4.0, 2.0) || in_rect(p, 46.0, 42.0, 4.0, 2.0) {
        return Some(Ink::Fill(BLUSH, 153));
    }

    // body
    let (body_y, body_h) = match action {
        ActionKind::Sleep => (30.0, 32.0),
        ActionKind::Walk => {
            let squash = 1.0 - 0.05 * wave(now, 500).abs();
            let h = 32.0 * squash;
            (56.0 - h, h)
        }
        _ => (24.0, 32.0),
    };
    if in_rect(p, 12.0, body_y, 40.0, body_h) {
        return Some(body_ink);
    }

    // ears
    if in_triangle(
        p,
        Vec2::new(12.0, 24.0),
        Vec2::new(4.0, 12.0),
        Vec2::new(20.0, 12.0),
    ) || in_triangle(
        p,
        Vec2::new(52.0, 24.0),
        Vec2::new(60.0, 12.0),
        Vec2::new(44.0, 12.0),
    ) {
        return Some(body_ink);
    }

    // tail swings about its root
    let swing = if action == ActionKind::Happy { 20.0 } else { 5.0 };
    let angle = (swing * wave(now, 500)).to_radians();
    let (s, c) = angle.sin_cos();
    let (rx, ry) = (p.x - 48.0, p.y - 46.0);
    let local = Vec2::new(48.0 + rx * c + ry * s, 46.0 - rx * s + ry * c);
    if in_rect(local, 48.0, 44.0, 12.0, 4.0) {
        return Some(body_ink);
    }

    None
}

pub(crate) fn draw_pet(
    canvas: &mut PixelCanvas,
    pos: Vec2,
    action: ActionKind,
    facing: Facing,
    body: (u8, u8, u8),
    now: Millis,
) {
    let ox = (pos.x / PX_PER_DOT).round() as i32;
    let oy = (pos.y / PX_PER_DOT).round() as i32;
    let unit = SPRITE_UNITS / SPRITE_DOTS as f32;

    for sy in 0..SPRITE_DOTS {
        for sx in 0..SPRITE_DOTS {
            let src_x = match facing {
                Facing::Right => sx,
                Facing::Left => SPRITE_DOTS - 1 - sx,
            };
            let p = Vec2::new((src_x as f32 + 0.5) * unit, (sy as f32 + 0.5) * unit);
            match sprite_sample(p, action, body, now) {
                Some(Ink::Fill(rgb, a)) => canvas.blend_over(ox + sx, oy + sy, Pixel::rgb(rgb, a)),
                Some(Ink::Hole) => canvas.erase(ox + sx, oy + sy),
                None => {}
            }
        }
    }
}

/// Whether terminal cell (col,row) lands on the sprite drawn at `pos`.
pub(crate) fn sprite_hit(pos: Vec2, col: u16, row: u16) -> bool {
    let x = (col as f32 + 0.5) * CELL_W_PX;
    let y = (row as f32 + 0.5) * CELL_H_PX;
    x >= pos.x && x < pos.x + SPRITE_PX && y >= pos.y && y < pos.y + SPRITE_PX
}

/* -----------------------------
   Text overlay (HUD, bubble, hints)
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

fn bar(value: u8, width: usize) -> String {
    let fill = (value.min(100) as usize * width + 50) / 100;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

pub(crate) fn format_time(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn cell_of(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / CELL_W_PX).floor() as i32,
        (pos.y / CELL_H_PX).floor() as i32,
    )
}

fn put_text_clamped(buf: &mut CellBuffer, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
    if y < 0 || y >= buf.h as i32 {
        return;
    }
    let len = s.chars().count() as i32;
    let x = x.clamp(0, (buf.w as i32 - len).max(0));
    draw_text(buf, x as u16, y as u16, s, fg, bg);
}

/// Draws the whole frame into the back buffer. `drag` is the live pointer
/// offset in world pixels.
pub(crate) fn draw_scene(term: &mut Terminal, pet: &Pet, drag: (f32, f32), settings: &Settings) {
    let st = &pet.state;
    let focusing = st.is_focus_mode;
    let (bg, fg) = match (settings.enable_color, focusing) {
        (false, _) => (Color::Black, Color::White),
        (true, true) => (FOCUS_BG, Color::White),
        (true, false) => (PAGE_BG, INK),
    };
    let color = |c: Color| if settings.enable_color { c } else { fg };

    term.cur.clear(bg);
    term.canvas.clear();

    let base = pet.render_position();
    let pos = if drag == (0.0, 0.0) {
        base
    } else {
        pet.drop_point(base, drag.0, drag.1)
    };
    let body = st.skin().rgb().unwrap_or(WHITE);
    draw_pet(&mut term.canvas, pos, st.action, st.direction, body, pet.now());
    canvas_to_cells(&term.canvas, &mut term.cur, settings.enable_color);

    let buf = &mut term.cur;
    let (px, py) = cell_of(pos);
    let sprite_cols = (SPRITE_PX / CELL_W_PX) as i32;

    if st.action == ActionKind::Sleep {
        let rise = (pet.now() % 2000 / 700) as i32;
        put_text_clamped(
            buf,
            px + sprite_cols,
            py - rise,
            "Zzz",
            color(Color::Rgb {
                r: 37,
                g: 99,
                b: 235,
            }),
            bg,
        );
    }

    if !st.message.is_empty() {
        let bubble = format!(" {} ", st.message);
        let w = bubble.chars().count() as i32;
        put_text_clamped(
            buf,
            px + sprite_cols / 2 - w / 2,
            (py - 2).max(2),
            &bubble,
            Color::Black,
            Color::White,
        );
    }

    // HUD
    if focusing {
        let timer = format!("Focus  {}", format_time(st.time_left_secs));
        draw_text(buf, 2, 1, &timer, color(GOGGLE_COLOR), bg);
    } else {
        let hunger = format!("Hunger {} {:>3}", bar(st.hunger, 12), st.hunger);
        let mood = format!("Mood   {} {:>3}", bar(st.mood, 12), st.mood);
        draw_text(buf, 2, 1, &hunger, color(Color::Rgb { r: 234, g: 88, b: 12 }), bg);
        draw_text(buf, 2, 2, &mood, color(Color::Rgb { r: 219, g: 39, b: 119 }), bg);
    }

    let hints = if focusing {
        "t stop focus | q quit"
    } else {
        "f feed | p play | s skin | t focus | drag the cat | q quit"
    };
    let bottom = buf.h.saturating_sub(1);
    draw_text(buf, 2, bottom, hints, fg, bg);
    let tag = "Pixel Pal v2.0";
    let tag_x = buf.w.saturating_sub(tag.len() as u16 + 1);
    if tag_x > hints.len() as u16 + 3 {
        draw_text(buf, tag_x, bottom, tag, Color::DarkGrey, bg);
    }
}

const GOGGLE_COLOR: Color = Color::Rgb {
    r: GOGGLE.0,
    g: GOGGLE.1,
    b: GOGGLE.2,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn inked(canvas: &PixelCanvas) -> usize {
        canvas.px.iter().filter(|p| p.a >= 32).count()
    }

    #[test]
    fn timer_reads_minutes_and_padded_seconds() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(61), "1:01");
        assert_eq!(format_time(9), "0:09");
    }

    #[test]
    fn bars_scale_with_value() {
        assert_eq!(bar(0, 4), "[    ]");
        assert_eq!(bar(50, 4), "[██  ]");
        assert_eq!(bar(100, 4), "[████]");
    }

    #[test]
    fn every_pose_draws_something() {
        for action in [
            ActionKind::Idle,
            ActionKind::Walk,
            ActionKind::Sleep,
            ActionKind::Happy,
            ActionKind::Eat,
            ActionKind::Focus,
        ] {
            let mut c = PixelCanvas::new(64, 64);
            draw_pet(&mut c, Vec2::new(0.0, 0.0), action, Facing::Right, (51, 51, 51), 0);
            assert!(inked(&c) > 200, "{action:?}");
        }
    }

    #[test]
    fn focus_pose_hides_mouth_and_shows_goggles() {
        let body = (51, 51, 51);
        let mouth = Vec2::new(31.0, 47.0);
        assert_eq!(
            sprite_sample(mouth, ActionKind::Idle, body, 0),
            Some(Ink::Fill(BLUSH, 255))
        );
        assert_eq!(sprite_sample(mouth, ActionKind::Focus, body, 0), Some(Ink::Fill(body, 255)));
        let lens = Vec2::new(24.0, 42.5);
        assert_eq!(
            sprite_sample(lens, ActionKind::Focus, body, 0),
            Some(Ink::Fill(GOGGLE, 255))
        );
    }

    #[test]
    fn sleeping_eyes_are_slits() {
        let body = (1, 2, 3);
        let open_eye = Vec2::new(24.0, 33.0);
        assert_eq!(sprite_sample(open_eye, ActionKind::Idle, body, 0), Some(Ink::Hole));
        assert_eq!(
            sprite_sample(open_eye, ActionKind::Sleep, body, 0),
            Some(Ink::Fill(body, 255))
        );
        assert_eq!(
            sprite_sample(Vec2::new(24.0, 37.0), ActionKind::Sleep, body, 0),
            Some(Ink::Hole)
        );
    }

    #[test]
    fn facing_left_mirrors_the_sprite() {
        let mut right = PixelCanvas::new(32, 32);
        let mut left = PixelCanvas::new(32, 32);
        draw_pet(&mut right, Vec2::default(), ActionKind::Idle, Facing::Right, (9, 9, 9), 0);
        draw_pet(&mut left, Vec2::default(), ActionKind::Idle, Facing::Left, (9, 9, 9), 0);
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(
                    right.px[right.idx(x, y)],
                    left.px[left.idx(31 - x, y)],
                    "({x},{y})"
                );
            }
        }
    }

    #[test]
    fn braille_cells_keep_underlying_text_when_empty() {
        let mut buf = CellBuffer::new(4, 1);
        draw_text(&mut buf, 0, 0, "ab", Color::Red, Color::Blue);
        let mut canvas = PixelCanvas::new(8, 4);
        canvas.blend_over(5, 0, Pixel::rgb((10, 20, 30), 255));
        canvas_to_cells(&canvas, &mut buf, true);
        assert_eq!(buf.cells[0].ch, 'a');
        assert_eq!(buf.cells[1].ch, 'b');
        assert_eq!(buf.cells[2].ch, char::from_u32(0x2808).expect("braille"));
        assert_eq!(buf.cells[2].fg, Color::Rgb { r: 10, g: 20, b: 30 });
    }

    #[test]
    fn hit_test_covers_sprite_box() {
        let pos = Vec2::new(60.0, 120.0);
        // cell (10,10) centre is (63,126)
        assert!(sprite_hit(pos, 10, 10));
        assert!(!sprite_hit(pos, 9, 10));
        assert!(!sprite_hit(pos, 10, 9));
        let last_col = ((60.0 + SPRITE_PX) / CELL_W_PX) as u16 - 1;
        assert!(sprite_hit(pos, last_col, 10));
        assert!(!sprite_hit(pos, last_col + 1, 10));
    }

    #[test]
    fn pet_is_reachable_on_a_standard_terminal() {
        let mut pet = Pet::seeded(7);
        pet.dispatch(crate::pet::Command::Resize {
            width: 80.0 * CELL_W_PX,
            height: 24.0 * CELL_H_PX,
        });
        let pos = pet.render_position();
        let hits = (0..80u16)
            .flat_map(|c| (0..24u16).map(move |r| (c, r)))
            .filter(|&(c, r)| sprite_hit(pos, c, r))
            .count();
        assert_eq!(hits, 16 * 8);

        pet.dispatch(crate::pet::Command::DragEnd {
            dx: 474.0,
            dy: 0.0,
        });
        assert!(pet.state.position.x + SPRITE_PX <= 80.0 * CELL_W_PX);
        assert!(sprite_hit(pet.render_position(), 79, 23));
    }
}
