/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// A frame is composed in three layers: the background gradient, the
/// particle canvas, then the page content on top. The countdown digits are
/// re-read from the page only when its observable version moves.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::countdown::TimeLeft;
use crate::domain::observable::Observable;
use crate::sim::world::PageState;
use crate::ui::canvas::DotCanvas;

type Rgb = (u8, u8, u8);

const GRAY_900: Rgb = (17, 24, 39);
const GRAY_800: Rgb = (31, 41, 55);
const GRAY_400: Rgb = (156, 163, 175);
const GRAY_600: Rgb = (75, 85, 99);
const WHITE: Rgb = (255, 255, 255);

/// Braille dots are thinner than canvas pixels; lift them a little.
const DOT_GAIN: f32 = 1.5;

fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}

fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: GRAY_900.0, g: GRAY_900.1, b: GRAY_900.2 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        bold: false,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        bold: false,
    };

    fn from_char(c: char, fg: Color, bg: Color, bold: bool) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell.bold = bold;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Background colour already composed at (x, y).
    fn bg_at(&self, x: usize, y: usize) -> Color {
        self.get(x, y).bg
    }

    /// Write a string at (x, y), keeping whatever background is underneath.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            let cx = x + i;
            if cx >= self.width { break; }
            let bg = self.bg_at(cx, y);
            self.set(cx, y, Cell::from_char(ch, fg, bg, bold));
        }
    }

    /// Write a string horizontally centred on row `y`.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bold: bool) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bold);
    }
}

// ── Page content ──

const TITLE: &str = "O R I O N N";
const SUBTITLE: &str = "DEVELOPMENT";
const HEADING: &str = "Çok Yakında";
const TAGLINE: &str = "Yeni websitemiz için geri sayım başladı!";
const LABELS: [&str; 3] = ["SAAT", "DAKİKA", "SANİYE"];
const LINK_TEXT: &str = "Instagram";
const LINK_URL: &str = "https://www.instagram.com/orionndevelopment/";
const HINT: &str = "Q / ESC  quit";

/// 3×5 block glyphs for the countdown digits.
const BIG_DIGITS: [[&str; 5]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    [" █ ", "██ ", " █ ", " █ ", "███"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
];

const BOX_W: usize = 11;
const BOX_H: usize = 7;
const BOX_GAP: usize = 3;
/// Rows needed by the boxed layout (title down to link).
const FULL_LAYOUT_ROWS: usize = 20;

/// Two decimal digits per field, `[[h1,h0],[m1,m0],[s1,s0]]`.
fn digits_of(t: TimeLeft) -> [[u8; 2]; 3] {
    let split = |v: u32| [((v / 10) % 10) as u8, (v % 10) as u8];
    [split(t.hours), split(t.minutes), split(t.seconds)]
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    /// Countdown version the cached digits were taken from.
    countdown_seen: Option<u64>,
    digits: [[u8; 2]; 3],
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            countdown_seen: None,
            digits: [[0; 2]; 3],
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw, th);
        Ok(())
    }

    /// Restore the terminal and stop pointer reporting.
    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            DisableMouseCapture,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.term_w as u16, self.term_h as u16)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.term_w = cols as usize;
        self.term_h = rows as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, page: &PageState, canvas: &DotCanvas) -> io::Result<()> {
        self.sync_countdown(page.countdown.state());

        self.compose_background();
        self.compose_particles(canvas);
        if self.term_h >= FULL_LAYOUT_ROWS + 2 {
            self.compose_full();
        } else {
            self.compose_compact();
        }
        if self.term_h > 0 {
            self.front.put_str(1, self.term_h - 1, HINT, color(GRAY_600), false);
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Re-read the digits if the countdown moved since the last frame.
    fn sync_countdown(&mut self, countdown: &Observable<TimeLeft>) -> bool {
        if self.countdown_seen.is_some_and(|seen| !countdown.changed_since(seen)) {
            return false;
        }
        self.digits = digits_of(*countdown.get());
        self.countdown_seen = Some(countdown.version());
        true
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut last_bold = false;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetAttribute(Attribute::NormalIntensity),
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.bold != last_bold {
                    let attr = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.writer, SetAttribute(attr))?;
                    last_bold = cell.bold;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn gradient_at(&self, x: usize, y: usize) -> Rgb {
        let w = self.front.width.max(2) - 1;
        let h = self.front.height.max(2) - 1;
        let t = (x as f32 / w as f32 + y as f32 / h as f32) / 2.0;
        mix(GRAY_900, GRAY_800, t)
    }

    fn compose_background(&mut self) {
        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let bg = color(self.gradient_at(x, y));
                self.front.set(x, y, Cell::from_char(' ', Color::White, bg, false));
            }
        }
    }

    fn compose_particles(&mut self, canvas: &DotCanvas) {
        let rows = self.front.height.min(canvas.rows());
        let cols = self.front.width.min(canvas.cols());
        for y in 0..rows {
            for x in 0..cols {
                if let Some((ch, peak)) = canvas.cell(x, y) {
                    let base = self.gradient_at(x, y);
                    let fg = color(mix(base, WHITE, peak * DOT_GAIN));
                    self.front.set(x, y, Cell::from_char(ch, fg, color(base), false));
                }
            }
        }
    }

    /// Title block, boxed countdown, labels and link, centred vertically.
    fn compose_full(&mut self) {
        let top = self.term_h.saturating_sub(FULL_LAYOUT_ROWS) / 2;
        let white = color(WHITE);
        let gray = color(GRAY_400);

        self.front.put_centered(top, TITLE, white, true);
        self.front.put_centered(top + 1, SUBTITLE, gray, false);
        self.front.put_centered(top + 4, HEADING, white, true);
        self.front.put_centered(top + 6, TAGLINE, gray, false);

        let boxes_y = top + 9;
        let total_w = BOX_W * 3 + BOX_GAP * 2;
        let left = self.front.width.saturating_sub(total_w) / 2;
        for (i, label) in LABELS.iter().enumerate() {
            let x = left + i * (BOX_W + BOX_GAP);
            self.compose_digit_box(x, boxes_y, self.digits[i]);
            let lx = x + BOX_W.saturating_sub(label.chars().count()) / 2;
            self.front.put_str(lx, boxes_y + BOX_H + 1, label, gray, false);
        }

        self.front.put_centered(top + FULL_LAYOUT_ROWS - 1, LINK_TEXT, gray, false);
        if top + FULL_LAYOUT_ROWS < self.term_h.saturating_sub(1) {
            self.front.put_centered(top + FULL_LAYOUT_ROWS, LINK_URL, color(GRAY_600), false);
        }
    }

    fn compose_digit_box(&mut self, x: usize, y: usize, digits: [u8; 2]) {
        for dy in 0..BOX_H {
            for dx in 0..BOX_W {
                let bg = color(mix(self.gradient_at(x + dx, y + dy), GRAY_800, 0.5));
                self.front.set(x + dx, y + dy, Cell::from_char(' ', Color::White, bg, false));
            }
        }
        let white = color(WHITE);
        for (n, d) in digits.iter().enumerate() {
            let glyph = &BIG_DIGITS[*d as usize % 10];
            let gx = x + 2 + n * 4;
            for (row, line) in glyph.iter().enumerate() {
                self.front.put_str(gx, y + 1 + row, line, white, true);
            }
        }
    }

    /// Short terminals: everything on as few rows as possible.
    fn compose_compact(&mut self) {
        let white = color(WHITE);
        let gray = color(GRAY_400);
        let [h, m, s] = self.digits;
        let clock = format!("{}{}  :  {}{}  :  {}{}", h[0], h[1], m[0], m[1], s[0], s[1]);
        let labels = format!("{:<6}{:^8}{:>6}", LABELS[0], LABELS[1], LABELS[2]);

        let lines: [(&str, Color, bool); 6] = [
            (TITLE, white, true),
            (HEADING, white, true),
            (TAGLINE, gray, false),
            (clock.as_str(), white, true),
            (labels.as_str(), gray, false),
            (LINK_TEXT, gray, false),
        ];
        let usable = self.term_h.saturating_sub(1);
        let top = usable.saturating_sub(lines.len()) / 2;
        for (i, (text, fg, bold)) in lines.iter().enumerate() {
            if top + i >= usable { break; }
            self.front.put_centered(top + i, text, *fg, *bold);
        }
    }
}
