/// Terminal input tracker.
///
/// Drains every pending crossterm event once per loop iteration, without
/// blocking, and keeps only what the page needs:
///   - keys freshly pressed this iteration (quit handling)
///   - the last pointer cell reported (intermediate moves are dropped)
///   - the last terminal size reported
///
/// Pointer reports need mouse capture, which the renderer enables on init
/// and disables on cleanup.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::domain::geom::{Extent, Vec2};

pub struct InputState {
    /// Keys pressed during the most recent `drain_events()`.
    fresh_presses: Vec<KeyEvent>,

    /// Last pointer cell `(col, row)` seen during the drain.
    pointer: Option<(u16, u16)>,

    /// Last terminal size `(cols, rows)` seen during the drain.
    resized: Option<(u16, u16)>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            pointer: None,
            resized: None,
        }
    }

    /// Drain all pending terminal events. Call once per loop iteration.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.pointer = None;
        self.resized = None;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.apply(ev),
                Err(e) => {
                    log::debug!("input read failed: {e}");
                    break;
                }
            }
        }
    }

    fn apply(&mut self, ev: Event) {
        match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.fresh_presses.push(key);
            }
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    self.pointer = Some((m.column, m.row));
                }
                _ => {}
            },
            Event::Resize(cols, rows) => {
                self.resized = Some((cols, rows));
            }
            _ => {}
        }
    }

    /// Was any of these keys pressed this iteration?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.fresh_presses.iter().any(|k| codes.contains(&k.code))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.fresh_presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    pub fn pointer_cell(&self) -> Option<(u16, u16)> {
        self.pointer
    }

    pub fn resized(&self) -> Option<(u16, u16)> {
        self.resized
    }
}

/// Centre of a terminal cell, in surface px.
pub fn cell_to_px(col: u16, row: u16, cell_px: (f32, f32)) -> Vec2 {
    Vec2::new(
        (col as f32 + 0.5) * cell_px.0,
        (row as f32 + 0.5) * cell_px.1,
    )
}

/// Surface extent covered by a terminal of `cols × rows` cells.
pub fn surface_extent(cols: u16, rows: u16, cell_px: (f32, f32)) -> Extent {
    Extent::new(cols as f32 * cell_px.0, rows as f32 * cell_px.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent { code, modifiers, kind, state: KeyEventState::NONE })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn pointer_keeps_last_move_only() {
        let mut input = InputState::new();
        input.apply(mouse(MouseEventKind::Moved, 1, 1));
        input.apply(mouse(MouseEventKind::Drag(MouseButton::Left), 4, 2));
        input.apply(mouse(MouseEventKind::Moved, 10, 5));
        input.apply(mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(input.pointer_cell(), Some((10, 5)));
    }

    #[test]
    fn releases_are_not_presses() {
        let mut input = InputState::new();
        input.apply(key(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release));
        assert!(!input.any_pressed(&[KeyCode::Char('q')]));
        input.apply(key(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Press));
        assert!(input.any_pressed(&[KeyCode::Esc, KeyCode::Char('q')]));
    }

    #[test]
    fn detects_ctrl_c() {
        let mut input = InputState::new();
        input.apply(key(KeyCode::Char('c'), KeyModifiers::NONE, KeyEventKind::Press));
        assert!(!input.ctrl_c_pressed());
        input.apply(key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press));
        assert!(input.ctrl_c_pressed());
    }

    #[test]
    fn resize_keeps_last_size() {
        let mut input = InputState::new();
        input.apply(Event::Resize(80, 24));
        input.apply(Event::Resize(120, 40));
        assert_eq!(input.resized(), Some((120, 40)));
    }

    #[test]
    fn cell_geometry() {
        assert_eq!(cell_to_px(0, 0, (8.0, 16.0)), Vec2::new(4.0, 8.0));
        assert_eq!(cell_to_px(10, 2, (8.0, 16.0)), Vec2::new(84.0, 40.0));
        assert_eq!(surface_extent(200, 50, (8.0, 16.0)), Extent::new(1600.0, 800.0));
    }
}
