use crate::pet::Command;
use crate::render::{CELL_H_PX, CELL_W_PX};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    MouseDown { col: u16, row: u16 },
    MouseDrag { col: u16, row: u16 },
    MouseUp { col: u16, row: u16 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum UserAction {
    Pet(Command),
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        let ev = match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                InputEvent::Key {
                    key: k.code,
                    mods: k.modifiers,
                }
            }
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Down(MouseButton::Left) => InputEvent::MouseDown {
                    col: m.column,
                    row: m.row,
                },
                MouseEventKind::Drag(MouseButton::Left) => InputEvent::MouseDrag {
                    col: m.column,
                    row: m.row,
                },
                MouseEventKind::Up(MouseButton::Left) => InputEvent::MouseUp {
                    col: m.column,
                    row: m.row,
                },
                _ => continue,
            },
            _ => continue,
        };
        out.push(ev);
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

/// While focusing only the stop button (and quitting) is on offer.
pub(crate) fn map_key(focusing: bool, key: KeyCode, mods: KeyModifiers) -> Option<UserAction> {
    if matches!(key, KeyCode::Char('c')) && mods.contains(KeyModifiers::CONTROL) {
        return Some(UserAction::Quit);
    }
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(UserAction::Quit),
        KeyCode::Char('t') | KeyCode::Char('T') => {
            return Some(UserAction::Pet(Command::ToggleFocus))
        }
        _ => {}
    }
    if focusing {
        return None;
    }
    match key {
        KeyCode::Char('f') | KeyCode::Char('F') => Some(UserAction::Pet(Command::Feed)),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(UserAction::Pet(Command::Play)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(UserAction::Pet(Command::CycleSkin)),
        _ => None,
    }
}

/// Tracks a pointer drag that started on the sprite, in terminal cells.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DragTracker {
    origin: Option<(u16, u16)>,
    current: (u16, u16),
}

impl DragTracker {
    pub(crate) fn press(&mut self, col: u16, row: u16, on_pet: bool) -> Option<Command> {
        if !on_pet {
            return None;
        }
        self.origin = Some((col, row));
        self.current = (col, row);
        Some(Command::DragStart)
    }

    pub(crate) fn moved(&mut self, col: u16, row: u16) {
        if self.origin.is_some() {
            self.current = (col, row);
        }
    }

    pub(crate) fn release(&mut self, col: u16, row: u16) -> Option<Command> {
        self.moved(col, row);
        let (dx, dy) = self.offset_px();
        self.origin.take()?;
        Some(Command::DragEnd { dx, dy })
    }

    pub(crate) fn cancel(&mut self) {
        self.origin = None;
    }

    /// Drag offset in world pixels, zero when nothing is held.
    pub(crate) fn offset_px(&self) -> (f32, f32) {
        match self.origin {
            Some((c0, r0)) => (
                (self.current.0 as f32 - c0 as f32) * CELL_W_PX,
                (self.current.1 as f32 - r0 as f32) * CELL_H_PX,
            ),
            None => (0.0, 0.0),
        }
    }
}
