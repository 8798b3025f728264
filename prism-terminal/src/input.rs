//! Keyboard and mouse mapping to camera and app commands

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Movement speed selected by the modifier held with a movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Normal,
    /// Shift, or an upper-case letter
    Fast,
    /// Control
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Unit steps along view forward, view right and world up
    Move {
        forward: f32,
        right: f32,
        up: f32,
        pace: Pace,
    },
    /// Unit look steps, in the same sense as pointer deltas
    Look { dx: f32, dy: f32 },
    CycleRenderMode,
    ToggleRays,
    /// Cast a ray straight out of the camera
    PickCenter,
    /// Cast a ray through a terminal cell
    PickAt { column: u16, row: u16 },
    Quit,
}

pub fn map_event(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        _ => None,
    }
}

pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let command = match key.code {
        KeyCode::Esc => Command::Quit,
        KeyCode::Char('c') if ctrl => Command::Quit,
        KeyCode::Enter => Command::PickCenter,
        KeyCode::Left => Command::Look { dx: -1.0, dy: 0.0 },
        KeyCode::Right => Command::Look { dx: 1.0, dy: 0.0 },
        KeyCode::Up => Command::Look { dx: 0.0, dy: -1.0 },
        KeyCode::Down => Command::Look { dx: 0.0, dy: 1.0 },
        KeyCode::Char(c) => {
            let pace = if ctrl {
                Pace::Slow
            } else if shift || c.is_ascii_uppercase() {
                Pace::Fast
            } else {
                Pace::Normal
            };
            let step = |forward, right, up| Command::Move {
                forward,
                right,
                up,
                pace,
            };

            match c.to_ascii_lowercase() {
                'w' => step(1.0, 0.0, 0.0),
                's' => step(-1.0, 0.0, 0.0),
                'a' => step(0.0, -1.0, 0.0),
                'd' => step(0.0, 1.0, 0.0),
                ' ' => step(0.0, 0.0, 1.0),
                'p' => Command::CycleRenderMode,
                'l' => Command::ToggleRays,
                'f' => Command::PickCenter,
                'q' => Command::Quit,
                _ => return None,
            }
        }
        _ => return None,
    };
    Some(command)
}

pub fn map_mouse(mouse: &MouseEvent) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Command::PickAt {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}
