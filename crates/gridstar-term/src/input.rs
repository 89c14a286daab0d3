//! Terminal input mapped to visualizer messages: [`Msg`], [`Key`],
//! [`MouseAction`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

/// A keyboard key the visualizer cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    /// A printable character other than space.
    Char(char),
}

/// A mouse button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Primary (left) button.
    Main,
    /// Secondary (right) button.
    Secondary,
}

/// An input message delivered to the [`Visualizer`](crate::Visualizer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    KeyDown(Key),
    /// A press or drag at terminal `(column, row)`.
    Mouse { action: MouseAction, column: u16, row: u16 },
    /// The terminal was resized.
    Resize,
    /// Ctrl-C or a similar hard stop.
    Quit,
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c.to_ascii_lowercase())),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

fn to_action(btn: MouseButton) -> Option<MouseAction> {
    match btn {
        MouseButton::Left => Some(MouseAction::Main),
        MouseButton::Right => Some(MouseAction::Secondary),
        MouseButton::Middle => None,
    }
}

/// Translate a crossterm event; events the visualizer ignores map to `None`.
pub fn to_msg(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code, modifiers, kind, ..
        }) => {
            if kind == KeyEventKind::Release {
                return None;
            }
            if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                return Some(Msg::Quit);
            }
            to_key(code).map(Msg::KeyDown)
        }
        Event::Mouse(me) => {
            let action = match me.kind {
                MouseEventKind::Down(btn) | MouseEventKind::Drag(btn) => to_action(btn)?,
                _ => return None,
            };
            Some(Msg::Mouse {
                action,
                column: me.column,
                row: me.row,
            })
        }
        Event::Resize(..) => Some(Msg::Resize),
        _ => None,
    }
}
