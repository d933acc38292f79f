use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Player intent decoded from raw window input. Each press yields exactly
/// one command; held keys and held buttons do not repeat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum InputCommand {
    /// Zero-based index into the current scene's controls.
    SelectControl(usize),
    /// Activates the restart control when the scene is terminal.
    Confirm,
    ClickAt { x: f32, y: f32 },
    Quit,
}

#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    keys_down: HashSet<KeyCode>,
    left_mouse_is_down: bool,
    cursor_position_px: Option<(f32, f32)>,
    pending: Vec<InputCommand>,
}

impl InputCollector {
    pub(crate) fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        self.handle_key(key_event.physical_key, key_event.state);
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match state {
            ElementState::Pressed => {
                if !self.keys_down.insert(code) {
                    return;
                }
                if let Some(command) = command_for_key(code) {
                    self.pending.push(command);
                }
            }
            ElementState::Released => {
                self.keys_down.remove(&code);
            }
        }
    }

    pub(crate) fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                if !self.left_mouse_is_down {
                    if let Some((x, y)) = self.cursor_position_px {
                        self.pending.push(InputCommand::ClickAt { x, y });
                    }
                }
                self.left_mouse_is_down = true;
            }
            ElementState::Released => self.left_mouse_is_down = false,
        }
    }

    pub(crate) fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some((x, y));
    }

    pub(crate) fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    pub(crate) fn cursor_position_px(&self) -> Option<(f32, f32)> {
        self.cursor_position_px
    }

    /// Focus loss drops held state so a key released elsewhere does not
    /// swallow its next press.
    pub(crate) fn reset_held(&mut self) {
        self.keys_down.clear();
        self.left_mouse_is_down = false;
    }

    pub(crate) fn drain_commands(&mut self) -> Vec<InputCommand> {
        std::mem::take(&mut self.pending)
    }
}

fn command_for_key(code: KeyCode) -> Option<InputCommand> {
    if let Some(index) = control_index_for_key(code) {
        return Some(InputCommand::SelectControl(index));
    }
    match code {
        KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::KeyR => Some(InputCommand::Confirm),
        KeyCode::Escape => Some(InputCommand::Quit),
        _ => None,
    }
}

fn control_index_for_key(code: KeyCode) -> Option<usize> {
    let index = match code {
        KeyCode::Digit1 | KeyCode::Numpad1 => 0,
        KeyCode::Digit2 | KeyCode::Numpad2 => 1,
        KeyCode::Digit3 | KeyCode::Numpad3 => 2,
        KeyCode::Digit4 | KeyCode::Numpad4 => 3,
        KeyCode::Digit5 | KeyCode::Numpad5 => 4,
        KeyCode::Digit6 | KeyCode::Numpad6 => 5,
        KeyCode::Digit7 | KeyCode::Numpad7 => 6,
        KeyCode::Digit8 | KeyCode::Numpad8 => 7,
        KeyCode::Digit9 | KeyCode::Numpad9 => 8,
        _ => return None,
    };
    Some(index)
}
