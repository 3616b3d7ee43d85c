//! winit events -> scene commands.

use corelib::input::{Command, command_for_key};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::Key;

/// Command bound to a pressed key, if any.
pub fn key_command(key: &Key) -> Option<Command> {
    match key {
        Key::Character(text) => command_for_key(&text.to_lowercase()),
        _ => None,
    }
}

/// Left-button drag tracking for orbit control.
#[derive(Debug, Default)]
pub struct DragTracker {
    pressed: bool,
    last: Option<(f64, f64)>,
}

impl DragTracker {
    pub fn button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.pressed = state == ElementState::Pressed;
        }
    }

    /// Cursor moved to `(x, y)` on a canvas `height` pixels tall.
    pub fn moved(&mut self, x: f64, y: f64, height: u32) -> Option<Command> {
        let previous = self.last.replace((x, y));
        if !self.pressed {
            return None;
        }
        let (px, py) = previous?;
        let (dx, dy) = ((x - px) as f32, (y - py) as f32);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(Command::OrbitDrag {
            dx,
            dy,
            height: height.max(1) as f32,
        })
    }

    pub fn left(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::arm::Joint;
    use winit::keyboard::{NamedKey, SmolStr};

    #[test]
    fn characters_map_to_commands() {
        assert_eq!(
            key_command(&Key::Character(SmolStr::new("W"))),
            Some(Command::Joint {
                joint: Joint::ElbowPitch,
                increase: true
            })
        );
        assert_eq!(
            key_command(&Key::Character(SmolStr::new("+"))),
            Some(Command::ZoomIn)
        );
        assert_eq!(key_command(&Key::Named(NamedKey::Space)), None);
    }

    #[test]
    fn drag_needs_the_left_button() {
        let mut drag = DragTracker::default();
        assert_eq!(drag.moved(10.0, 10.0, 600), None);
        drag.button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(
            drag.moved(40.0, 10.0, 600),
            Some(Command::OrbitDrag {
                dx: 30.0,
                dy: 0.0,
                height: 600.0
            })
        );
        drag.button(MouseButton::Left, ElementState::Released);
        assert_eq!(drag.moved(90.0, 10.0, 600), None);
    }

    #[test]
    fn first_move_after_leaving_is_not_a_jump() {
        let mut drag = DragTracker::default();
        drag.button(MouseButton::Left, ElementState::Pressed);
        drag.moved(0.0, 0.0, 100);
        drag.left();
        assert_eq!(drag.moved(500.0, 500.0, 100), None);
    }
}
