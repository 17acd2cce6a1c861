use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, MouseButton, PointerButtonEvent};

/// Pointer state of one window, folded from [`InputEvent`]s.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Last known pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                // A release can be lost while unfocused.
                if !f {
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
            }) => {
                self.pointer_pos = Some((x, y));
                match state {
                    ButtonState::Pressed => {
                        self.buttons_down.insert(button);
                    }
                    ButtonState::Released => {
                        self.buttons_down.remove(&button);
                    }
                }
            }

            InputEvent::Wheel(_) => {}
        }
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::WheelDelta;

    fn button(state: ButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
        })
    }

    #[test]
    fn buttons_track_press_and_release() {
        let mut s = InputState::default();
        s.apply_event(&button(ButtonState::Pressed, 10.0, 20.0));
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((10.0, 20.0)));

        s.apply_event(&button(ButtonState::Released, 11.0, 20.0));
        assert!(!s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((11.0, 20.0)));
    }

    #[test]
    fn focus_loss_clears_held_buttons() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::Focused(true));
        s.apply_event(&button(ButtonState::Pressed, 0.0, 0.0));
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.focused);
        assert!(s.buttons_down.is_empty());
    }

    #[test]
    fn pointer_leaving_forgets_position() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn pixel_wheel_converts_to_lines() {
        let d = WheelDelta::Pixel { x: 0.0, y: -80.0 };
        assert_eq!(d.lines_y(), -2.0);
        assert_eq!(WheelDelta::Line { x: 0.0, y: 1.5 }.lines_y(), 1.5);
    }
}
