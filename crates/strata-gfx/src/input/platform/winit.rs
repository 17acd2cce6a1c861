use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};

use crate::input::{
    ButtonState, InputEvent, InputState, MouseButton, PointerButtonEvent, WheelDelta,
};

/// Translates a winit `WindowEvent` into an [`InputEvent`].
///
/// `scale_factor` is the window's current scale factor; positions come out in
/// logical pixels. Returns `None` for events the input subsystem does not
/// represent (keyboard, resize, redraw, ...).
pub fn translate_window_event(
    scale_factor: f64,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(scale_factor, *position);
            Some(InputEvent::PointerMoved { x, y })
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let st = match st {
                ElementState::Pressed => ButtonState::Pressed,
                ElementState::Released => ButtonState::Released,
            };

            // winit 0.30 has no cursor query; use the tracked position.
            let (x, y) = state.pointer_pos.unwrap_or((0.0, 0.0));

            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: st,
                x,
                y,
            }))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => WheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(scale_factor, *p);
                    WheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::Wheel(delta))
        }

        _ => None,
    }
}

fn to_logical_f32(scale_factor: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale_factor);
    (logical.x as f32, logical.y as f32)
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> winit::event::DeviceId {
        // SAFETY: the dummy id is only compared, never handed to a backend.
        unsafe { winit::event::DeviceId::dummy() }
    }

    #[test]
    fn wheel_lines_pass_through() {
        let ev = WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, -1.0),
            phase: winit::event::TouchPhase::Moved,
        };
        let out = translate_window_event(1.0, &InputState::default(), &ev);
        assert_eq!(out, Some(InputEvent::Wheel(WheelDelta::Line { x: 0.0, y: -1.0 })));
    }

    #[test]
    fn cursor_positions_become_logical() {
        let ev = WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(200.0, 100.0),
        };
        let out = translate_window_event(2.0, &InputState::default(), &ev);
        assert_eq!(out, Some(InputEvent::PointerMoved { x: 100.0, y: 50.0 }));
    }

    #[test]
    fn button_uses_tracked_pointer_position() {
        let state = InputState {
            pointer_pos: Some((7.0, 9.0)),
            ..Default::default()
        };
        let ev = WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Left,
        };
        match translate_window_event(1.0, &state, &ev) {
            Some(InputEvent::PointerButton(b)) => {
                assert_eq!(b.button, MouseButton::Left);
                assert_eq!(b.state, ButtonState::Pressed);
                assert_eq!((b.x, b.y), (7.0, 9.0));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
