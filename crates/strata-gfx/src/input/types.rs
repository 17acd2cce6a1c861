/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Wheel delta as reported by the platform.
///
/// `Line` is notched-wheel input; `Pixel` comes from touchpads and other
/// high precision devices, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl WheelDelta {
    /// Logical pixels per wheel line when converting pixel deltas.
    pub const PIXELS_PER_LINE: f32 = 40.0;

    /// Vertical delta in lines. Positive scrolls away from the user.
    pub fn lines_y(&self) -> f32 {
        match *self {
            WheelDelta::Line { y, .. } => y,
            WheelDelta::Pixel { y, .. } => y / Self::PIXELS_PER_LINE,
        }
    }
}

/// Pointer button transition at a position in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: ButtonState,
    pub x: f32,
    pub y: f32,
}

/// Platform-agnostic pointer input.
///
/// Positions are logical pixels with the origin at the top-left corner of the
/// drawable and y growing downward.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerButton(PointerButtonEvent),
    Wheel(WheelDelta),
    /// Pointer left the drawable.
    PointerLeft,
    Focused(bool),
}
