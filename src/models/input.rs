use serde::Serialize;

/// Input-class events that count as user presence. The tracker sees each one
/// before any other handler does, so nothing downstream can swallow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputEvent {
    PointerDown,
    PointerUp,
    PointerMove,
    Click,
    KeyDown,
    KeyUp,
    Scroll,
    Wheel,
    TouchStart,
    TouchMove,
    TouchEnd,
    Focus,
    Blur,
    Input,
    Change,
}

impl InputEvent {
    pub const ALL: [InputEvent; 15] = [
        InputEvent::PointerDown,
        InputEvent::PointerUp,
        InputEvent::PointerMove,
        InputEvent::Click,
        InputEvent::KeyDown,
        InputEvent::KeyUp,
        InputEvent::Scroll,
        InputEvent::Wheel,
        InputEvent::TouchStart,
        InputEvent::TouchMove,
        InputEvent::TouchEnd,
        InputEvent::Focus,
        InputEvent::Blur,
        InputEvent::Input,
        InputEvent::Change,
    ];
}
