use strum::{AsRefStr, Display, EnumString};

/// Logical buttons the platform layer maps keys and gamepads onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Back,
    Start,
}

/// One input event for the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub button: Button,
    pub pressed: bool,
}

impl InputEvent {
    pub const fn press(button: Button) -> Self {
        Self {
            button,
            pressed: true,
        }
    }

    pub const fn release(button: Button) -> Self {
        Self {
            button,
            pressed: false,
        }
    }
}

/// Input events no state consumed this tick; conditions read them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.events.iter().any(|e| e.pressed && e.button == button)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> + '_ {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
