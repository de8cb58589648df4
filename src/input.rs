//! Keyboard and on-screen button state
//!
//! Hosts forward raw key names and button presses here; the game reads one
//! [`InputIntent`] snapshot per tick. Keys and buttons are tracked apart so
//! lifting a key never cancels a finger still on a button.

use crate::sim::InputIntent;

/// A steering/throttle control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Accelerate,
    Decelerate,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::Left,
        Control::Right,
        Control::Accelerate,
        Control::Decelerate,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Map a DOM-style key name to a control
pub fn control_for_key(key: &str) -> Option<Control> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Control::Left),
        "ArrowRight" | "d" | "D" => Some(Control::Right),
        "ArrowUp" | "w" | "W" => Some(Control::Accelerate),
        "ArrowDown" | "s" | "S" => Some(Control::Decelerate),
        _ => None,
    }
}

/// Held controls from every input device
#[derive(Debug, Clone, Default)]
pub struct IntentSource {
    keys: [bool; 4],
    buttons: [bool; 4],
}

impl IntentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Returns true if the key is bound (host should
    /// suppress its default action).
    pub fn key_down(&mut self, key: &str) -> bool {
        match control_for_key(key) {
            Some(control) => {
                self.keys[control.index()] = true;
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match control_for_key(key) {
            Some(control) => {
                self.keys[control.index()] = false;
                true
            }
            None => false,
        }
    }

    pub fn button_press(&mut self, control: Control) {
        self.buttons[control.index()] = true;
    }

    pub fn button_release(&mut self, control: Control) {
        self.buttons[control.index()] = false;
    }

    /// Pointer left the button or the touch was cancelled
    pub fn button_cancel(&mut self, control: Control) {
        self.button_release(control);
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.keys = [false; 4];
        self.buttons = [false; 4];
        log::debug!("Input: released all controls");
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.keys[control.index()] || self.buttons[control.index()]
    }

    /// Snapshot for the next tick
    pub fn intent(&self) -> InputIntent {
        InputIntent {
            left: self.is_held(Control::Left),
            right: self.is_held(Control::Right),
            accelerate: self.is_held(Control::Accelerate),
            decelerate: self.is_held(Control::Decelerate),
        }
    }
}
