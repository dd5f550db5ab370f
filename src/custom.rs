//! The keymap's own keycodes, and what happens when they're pressed and released.
//!
//! * [CustomKey::Layer1] / [CustomKey::Layer2] - momentary layer 1 / 2, with backlight level 1 / 2
//!   while held
//! * [CustomKey::Caps] - tap caps lock, with backlight level 3 while caps lock is on
//! * [CustomKey::Tmux] - send Ctrl+B then the window number

use crate::keycode::KeyCode;
use crate::keymap::{Thing, ADJUST, LOWER, RAISE};
use crate::log::info;
use crate::send_string::Stroke;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CustomKey {
    Layer1,
    Layer2,
    Caps,
    /// Switch to tmux window 0-9
    Tmux(u8),
}

/// Whether a key went down or up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Pressed,
    Released,
}

impl KeyEvent {
    pub fn pressed(self) -> bool {
        self == KeyEvent::Pressed
    }
}

/// Things the handler can make the keyboard do
pub trait Effects {
    fn backlight_set(&mut self, level: u8);
    fn layer_on(&mut self, layer: u8);
    fn layer_off(&mut self, layer: u8);
    /// Turn `c` on if `a` and `b` are both on, otherwise off
    fn update_tri_layer(&mut self, a: u8, b: u8, c: u8);
    fn send_string(&mut self, strokes: &[Stroke]);
}

/// State owned by the handler rather than the keyboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserState {
    /// Tracks caps lock as toggled from this keyboard (the host's own state is not consulted)
    pub capslock_enabled: bool,
}

const BACKLIGHT_ENABLE: bool = cfg!(feature = "backlight");

/// Handles a key event for `thing`. Returns false if the event was consumed here, or true if the
/// keyboard should go on to handle it as usual.
pub fn process_record_user(
    thing: Thing,
    event: KeyEvent,
    state: &mut UserState,
    fx: &mut impl Effects,
) -> bool {
    let Thing::Custom(custom) = thing else {
        return true;
    };

    match custom {
        CustomKey::Layer1 => momentary_layer(LOWER, event, fx),
        CustomKey::Layer2 => momentary_layer(RAISE, event, fx),
        CustomKey::Caps => {
            if event.pressed() {
                fx.send_string(&[Stroke::Tap(KeyCode::CapsLock)]);
                state.capslock_enabled = !state.capslock_enabled;
                info!("caps lock {}", state.capslock_enabled);
                if BACKLIGHT_ENABLE {
                    fx.backlight_set(if state.capslock_enabled { 3 } else { 0 });
                }
            }
        }
        CustomKey::Tmux(window) => {
            if event.pressed() {
                fx.send_string(&[
                    Stroke::Down(KeyCode::LCtrl),
                    Stroke::Text("b"),
                    Stroke::Up(KeyCode::LCtrl),
                    Stroke::Char(b'0' + window % 10),
                ]);
            }
        }
    }
    false
}

/// The layer is on (and backlight at the layer's level) only while the key is held
fn momentary_layer(layer: u8, event: KeyEvent, fx: &mut impl Effects) {
    if event.pressed() {
        if BACKLIGHT_ENABLE {
            fx.backlight_set(layer);
        }
        fx.layer_on(layer);
    } else {
        if BACKLIGHT_ENABLE {
            fx.backlight_set(0);
        }
        fx.layer_off(layer);
    }
    fx.update_tri_layer(LOWER, RAISE, ADJUST);
}
