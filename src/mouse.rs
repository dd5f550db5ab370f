//! Mouse keys: turns held [MouseKey]s into a stream of mouse reports.

use crate::config::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseKey {
    Up,
    Down,
    Left,
    Right,
    WheelUp,
    WheelDown,
    Button1,
    Button2,
    /// Slowest constant speed while held
    Accel0,
    Accel1,
    /// Fastest constant speed while held
    Accel2,
}

/// Contents of a HID mouse report. Screen y grows downwards, wheel grows upwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseState {
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
}

impl MouseState {
    pub fn is_moving(&self) -> bool {
        self.x != 0 || self.y != 0 || self.wheel != 0
    }
}

/// Which mouse keys are currently held, and for how long movement has been going on
#[derive(Default)]
pub struct MouseKeys {
    held: u16,
    move_ticks: u16,
    wheel_ticks: u16,
}

const fn bit(key: MouseKey) -> u16 {
    1 << key as u16
}

const DIRECTIONS: u16 = bit(MouseKey::Up) | bit(MouseKey::Down) | bit(MouseKey::Left) | bit(MouseKey::Right);
const WHEELS: u16 = bit(MouseKey::WheelUp) | bit(MouseKey::WheelDown);

impl MouseKeys {
    pub fn press(&mut self, key: MouseKey) {
        if bit(key) & DIRECTIONS != 0 && self.held & DIRECTIONS == 0 {
            self.move_ticks = 0;
        }
        if bit(key) & WHEELS != 0 && self.held & WHEELS == 0 {
            self.wheel_ticks = 0;
        }
        self.held |= bit(key);
    }

    pub fn release(&mut self, key: MouseKey) {
        self.held &= !bit(key);
    }

    fn is_held(&self, key: MouseKey) -> bool {
        self.held & bit(key) != 0
    }

    fn speed(&self) -> i8 {
        if self.is_held(MouseKey::Accel2) {
            MOUSE_CONSTANT_SPEEDS[2]
        } else if self.is_held(MouseKey::Accel1) {
            MOUSE_CONSTANT_SPEEDS[1]
        } else if self.is_held(MouseKey::Accel0) {
            MOUSE_CONSTANT_SPEEDS[0]
        } else {
            let ramp = (MOUSE_MAX_SPEED - MOUSE_BASE_SPEED) as u32;
            let elapsed = self.move_ticks.min(MOUSE_RAMP_TICKS) as u32;
            MOUSE_BASE_SPEED + (ramp * elapsed / MOUSE_RAMP_TICKS as u32) as i8
        }
    }

    /// Produce the report for this tick. Movement is only emitted every [MOUSE_MOVE_INTERVAL]
    /// ticks (starting with the first tick a direction is held), wheel steps every
    /// [MOUSE_WHEEL_INTERVAL] ticks.
    pub fn tick(&mut self) -> MouseState {
        let mut state = MouseState::default();
        if self.is_held(MouseKey::Button1) {
            state.buttons |= 0x01;
        }
        if self.is_held(MouseKey::Button2) {
            state.buttons |= 0x02;
        }

        if self.held & DIRECTIONS != 0 {
            if self.move_ticks % MOUSE_MOVE_INTERVAL == 0 {
                let speed = self.speed();
                let axis = |neg: MouseKey, pos: MouseKey| match (self.is_held(neg), self.is_held(pos)) {
                    (true, false) => -speed,
                    (false, true) => speed,
                    _ => 0,
                };
                state.x = axis(MouseKey::Left, MouseKey::Right);
                state.y = axis(MouseKey::Up, MouseKey::Down);
            }
            self.move_ticks = self.move_ticks.saturating_add(1);
        }

        if self.held & WHEELS != 0 {
            if self.wheel_ticks % MOUSE_WHEEL_INTERVAL == 0 {
                state.wheel = match (self.is_held(MouseKey::WheelDown), self.is_held(MouseKey::WheelUp)) {
                    (true, false) => -1,
                    (false, true) => 1,
                    _ => 0,
                };
            }
            self.wheel_ticks = self.wheel_ticks.wrapping_add(1);
        }

        state
    }
}
