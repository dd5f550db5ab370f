//! Backlight level, from 0 (off) to [BACKLIGHT_LEVELS], and the PWM duty that goes with it.

use crate::config::{BACKLIGHT_DUTY, BACKLIGHT_LEVELS};

/// Backlight adjustments available from the keymap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightOp {
    /// Off, or back on at the last level it was on at
    Toggle,
    /// Cycle through every level, wrapping back to off
    Step,
    Increase,
    Decrease,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backlight {
    level: u8,
    last_on_level: u8,
}

impl Default for Backlight {
    fn default() -> Self {
        Backlight { level: 0, last_on_level: BACKLIGHT_LEVELS }
    }
}

impl Backlight {
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set(&mut self, level: u8) {
        self.level = level.min(BACKLIGHT_LEVELS);
        if self.level > 0 {
            self.last_on_level = self.level;
        }
    }

    pub fn apply(&mut self, op: BacklightOp) {
        match op {
            BacklightOp::Toggle => {
                if self.level == 0 {
                    self.set(self.last_on_level)
                } else {
                    self.set(0)
                }
            }
            BacklightOp::Step => self.set((self.level + 1) % (BACKLIGHT_LEVELS + 1)),
            BacklightOp::Increase => self.set(self.level.saturating_add(1)),
            BacklightOp::Decrease => self.set(self.level.saturating_sub(1)),
        }
    }

    pub fn duty(&self) -> u16 {
        BACKLIGHT_DUTY[self.level as usize]
    }
}
