//! Keyboard and mouse report contents, kept as plain `Copy` values until they reach [crate::usb].

use crate::keymap::{HidKeyCode, Key, Modifiers};
use crate::mouse::MouseState;
use usbd_hid::descriptor::{KeyboardReport, MouseReport};

/// Maximum number of non-modifier keys in a boot keyboard report
pub const REPORT_KEYS: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    pub modifier: Modifiers,
    pub keycodes: [HidKeyCode; REPORT_KEYS],
}

impl Report {
    /// Adds a key and its modifiers. Returns false (and adds neither) when all key slots are
    /// taken; a key already present, or a bare modifier, always fits.
    pub fn press(&mut self, (code, mods): Key) -> bool {
        if code != 0 && !self.keycodes.contains(&code) {
            let Some(slot) = self.keycodes.iter_mut().find(|slot| **slot == 0) else {
                return false;
            };
            *slot = code;
        }
        self.modifier |= mods;
        true
    }

    /// Removes a key and its modifiers, keeping the remaining keycodes packed at the front
    pub fn release(&mut self, (code, mods): Key) {
        if code != 0 {
            if let Some(idx) = self.keycodes.iter().position(|slot| *slot == code) {
                self.keycodes[idx..].rotate_left(1);
                self.keycodes[REPORT_KEYS - 1] = 0;
            }
        }
        self.modifier &= !mods;
    }

    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|code| *code == 0)
    }
}

impl From<Report> for KeyboardReport {
    fn from(report: Report) -> Self {
        KeyboardReport {
            modifier: report.modifier,
            reserved: 0,
            leds: 0,
            keycodes: report.keycodes,
        }
    }
}

impl From<MouseState> for MouseReport {
    fn from(state: MouseState) -> Self {
        MouseReport {
            buttons: state.buttons,
            x: state.x,
            y: state.y,
            wheel: state.wheel,
            pan: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_fills_slots_in_order() {
        let mut report = Report::default();
        assert!(report.press((4, 0)));
        assert!(report.press((5, 0x02)));
        assert!(report.press((4, 0)));
        assert_eq!(report.keycodes, [4, 5, 0, 0, 0, 0]);
        assert_eq!(report.modifier, 0x02);
    }

    #[test]
    fn seventh_key_is_dropped() {
        let mut report = Report::default();
        for code in 4..10 {
            assert!(report.press((code, 0)));
        }
        assert!(!report.press((10, 0x01)));
        assert_eq!(report.keycodes, [4, 5, 6, 7, 8, 9]);
        assert_eq!(report.modifier, 0);
        assert!(report.press((0, 0x01)));
        assert_eq!(report.modifier, 0x01);
    }

    #[test]
    fn release_keeps_keys_packed() {
        let mut report = Report::default();
        report.press((4, 0));
        report.press((5, 0x01));
        report.press((6, 0));
        report.release((5, 0x01));
        assert_eq!(report.keycodes, [4, 6, 0, 0, 0, 0]);
        assert_eq!(report.modifier, 0);
        report.release((4, 0));
        report.release((6, 0));
        assert!(report.is_empty());
    }

    #[test]
    fn converts_to_hid_reports() {
        let mut report = Report::default();
        report.press((0x05, 0x01));
        let hid: KeyboardReport = report.into();
        assert_eq!(hid.modifier, 0x01);
        assert_eq!(hid.keycodes, [0x05, 0, 0, 0, 0, 0]);

        let mouse: MouseReport = MouseState { buttons: 1, x: -3, y: 2, wheel: 1 }.into();
        assert_eq!((mouse.buttons, mouse.x, mouse.y, mouse.wheel, mouse.pan), (1, -3, 2, 1, 0));
    }
}
