//! Turns the debounced key matrix into reports, once per scan tick: works out which [Thing] each
//! key press lands on, runs it past [process_record_user], and does the usual thing with whatever
//! falls through.

use crate::backlight::Backlight;
use crate::config::TAPPING_TERM_TICKS;
use crate::custom::{process_record_user, Effects, KeyEvent, UserState};
use crate::keymap::{Key, Thing, COLUMNS, ROWS};
use crate::layer::LayerState;
use crate::log::{debug, info};
use crate::mouse::{MouseKeys, MouseState};
use crate::report::Report;
use crate::send_string::{expand, ReportQueue, Stroke};

/// Which keys are physically down
pub type Matrix = [[bool; COLUMNS]; ROWS];

/// Everything that should happen as a result of one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Output {
    pub report: Report,
    pub mouse: MouseState,
    pub backlight_duty: u16,
    pub reset_to_bootloader: bool,
}

/// A key that is down, and what it was resolved to when it went down
#[derive(Clone, Copy, Debug)]
struct Held {
    thing: Thing,
    /// For a [Thing::ModTap], whether it has turned into its modifiers
    as_hold: bool,
    /// Press count when it went down; earlier presses win a place in a full report
    order: u32,
}

/// A mod-tap key that hasn't yet been decided as a tap or a hold
#[derive(Clone, Copy, Debug)]
struct Pending {
    row: usize,
    col: usize,
    ticks: u16,
}

/// The state that [process_record_user] is allowed to change
#[derive(Default)]
struct Actions {
    layers: LayerState,
    backlight: Backlight,
    queue: ReportQueue,
}

impl Effects for Actions {
    fn backlight_set(&mut self, level: u8) {
        self.backlight.set(level);
    }

    fn layer_on(&mut self, layer: u8) {
        self.layers.layer_on(layer);
        info!("layer {} on", layer);
    }

    fn layer_off(&mut self, layer: u8) {
        self.layers.layer_off(layer);
        info!("layer {} off", layer);
    }

    fn update_tri_layer(&mut self, a: u8, b: u8, c: u8) {
        self.layers.update_tri_layer(a, b, c);
    }

    fn send_string(&mut self, strokes: &[Stroke]) {
        // a full queue has already been logged, and the rest of the sequence is dropped
        expand(strokes, &mut self.queue).ok();
    }
}

#[derive(Default)]
pub struct Keyboard {
    previous: Matrix,
    held: [[Option<Held>; COLUMNS]; ROWS],
    pending: Option<Pending>,
    fx: Actions,
    user: UserState,
    mouse: MouseKeys,
    reset_to_bootloader: bool,
    presses: u32,
}

impl Keyboard {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn layers(&self) -> &LayerState {
        &self.fx.layers
    }

    pub fn user_state(&self) -> &UserState {
        &self.user
    }

    pub fn backlight_level(&self) -> u8 {
        self.fx.backlight.level()
    }

    pub fn tick(&mut self, pressed: &Matrix) -> Output {
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                match (self.previous[row][col], pressed[row][col]) {
                    (false, true) => self.on_press(row, col),
                    (true, false) => self.on_release(row, col),
                    _ => {}
                }
            }
        }
        self.previous = *pressed;

        if let Some(pending) = &mut self.pending {
            pending.ticks = pending.ticks.saturating_add(1);
            if pending.ticks >= TAPPING_TERM_TICKS {
                self.resolve_pending_as_hold();
            }
        }

        let report = match self.fx.queue.pop() {
            Some(injected) => injected,
            None => self.held_report(),
        };

        Output {
            report,
            mouse: self.mouse.tick(),
            backlight_duty: self.fx.backlight.duty(),
            reset_to_bootloader: core::mem::take(&mut self.reset_to_bootloader),
        }
    }

    fn on_press(&mut self, row: usize, col: usize) {
        if self.pending.is_some() {
            self.resolve_pending_as_hold();
        }

        let thing = self.fx.layers.resolve(row, col);
        debug!("press ({}, {}) -> {}", row, col, thing);
        self.presses = self.presses.wrapping_add(1);
        self.held[row][col] = Some(Held { thing, as_hold: false, order: self.presses });

        if !process_record_user(thing, KeyEvent::Pressed, &mut self.user, &mut self.fx) {
            return;
        }
        match thing {
            Thing::ModTap(..) => self.pending = Some(Pending { row, col, ticks: 0 }),
            Thing::Mouse(key) => self.mouse.press(key),
            Thing::Backlight(op) => self.fx.backlight.apply(op),
            Thing::Bootloader => {
                info!("resetting to bootloader");
                self.reset_to_bootloader = true;
            }
            Thing::RealKey(_) | Thing::Custom(_) | Thing::Transparent | Thing::Inactive => {}
        }
    }

    fn on_release(&mut self, row: usize, col: usize) {
        let Some(held) = self.held[row][col].take() else {
            return;
        };

        if !process_record_user(held.thing, KeyEvent::Released, &mut self.user, &mut self.fx) {
            return;
        }
        match held.thing {
            Thing::ModTap(_, key) => {
                if matches!(self.pending, Some(p) if p.row == row && p.col == col) {
                    self.pending = None;
                    self.inject_tap(key);
                }
            }
            Thing::Mouse(key) => self.mouse.release(key),
            _ => {}
        }
    }

    fn resolve_pending_as_hold(&mut self) {
        if let Some(Pending { row, col, .. }) = self.pending.take() {
            if let Some(held) = &mut self.held[row][col] {
                held.as_hold = true;
            }
        }
    }

    /// Queue a press and release of `key` on top of whatever else is held
    fn inject_tap(&mut self, key: Key) {
        let base = self.held_report();
        let mut pressed = base;
        pressed.press(key);
        let queued = self.fx.queue.push(pressed).and_then(|_| self.fx.queue.push(base));
        if queued.is_err() {
            debug!("no room to queue mod-tap tap");
        }
    }

    /// The report for the keys currently down, filled in the order they were pressed
    fn held_report(&self) -> Report {
        let mut report = Report::default();
        let mut last = None;
        while let Some(held) = self
            .held
            .iter()
            .flatten()
            .flatten()
            .filter(|held| last.map_or(true, |order| held.order > order))
            .min_by_key(|held| held.order)
        {
            last = Some(held.order);
            let key = match held.thing {
                Thing::RealKey(key) => key,
                Thing::ModTap(mods, _) if held.as_hold => (0, mods),
                _ => continue,
            };
            if !report.press(key) {
                debug!("report full, dropping key {}", key.0);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BACKLIGHT_DUTY, MOUSE_BASE_SPEED};
    use crate::keycode::KeyCode;
    use crate::backlight::BacklightOp;
    use crate::custom::CustomKey;
    use crate::keymap::{ADJUST, LOWER, RAISE};

    const A: (usize, usize) = (2, 1);
    const O: (usize, usize) = (2, 2);
    const LSHIFT: (usize, usize) = (3, 0);
    const LAYER1: (usize, usize) = (4, 0);
    const LAYER2: (usize, usize) = (4, 11);
    const LBRC_MT: (usize, usize) = (0, 0);
    const BSLS_MT: (usize, usize) = (4, 9);

    #[derive(Default)]
    struct Harness {
        keyboard: Keyboard,
        matrix: Matrix,
    }

    impl Harness {
        fn press(&mut self, (row, col): (usize, usize)) -> Output {
            self.matrix[row][col] = true;
            self.keyboard.tick(&self.matrix)
        }

        fn release(&mut self, (row, col): (usize, usize)) -> Output {
            self.matrix[row][col] = false;
            self.keyboard.tick(&self.matrix)
        }

        fn idle(&mut self) -> Output {
            self.keyboard.tick(&self.matrix)
        }
    }

    fn keys(codes: &[KeyCode]) -> [u8; 6] {
        let mut out = [0; 6];
        for (slot, code) in out.iter_mut().zip(codes) {
            *slot = *code as u8;
        }
        out
    }

    #[test]
    fn types_dvorak() {
        let mut h = Harness::default();
        assert_eq!(h.press(A).report.keycodes, keys(&[KeyCode::A]));
        assert_eq!(h.press(O).report.keycodes, keys(&[KeyCode::A, KeyCode::O]));
        assert_eq!(h.release(A).report.keycodes, keys(&[KeyCode::O]));
        assert!(h.release(O).report.is_empty());
    }

    #[test]
    fn modifiers() {
        let mut h = Harness::default();
        h.press(LSHIFT);
        let out = h.press(A);
        assert_eq!(out.report.modifier, 0x02);
        assert_eq!(out.report.keycodes, keys(&[KeyCode::A]));
    }

    #[test]
    fn seven_keys_fit_six() {
        let mut h = Harness::default();
        for col in 2..=7 {
            h.press((2, col));
        }
        let first_six = keys(&[KeyCode::O, KeyCode::E, KeyCode::U, KeyCode::I, KeyCode::D, KeyCode::H]);
        assert_eq!(first_six, [18, 8, 24, 12, 7, 11]);

        // A sits before all of them in the matrix, but was pressed last
        assert_eq!(h.press(A).report.keycodes, first_six);
        assert_eq!(h.idle().report.keycodes, first_six);

        assert_eq!(
            h.release((2, 7)).report.keycodes,
            keys(&[KeyCode::O, KeyCode::E, KeyCode::U, KeyCode::I, KeyCode::D, KeyCode::A])
        );
    }

    #[test]
    fn report_follows_press_order() {
        let mut h = Harness::default();
        h.press(O);
        assert_eq!(h.press(A).report.keycodes, keys(&[KeyCode::O, KeyCode::A]));
    }

    #[cfg(feature = "backlight")]
    #[test]
    fn layer1_is_momentary_with_backlight() {
        let mut h = Harness::default();
        let out = h.press(LAYER1);
        assert!(out.report.is_empty());
        assert_eq!(out.backlight_duty, BACKLIGHT_DUTY[1]);
        assert!(h.keyboard.layers().is_on(LOWER));

        let out = h.release(LAYER1);
        assert_eq!(out.backlight_duty, BACKLIGHT_DUTY[0]);
        assert!(!h.keyboard.layers().is_on(LOWER));
    }

    #[test]
    fn layer_keys_pass_through_lower_layers() {
        let mut h = Harness::default();
        h.press(LAYER1);
        assert_eq!(h.press((1, 0)).report.keycodes, keys(&[KeyCode::Tab]));
        assert_eq!(h.press((1, 8)).report.keycodes, keys(&[KeyCode::Tab, KeyCode::UP]));
        assert!(h.press((1, 1)).report.keycodes[2] == 0);
    }

    #[test]
    fn release_uses_thing_from_press() {
        let mut h = Harness::default();
        h.press(LAYER1);
        assert_eq!(h.press((1, 8)).report.keycodes, keys(&[KeyCode::UP]));
        assert_eq!(h.release(LAYER1).report.keycodes, keys(&[KeyCode::UP]));
        assert!(h.release((1, 8)).report.is_empty());
    }

    #[test]
    fn both_layer_keys_give_adjust() {
        let mut h = Harness::default();
        h.press(LAYER1);
        h.press(LAYER2);
        assert!(h.keyboard.layers().is_on(ADJUST));
        assert_eq!(h.keyboard.layers().highest(), ADJUST);

        assert!(h.press((1, 11)).reset_to_bootloader);
        assert!(!h.idle().reset_to_bootloader);

        h.release(LAYER1);
        assert!(!h.keyboard.layers().is_on(ADJUST));
        assert!(h.keyboard.layers().is_on(RAISE));
    }

    #[test]
    fn adjust_covers_raise() {
        let mut h = Harness::default();
        h.press(LAYER2);
        assert_eq!(h.keyboard.layers().resolve(0, 1), Thing::Custom(CustomKey::Tmux(1)));
        h.press(LAYER1);
        assert_eq!(h.keyboard.layers().resolve(0, 1), Thing::Backlight(BacklightOp::Toggle));
        assert_eq!(h.keyboard.layers().resolve(0, 11), Thing::Custom(CustomKey::Caps));

        // no tmux sequence is typed
        assert!(h.press((0, 1)).report.is_empty());
        for _ in 0..6 {
            assert!(h.idle().report.is_empty());
        }
    }

    #[test]
    fn adjust_backlight_step() {
        let mut h = Harness::default();
        h.press(LAYER1);
        h.press(LAYER2);
        let before = h.keyboard.backlight_level();
        let out = h.press((0, 4));
        assert_eq!(h.keyboard.backlight_level(), (before + 1) % 4);
        assert_eq!(out.backlight_duty, BACKLIGHT_DUTY[h.keyboard.backlight_level() as usize]);
    }

    #[test]
    fn caps_taps_caps_lock() {
        let mut h = Harness::default();
        h.press(LAYER1);
        let out = h.press((0, 11));
        assert_eq!(out.report.keycodes, keys(&[KeyCode::CapsLock]));
        assert!(h.idle().report.is_empty());
        assert!(h.keyboard.user_state().capslock_enabled);
        if cfg!(feature = "backlight") {
            assert_eq!(h.keyboard.backlight_level(), 3);
        }

        h.release((0, 11));
        h.press((0, 11));
        assert!(!h.keyboard.user_state().capslock_enabled);
    }

    #[test]
    fn tmux_window_switch() {
        let mut h = Harness::default();
        h.press(LAYER2);
        let mut reports = vec![h.press((0, 3)).report];
        for _ in 0..6 {
            reports.push(h.idle().report);
        }
        let mut expected = [Report::default(); 7];
        expected[0].modifier = 0x01;
        expected[1].modifier = 0x01;
        expected[1].keycodes[0] = KeyCode::B as u8;
        expected[2].modifier = 0x01;
        expected[4].keycodes[0] = KeyCode::Kc3 as u8;
        assert_eq!(reports, expected);
    }

    #[test]
    fn mod_tap_tapped() {
        let mut h = Harness::default();
        assert!(h.press(LBRC_MT).report.is_empty());
        for _ in 0..10 {
            assert!(h.idle().report.is_empty());
        }
        assert_eq!(h.release(LBRC_MT).report.keycodes, keys(&[KeyCode::LeftBracket]));
        assert!(h.idle().report.is_empty());
    }

    #[test]
    fn mod_tap_held_past_tapping_term() {
        let mut h = Harness::default();
        h.press(LBRC_MT);
        let mut out = Output::default();
        for _ in 0..TAPPING_TERM_TICKS {
            out = h.idle();
        }
        assert_eq!(out.report.modifier, 0x01 | 0x02);
        assert_eq!(out.report.keycodes, [0; 6]);

        assert!(h.release(LBRC_MT).report.is_empty());
        assert!(h.idle().report.is_empty());
    }

    #[test]
    fn mod_tap_held_when_another_key_pressed() {
        let mut h = Harness::default();
        h.press(BSLS_MT);
        let out = h.press(A);
        assert_eq!(out.report.modifier, 0x01);
        assert_eq!(out.report.keycodes, keys(&[KeyCode::A]));
        h.release(A);
        assert!(h.release(BSLS_MT).report.is_empty());
    }

    #[test]
    fn mouse_keys() {
        let mut h = Harness::default();
        h.press(LAYER2);
        let out = h.press((1, 3));
        assert_eq!(out.mouse.y, -MOUSE_BASE_SPEED);
        assert!(out.report.is_empty());
        h.release((1, 3));
        assert_eq!(h.press((4, 5)).mouse.buttons, 0x01);
        assert_eq!(h.release((4, 5)).mouse.buttons, 0);
    }
}
