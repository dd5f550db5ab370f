//! Implements the key matrix: scanning for key presses and driving the backlight. Feeds the
//! [crate::debounce::Debouncer] and [crate::keyboard::Keyboard], whose output is sent out by
//! [crate::usb].

use crate::debounce::Debouncer;
use crate::keyboard::{Keyboard, Output};
use crate::keymap::{COLUMNS, ROWS};
use embassy_rp::{
    gpio::{Input, OutputOpenDrain},
    pwm::{Pwm, SetDutyCycle},
};
use embassy_time::{block_for, Duration};

/// How long to let a row settle after driving it, before reading columns
const SETTLE_TIME: Duration = Duration::from_micros(10);

pub struct KeyMatrix<'a> {
    debouncer: Debouncer,
    keyboard: Keyboard,
    pins: Pins<'a>,
}

pub struct Pins<'a> {
    /// Lit while caps lock is on
    pub status_led: Pwm<'a>,
    pub backlight: Pwm<'a>,
    pub rows: [OutputOpenDrain<'a>; ROWS],
    pub columns: [Input<'a>; COLUMNS],
}

trait ConvenientPwm {
    fn on(&mut self);
    fn off(&mut self);
    fn pwm_duty_u16(&mut self, duty: u16);
}
impl ConvenientPwm for Pwm<'_> {
    fn on(&mut self) { self.set_duty_cycle_fully_on().expect("pwm"); }
    fn off(&mut self) { self.set_duty_cycle_fully_off().expect("pwm"); }
    fn pwm_duty_u16(&mut self, duty: u16) { self.set_duty_cycle(duty).expect("pwm"); }
}

impl<'a> KeyMatrix<'a> {
    pub fn new(pins: Pins<'a>) -> Self {
        KeyMatrix {
            debouncer: Default::default(),
            keyboard: Keyboard::new(),
            pins,
        }
    }

    pub fn scan(&mut self) -> Output {
        let mut raw = [[false; COLUMNS]; ROWS];
        for (row, raw_row) in self.pins.rows.iter_mut().zip(&mut raw) {
            row.set_low();
            block_for(SETTLE_TIME);
            for (column, pressed) in self.pins.columns.iter().zip(raw_row) {
                *pressed = column.is_low();
            }
            row.set_high();
            block_for(SETTLE_TIME);
        }

        let pressed = self.debouncer.tick(&raw);
        let output = self.keyboard.tick(&pressed);

        self.pins.backlight.pwm_duty_u16(output.backlight_duty);
        if self.keyboard.user_state().capslock_enabled {
            self.pins.status_led.on()
        } else {
            self.pins.status_led.off()
        }

        output
    }
}
