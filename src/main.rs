//! Firmware for a Preonic-layout (5x12 ortholinear) Dvorak keyboard, hand-wired to a Raspberry Pi
//! Pico, using the [embassy_rp] framework.

#![no_main]
#![no_std]

mod log;

mod backlight;
mod config;
mod custom;
mod debounce;
mod keyboard;
mod keycode;
mod keymap;
mod layer;
mod mouse;
mod report;
mod scan;
mod send_string;
mod usb;

use embassy_executor::Spawner;
use embassy_rp::{
    gpio::{Input, OutputOpenDrain, Level, Pull},
    pwm::{self, Pwm},
};
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};

use defmt_rtt as _;
use panic_reset as _;

use crate::log::info;

macro_rules! row_pins {
    ($dev:ident; $($pin:ident),*) => {[ $(OutputOpenDrain::new($dev.$pin, Level::High)),* ]}
}
macro_rules! column_pins {
    ($dev:ident; $($pin:ident),*) => {[ $(Input::new($dev.$pin, Pull::Up)),* ]}
}

/// Channel for [scan] to send keyboard updates to [usb], and ultimately to the host.
pub(crate) static UPDATES_CHANNEL: Channel<RawMutex, Update, 1> = Channel::new();
type RawMutex = embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
type Update = (report::Report, mouse::MouseState);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("starting");
    let p = embassy_rp::init(Default::default());

    let mut pwm_config = pwm::Config::default();
    pwm_config.top = config::BACKLIGHT_PWM_TOP;
    let led_pin_onboard = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_25, pwm_config.clone());
    let backlight_pin = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_22, pwm_config);

    let row_pins: [OutputOpenDrain; keymap::ROWS] = row_pins!(p;
        PIN_0, PIN_1, PIN_2, PIN_3, PIN_4
    );
    let mut column_pins: [Input; keymap::COLUMNS] = column_pins!(p;
        PIN_5, PIN_6, PIN_7, PIN_8, PIN_9, PIN_10, PIN_11, PIN_12, PIN_13, PIN_14, PIN_15, PIN_16
    );
    for pin in &mut column_pins {
        pin.set_schmitt(true);
    }

    let matrix = scan::KeyMatrix::new(scan::Pins {
        status_led: led_pin_onboard,
        backlight: backlight_pin,
        rows: row_pins,
        columns: column_pins,
    });
    spawner.spawn(run_matrix(matrix)).expect("spawn matrix");

    let usb_driver = embassy_rp::usb::Driver::new(p.USB, usb::Irqs);
    let (usb_device, keyboard, mouse) = usb::get_device(usb_driver);
    spawner.spawn(usb::run(usb_device, keyboard, mouse)).expect("spawn usb");
}

#[embassy_executor::task]
async fn run_matrix(mut matrix: scan::KeyMatrix<'static>) {
    let mut ticker = Ticker::every(Duration::from_micros(config::SCAN_PERIOD_MICROS));
    loop {
        let output = matrix.scan();
        if output.reset_to_bootloader {
            info!("rebooting into USB bootloader");
            embassy_rp::rom_data::reset_to_usb_boot(0, 0);
        }
        UPDATES_CHANNEL.send((output.report, output.mouse)).await;
        ticker.next().await;
    }
}
