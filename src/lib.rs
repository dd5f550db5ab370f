//! This "library" build is here as a hack for loading unit tests to run on local arch, without depending on any hardware-related stuff.
//! (This is necessary as main.rs is inherently hardware-related code.)
//! See the `run-tests` script in the project root for more information.

#![cfg_attr(not(test), no_std)]

#[allow(unused_macros)]
mod log;

#[allow(dead_code, unused_imports)]
mod backlight;
#[allow(dead_code, unused_imports)]
mod config;
#[allow(dead_code, unused_imports)]
mod custom;
#[allow(dead_code, unused_imports)]
mod debounce;
#[allow(dead_code, unused_imports)]
mod keyboard;
#[allow(dead_code, unused_imports)]
mod keycode;
#[allow(dead_code, unused_imports)]
mod keymap;
#[allow(dead_code, unused_imports)]
mod layer;
#[allow(dead_code, unused_imports)]
mod mouse;
#[allow(dead_code, unused_imports)]
mod report;
#[allow(dead_code, unused_imports)]
mod send_string;
