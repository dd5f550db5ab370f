//! Compile-time tunables. One "tick" is one pass of the matrix scan loop, which runs every
//! [SCAN_PERIOD_MICROS].

pub const SCAN_PERIOD_MICROS: u64 = 1000;

/// How many consecutive released readings before a key counts as released
pub const DEBOUNCE_TICKS: u8 = 5;

/// How long a mod-tap key must be held before it counts as its modifier instead of its key
pub const TAPPING_TERM_TICKS: u16 = 200;

/// Number of non-zero backlight levels
pub const BACKLIGHT_LEVELS: u8 = 3;

/// PWM duty for each backlight level, out of [BACKLIGHT_PWM_TOP]
pub const BACKLIGHT_DUTY: [u16; BACKLIGHT_LEVELS as usize + 1] = [0, 1400, 6000, 20000];
pub const BACKLIGHT_PWM_TOP: u16 = 20000;

/// Mouse cursor speed (pixels per report) while ACL0, ACL1 or ACL2 is held
pub const MOUSE_CONSTANT_SPEEDS: [i8; 3] = [1, 4, 12];
/// Cursor speed at the start of a movement without an acceleration key held
pub const MOUSE_BASE_SPEED: i8 = 1;
/// Cursor speed reached after [MOUSE_RAMP_TICKS]
pub const MOUSE_MAX_SPEED: i8 = 10;
pub const MOUSE_RAMP_TICKS: u16 = 300;
/// Ticks between movement reports while a direction is held
pub const MOUSE_MOVE_INTERVAL: u16 = 16;
/// Ticks between wheel steps while a wheel key is held
pub const MOUSE_WHEEL_INTERVAL: u16 = 80;

pub const USB_VID: u16 = 0xfeed;
pub const USB_PID: u16 = 0x6061;
pub const USB_MANUFACTURER: &str = "philh";
pub const USB_PRODUCT: &str = "Preonic Dvorak (Pico)";
