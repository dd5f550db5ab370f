//! Defines key functions (here called [Thing]s) and the layers of mapping from physical keys to
//! these [Thing]s.
//!
//! Layers are looked up by [crate::layer], which decides which layer a key press lands on, and
//! custom [Thing]s are interpreted by [crate::custom].

use crate::backlight::BacklightOp;
use crate::custom::CustomKey;
use crate::keycode::KeyCode::{self, *};
use crate::keycode::modifier_bit;
use crate::mouse::MouseKey;

pub type HidKeyCode = u8;
pub type Modifiers = u8;
pub type Key = (HidKeyCode, Modifiers);

/// A Thing which a keypress should Do
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Thing {
    RealKey(Key),
    /// Modifiers when held, [Key] when tapped
    ModTap(Modifiers, Key),
    Mouse(MouseKey),
    Backlight(BacklightOp),
    Custom(CustomKey),
    /// Reboot into the RP2040 USB mass storage bootloader, for flashing
    Bootloader,
    /// Look through to the next active layer down
    Transparent,
    #[default]
    Inactive,
}

/// How many physical rows there are
pub const ROWS: usize = 5;
/// How many physical columns there are
pub const COLUMNS: usize = 12;

/// Array of [Thing]s that a row of keys do
pub type Row = [Thing; COLUMNS];
/// 2D Array of [Thing]s that the whole set of keys do
pub type Layer = [Row; ROWS];

pub const BASE: u8 = 0;
pub const LOWER: u8 = 1;
pub const RAISE: u8 = 2;
pub const ADJUST: u8 = 3;

/// Translate a [KeyCode] into a valid [Thing]
const fn k(k: KeyCode) -> Thing {
    Thing::RealKey(key(k))
}

/// The (keycode, modifiers) pair a [KeyCode] puts in a report
pub const fn key(k: KeyCode) -> Key {
    let maybe_modifier_key = modifier_bit(k);
    if maybe_modifier_key != 0 {
        return (0, maybe_modifier_key);
    }
    (k as u8, 0)
}

/// Translate a [KeyCode] into a valid [Thing], that also holds left-shift while typing that keycode
const fn shift(kc: KeyCode) -> Thing {
    let (code, mods) = key(kc);
    Thing::RealKey((code, mods | modifier_bit(LShift)))
}

/// Holds `mods` while held, types `kc` when tapped
const fn mt(mods: Modifiers, kc: KeyCode) -> Thing {
    Thing::ModTap(mods, key(kc))
}

const fn ms(m: MouseKey) -> Thing {
    Thing::Mouse(m)
}

const fn bl(op: BacklightOp) -> Thing {
    Thing::Backlight(op)
}

const CTL: Modifiers = modifier_bit(LCtrl);
const SFT: Modifiers = modifier_bit(LShift);
const GUI: Modifiers = modifier_bit(LGui);

const ___: Thing = Thing::Transparent;
const XXX: Thing = Thing::Inactive;

const LAYER1: Thing = Thing::Custom(CustomKey::Layer1);
const LAYER2: Thing = Thing::Custom(CustomKey::Layer2);
const CAPS: Thing = Thing::Custom(CustomKey::Caps);
const fn tmux(window: u8) -> Thing {
    Thing::Custom(CustomKey::Tmux(window))
}
const RESET: Thing = Thing::Bootloader;

/// Dvorak base layer.
///
/// Mod-tap keys: `[` is Ctrl+Shift when held, `` ` `` is left GUI when held, `\` is Ctrl when held.
#[rustfmt::skip]
pub const LAYER_BASE: Layer = [
    [mt(CTL | SFT, LeftBracket), k(Kc1), k(Kc2), k(Kc3), k(Kc4), k(Kc5), k(Kc6), k(Kc7), k(Kc8), k(Kc9), k(Kc0), k(RightBracket)],
    [k(Tab), k(Quote), k(Comma), k(Dot), k(P), k(Y), k(F), k(G), k(C), k(R), k(L), k(Slash)],
    [k(LCtrl), k(A), k(O), k(E), k(U), k(I), k(D), k(H), k(T), k(N), k(S), k(Minus)],
    [k(LShift), k(Semicolon), k(Q), k(J), k(K), k(X), k(B), k(M), k(W), k(V), k(Z), k(RShift)],
    [LAYER1, mt(GUI, Grave), k(LAlt), k(Delete), k(Escape), k(Space), k(Space), k(Enter), k(Backspace), mt(CTL, Backslash), k(Equal), LAYER2],
];

/// Right hand layer: F-keys, arrows, and the caps lock toggle
#[rustfmt::skip]
pub const LAYER_LOWER: Layer = [
    [k(Grave), k(F1), k(F2), k(F3), k(F4), k(F5), k(F6), k(F7), k(F8), k(F9), k(F10), CAPS],
    [___, XXX, XXX, XXX, XXX, XXX, XXX, XXX, k(UP), XXX, XXX, ___],
    [___, XXX, XXX, XXX, XXX, XXX, XXX, k(Left), k(Down), k(Right), XXX, shift(Backslash)],
    [___, XXX, XXX, XXX, ___, XXX, XXX, XXX, XXX, XXX, XXX, ___],
    [___, k(LGui), ___, ___, ___, ___, ___, ___, ___, XXX, XXX, ___],
];

/// Left hand layer: tmux window switching and mouse keys
#[rustfmt::skip]
pub const LAYER_RAISE: Layer = [
    [XXX, tmux(1), tmux(2), tmux(3), tmux(4), tmux(5), XXX, XXX, ms(MouseKey::Accel1), ms(MouseKey::Accel2), ms(MouseKey::Accel0), XXX],
    [___, XXX, XXX, ms(MouseKey::Up), XXX, XXX, XXX, XXX, XXX, XXX, XXX, RESET],
    [___, XXX, ms(MouseKey::Left), ms(MouseKey::Down), ms(MouseKey::Right), ms(MouseKey::WheelUp), XXX, XXX, XXX, XXX, XXX, XXX],
    [___, XXX, XXX, XXX, XXX, ms(MouseKey::WheelDown), XXX, XXX, XXX, XXX, XXX, XXX],
    [___, k(LGui), ___, k(PrintScreen), ___, ms(MouseKey::Button1), ms(MouseKey::Button1), ms(MouseKey::Button2), ___, ___, XXX, ___],
];

/// Both layer keys held: backlight settings.
///
/// This sits above [LAYER_RAISE], so while it is on it covers all of RAISE: the tmux keys become
/// backlight controls and only the `___` corners look through.
#[rustfmt::skip]
pub const LAYER_ADJUST: Layer = [
    [XXX, bl(BacklightOp::Toggle), bl(BacklightOp::Decrease), bl(BacklightOp::Increase), bl(BacklightOp::Step), XXX, XXX, XXX, XXX, XXX, XXX, CAPS],
    [XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, RESET],
    [XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX],
    [XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX],
    [___, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, XXX, ___],
];

/// All layers, indexed by layer number
pub const LAYERS: [&Layer; 4] = [&LAYER_BASE, &LAYER_LOWER, &LAYER_RAISE, &LAYER_ADJUST];

/// The literal [Thing] written in the table at that position, or [Thing::Inactive] if out of range
pub fn lookup(layer: u8, row: usize, col: usize) -> Thing {
    LAYERS
        .get(layer as usize)
        .and_then(|l| l.get(row))
        .and_then(|r| r.get(col))
        .copied()
        .unwrap_or(Thing::Inactive)
}
