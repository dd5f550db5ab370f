//! USB HID keyboard usage codes (usage page 0x07), named the way [rmk](https://github.com/HaoboGu/rmk/)
//! names them.

/// A key which can appear in the keycode array or modifier byte of a keyboard report
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCode {
    No = 0x00,
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,
    Kc1 = 0x1E,
    Kc2 = 0x1F,
    Kc3 = 0x20,
    Kc4 = 0x21,
    Kc5 = 0x22,
    Kc6 = 0x23,
    Kc7 = 0x24,
    Kc8 = 0x25,
    Kc9 = 0x26,
    Kc0 = 0x27,
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    LeftBracket = 0x2F,
    RightBracket = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Dot = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    UP = 0x52,
    LCtrl = 0xE0,
    LShift = 0xE1,
    LAlt = 0xE2,
    LGui = 0xE3,
    RCtrl = 0xE4,
    RShift = 0xE5,
    RAlt = 0xE6,
    RGui = 0xE7,
}

use KeyCode::*;

/// Maps a modifier [KeyCode] to the equivalent flag bit for the USB HID modifier byte, or returns
/// 0 for any non-modifier [KeyCode].
pub const fn modifier_bit(code: KeyCode) -> u8 {
    match code {
        LCtrl => 0x01,
        LShift => 0x02,
        LAlt => 0x04,
        LGui => 0x08,
        RCtrl => 0x10,
        RShift => 0x20,
        RAlt => 0x40,
        RGui => 0x80,
        _ => 0,
    }
}

/// Which key (and whether shift is needed) types a printable ASCII character on a US layout host.
pub const fn from_ascii(c: u8) -> Option<(KeyCode, bool)> {
    const LETTERS: [KeyCode; 26] = [
        A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    ];
    const DIGITS: [KeyCode; 10] = [Kc0, Kc1, Kc2, Kc3, Kc4, Kc5, Kc6, Kc7, Kc8, Kc9];

    let mapped = match c {
        b'a'..=b'z' => (LETTERS[(c - b'a') as usize], false),
        b'A'..=b'Z' => (LETTERS[(c - b'A') as usize], true),
        b'0'..=b'9' => (DIGITS[(c - b'0') as usize], false),
        b'\n' => (Enter, false),
        b'\t' => (Tab, false),
        b' ' => (Space, false),
        b'!' => (Kc1, true),
        b'@' => (Kc2, true),
        b'#' => (Kc3, true),
        b'$' => (Kc4, true),
        b'%' => (Kc5, true),
        b'^' => (Kc6, true),
        b'&' => (Kc7, true),
        b'*' => (Kc8, true),
        b'(' => (Kc9, true),
        b')' => (Kc0, true),
        b'-' => (Minus, false),
        b'_' => (Minus, true),
        b'=' => (Equal, false),
        b'+' => (Equal, true),
        b'[' => (LeftBracket, false),
        b'{' => (LeftBracket, true),
        b']' => (RightBracket, false),
        b'}' => (RightBracket, true),
        b'\\' => (Backslash, false),
        b'|' => (Backslash, true),
        b';' => (Semicolon, false),
        b':' => (Semicolon, true),
        b'\'' => (Quote, false),
        b'"' => (Quote, true),
        b'`' => (Grave, false),
        b'~' => (Grave, true),
        b',' => (Comma, false),
        b'<' => (Comma, true),
        b'.' => (Dot, false),
        b'>' => (Dot, true),
        b'/' => (Slash, false),
        b'?' => (Slash, true),
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_have_one_bit_each() {
        let mods = [LCtrl, LShift, LAlt, LGui, RCtrl, RShift, RAlt, RGui];
        let mut seen = 0u8;
        for m in mods {
            let bit = modifier_bit(m);
            assert_eq!(bit.count_ones(), 1);
            assert_eq!(seen & bit, 0);
            seen |= bit;
        }
        assert_eq!(seen, 0xff);
        assert_eq!(modifier_bit(A), 0);
        assert_eq!(modifier_bit(CapsLock), 0);
    }

    #[test]
    fn ascii_letters_and_digits() {
        assert_eq!(from_ascii(b'b'), Some((B, false)));
        assert_eq!(from_ascii(b'B'), Some((B, true)));
        assert_eq!(from_ascii(b'1'), Some((Kc1, false)));
        assert_eq!(from_ascii(b'0'), Some((Kc0, false)));
        assert_eq!(from_ascii(b'|'), Some((Backslash, true)));
    }

    #[test]
    fn unmapped_ascii() {
        assert_eq!(from_ascii(0x07), None);
        assert_eq!(from_ascii(0x7f), None);
    }
}
