//! Translates a `minifb` key into the (scancode, ASCII) pair the keyboard
//! BIOS services expect, plus the handful of shift-state bits INT 16h
//! AH=02h reports. Only the keys a text-mode program can plausibly read
//! back are mapped; anything else is ignored by the display bridge.

use minifb::Key;

pub const SHIFT_BIT: u8 = 1 << 0;
pub const CTRL_BIT: u8 = 1 << 2;
pub const ALT_BIT: u8 = 1 << 3;

/// Returns `(scancode, ascii)` for a key in its unshifted form; the display
/// bridge applies case folding itself based on the live shift state.
pub fn translate(key: Key, shift: bool) -> Option<(u8, u8)> {
    let (scancode, lower, upper) = match key {
        Key::A => (0x1E, b'a', b'A'),
        Key::B => (0x30, b'b', b'B'),
        Key::C => (0x2E, b'c', b'C'),
        Key::D => (0x20, b'd', b'D'),
        Key::E => (0x12, b'e', b'E'),
        Key::F => (0x21, b'f', b'F'),
        Key::G => (0x22, b'g', b'G'),
        Key::H => (0x23, b'h', b'H'),
        Key::I => (0x17, b'i', b'I'),
        Key::J => (0x24, b'j', b'J'),
        Key::K => (0x25, b'k', b'K'),
        Key::L => (0x26, b'l', b'L'),
        Key::M => (0x32, b'm', b'M'),
        Key::N => (0x31, b'n', b'N'),
        Key::O => (0x18, b'o', b'O'),
        Key::P => (0x19, b'p', b'P'),
        Key::Q => (0x10, b'q', b'Q'),
        Key::R => (0x13, b'r', b'R'),
        Key::S => (0x1F, b's', b'S'),
        Key::T => (0x14, b't', b'T'),
        Key::U => (0x16, b'u', b'U'),
        Key::V => (0x2F, b'v', b'V'),
        Key::W => (0x11, b'w', b'W'),
        Key::X => (0x2D, b'x', b'X'),
        Key::Y => (0x15, b'y', b'Y'),
        Key::Z => (0x2C, b'z', b'Z'),
        Key::Key0 => (0x0B, b'0', b')'),
        Key::Key1 => (0x02, b'1', b'!'),
        Key::Key2 => (0x03, b'2', b'@'),
        Key::Key3 => (0x04, b'3', b'#'),
        Key::Key4 => (0x05, b'4', b'$'),
        Key::Key5 => (0x06, b'5', b'%'),
        Key::Key6 => (0x07, b'6', b'^'),
        Key::Key7 => (0x08, b'7', b'&'),
        Key::Key8 => (0x09, b'8', b'*'),
        Key::Key9 => (0x0A, b'9', b'('),
        Key::Space => (0x39, b' ', b' '),
        Key::Enter => (0x1C, 0x0D, 0x0D),
        Key::Backspace => (0x0E, 0x08, 0x08),
        Key::Tab => (0x0F, 0x09, 0x09),
        Key::Period => (0x34, b'.', b'>'),
        Key::Comma => (0x33, b',', b'<'),
        Key::Minus => (0x0C, b'-', b'_'),
        _ => return None,
    };
    Some((scancode, if shift { upper } else { lower }))
}

pub fn shift_flags(shift: bool, ctrl: bool, alt: bool) -> u8 {
    let mut bits = 0u8;
    if shift {
        bits |= SHIFT_BIT;
    }
    if ctrl {
        bits |= CTRL_BIT;
    }
    if alt {
        bits |= ALT_BIT;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_keys_report_the_standard_set_1_scancode() {
        assert_eq!(translate(Key::A, false), Some((0x1E, b'a')));
        assert_eq!(translate(Key::A, true), Some((0x1E, b'A')));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(translate(Key::F1, false), None);
    }

    #[test]
    fn shift_flags_combine_independently() {
        assert_eq!(shift_flags(true, false, false), SHIFT_BIT);
        assert_eq!(shift_flags(true, true, true), SHIFT_BIT | CTRL_BIT | ALT_BIT);
    }
}
