//! Platform-neutral key codes and modifier flags
//!
//! Key codes follow the common virtual-key numbering: letters and digits
//! share their ASCII uppercase values, everything else has a fixed slot.

/// A physical key, independent of layout and modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const BACK: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const RETURN: KeyCode = KeyCode(0x0D);
    pub const SHIFT: KeyCode = KeyCode(0x10);
    pub const CONTROL: KeyCode = KeyCode(0x11);
    /// Alt
    pub const MENU: KeyCode = KeyCode(0x12);
    pub const CAPITAL: KeyCode = KeyCode(0x14);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const PRIOR: KeyCode = KeyCode(0x21);
    pub const NEXT: KeyCode = KeyCode(0x22);
    pub const END: KeyCode = KeyCode(0x23);
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);
    pub const INSERT: KeyCode = KeyCode(0x2D);
    pub const DELETE: KeyCode = KeyCode(0x2E);
    pub const F1: KeyCode = KeyCode(0x70);
    pub const F12: KeyCode = KeyCode(0x7B);
    pub const LSHIFT: KeyCode = KeyCode(0xA0);
    pub const RSHIFT: KeyCode = KeyCode(0xA1);
    pub const LCONTROL: KeyCode = KeyCode(0xA2);
    pub const RCONTROL: KeyCode = KeyCode(0xA3);
    pub const LMENU: KeyCode = KeyCode(0xA4);
    pub const RMENU: KeyCode = KeyCode(0xA5);
    /// `;:`
    pub const OEM_1: KeyCode = KeyCode(0xBA);
    /// `=+`
    pub const OEM_PLUS: KeyCode = KeyCode(0xBB);
    /// `,<`
    pub const OEM_COMMA: KeyCode = KeyCode(0xBC);
    /// `-_`
    pub const OEM_MINUS: KeyCode = KeyCode(0xBD);
    /// `.>`
    pub const OEM_PERIOD: KeyCode = KeyCode(0xBE);
    /// `/?`
    pub const OEM_2: KeyCode = KeyCode(0xBF);
    /// `` `~ ``
    pub const OEM_3: KeyCode = KeyCode(0xC0);
    /// `[{`
    pub const OEM_4: KeyCode = KeyCode(0xDB);
    /// `\|`
    pub const OEM_5: KeyCode = KeyCode(0xDC);
    /// `]}`
    pub const OEM_6: KeyCode = KeyCode(0xDD);
    /// `'"`
    pub const OEM_7: KeyCode = KeyCode(0xDE);

    /// Key for an ASCII letter, either case
    pub fn letter(c: char) -> Option<KeyCode> {
        c.is_ascii_alphabetic()
            .then(|| KeyCode(c.to_ascii_uppercase() as u8))
    }

    /// Key for an ASCII digit on the main row
    pub fn digit(c: char) -> Option<KeyCode> {
        c.is_ascii_digit().then(|| KeyCode(c as u8))
    }

    /// Function key `F1`..`F12`
    pub fn function(n: u8) -> Option<KeyCode> {
        (1..=12).contains(&n).then(|| KeyCode(Self::F1.0 + n - 1))
    }

    pub fn is_letter(self) -> bool {
        self.0.is_ascii_uppercase()
    }

    pub fn is_digit(self) -> bool {
        self.0.is_ascii_digit()
    }

    /// Function key number, if this is `F1`..`F12`
    pub fn function_number(self) -> Option<u8> {
        (Self::F1.0..=Self::F12.0)
            .contains(&self.0)
            .then(|| self.0 - Self::F1.0 + 1)
    }

    /// Shift, Control or Alt, generic or sided
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::SHIFT
                | Self::CONTROL
                | Self::MENU
                | Self::LSHIFT
                | Self::RSHIFT
                | Self::LCONTROL
                | Self::RCONTROL
                | Self::LMENU
                | Self::RMENU
        )
    }
}

/// Keyboard modifiers held with a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }

    /// Key-notation prefix, e.g. `C-S-` for Control+Shift
    pub fn prefix(&self) -> String {
        let mut prefix = String::new();
        if self.ctrl {
            prefix.push_str("C-");
        }
        if self.shift {
            prefix.push_str("S-");
        }
        if self.alt {
            prefix.push_str("A-");
        }
        prefix
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers {
            shift: self.shift || rhs.shift,
            ctrl: self.ctrl || rhs.ctrl,
            alt: self.alt || rhs.alt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_share_uppercase_code() {
        assert_eq!(KeyCode::letter('a'), Some(KeyCode(0x41)));
        assert_eq!(KeyCode::letter('A'), KeyCode::letter('a'));
        assert_eq!(KeyCode::letter('1'), None);
        assert_eq!(KeyCode::digit('7'), Some(KeyCode(0x37)));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(KeyCode::function(1), Some(KeyCode::F1));
        assert_eq!(KeyCode::function(12), Some(KeyCode::F12));
        assert_eq!(KeyCode::function(13), None);
        assert_eq!(KeyCode(0x74).function_number(), Some(5));
        assert_eq!(KeyCode::ESCAPE.function_number(), None);
    }

    #[test]
    fn test_modifier_prefix() {
        assert_eq!(Modifiers::NONE.prefix(), "");
        assert_eq!((Modifiers::CTRL | Modifiers::SHIFT).prefix(), "C-S-");
        assert!(KeyCode::LCONTROL.is_modifier());
        assert!(!KeyCode::SPACE.is_modifier());
    }
}
