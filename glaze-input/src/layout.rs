//! Key translation
//!
//! A `KeyboardLayout` answers one question: given a key and a keyboard state,
//! which character (if any) does the key type? The state is a 256-entry
//! vector indexed by key code, the way OS translation routines take it, so
//! callers can simulate any modifier combination by setting entries.

use crate::keycode::{KeyCode, Modifiers};

/// Per-key state vector
#[derive(Clone, PartialEq, Eq)]
pub struct KeyboardState([u8; 256]);

impl KeyboardState {
    /// Marker for a held key
    pub const ACTIVE: u8 = 0x80;
    /// Marker for a toggled key (CapsLock)
    pub const TOGGLED: u8 = 0x01;

    /// No key held
    pub fn new() -> Self {
        Self([0; 256])
    }

    /// State with exactly the given modifiers held
    ///
    /// Each modifier sets both its generic entry and its left-hand entry.
    pub fn with_modifiers(modifiers: Modifiers) -> Self {
        let mut state = Self::new();
        if modifiers.shift {
            state.press(KeyCode::SHIFT);
            state.press(KeyCode::LSHIFT);
        }
        if modifiers.ctrl {
            state.press(KeyCode::CONTROL);
            state.press(KeyCode::LCONTROL);
        }
        if modifiers.alt {
            state.press(KeyCode::MENU);
            state.press(KeyCode::LMENU);
        }
        state
    }

    pub fn press(&mut self, key: KeyCode) {
        self.0[key.0 as usize] |= Self::ACTIVE;
    }

    pub fn set_caps_lock(&mut self, on: bool) {
        let entry = &mut self.0[KeyCode::CAPITAL.0 as usize];
        if on {
            *entry |= Self::TOGGLED;
        } else {
            *entry &= !Self::TOGGLED;
        }
    }

    pub fn is_active(&self, key: KeyCode) -> bool {
        self.0[key.0 as usize] & Self::ACTIVE != 0
    }

    pub fn caps_lock(&self) -> bool {
        self.0[KeyCode::CAPITAL.0 as usize] & Self::TOGGLED != 0
    }

    /// Modifiers held in this state, generic or sided
    pub fn modifiers(&self) -> Modifiers {
        let any = |keys: [KeyCode; 3]| keys.iter().any(|&k| self.is_active(k));
        Modifiers {
            shift: any([KeyCode::SHIFT, KeyCode::LSHIFT, KeyCode::RSHIFT]),
            ctrl: any([KeyCode::CONTROL, KeyCode::LCONTROL, KeyCode::RCONTROL]),
            alt: any([KeyCode::MENU, KeyCode::LMENU, KeyCode::RMENU]),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 256] {
        &self.0
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active: Vec<_> = self
            .0
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(i, v)| (format!("{:#04x}", i), *v))
            .collect();
        f.debug_tuple("KeyboardState").field(&active).finish()
    }
}

/// The key translation primitive
pub trait KeyboardLayout {
    /// Character typed by `key` under `state`, or `None` if the key types
    /// nothing
    fn translate(&self, key: KeyCode, state: &KeyboardState) -> Option<char>;

    /// Key that types `ch`, and whether Shift is needed for it
    fn key_for_char(&self, ch: char) -> Option<(KeyCode, bool)>;
}

/// US QWERTY
#[derive(Debug, Clone, Copy, Default)]
pub struct UsLayout;

/// `(key, unshifted, shifted)` for every key that types punctuation
const PUNCTUATION: &[(KeyCode, char, char)] = &[
    (KeyCode::OEM_1, ';', ':'),
    (KeyCode::OEM_PLUS, '=', '+'),
    (KeyCode::OEM_COMMA, ',', '<'),
    (KeyCode::OEM_MINUS, '-', '_'),
    (KeyCode::OEM_PERIOD, '.', '>'),
    (KeyCode::OEM_2, '/', '?'),
    (KeyCode::OEM_3, '`', '~'),
    (KeyCode::OEM_4, '[', '{'),
    (KeyCode::OEM_5, '\\', '|'),
    (KeyCode::OEM_6, ']', '}'),
    (KeyCode::OEM_7, '\'', '"'),
];

/// Shifted digit row, indexed by digit
const SHIFTED_DIGITS: [char; 10] = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];

impl KeyboardLayout for UsLayout {
    fn translate(&self, key: KeyCode, state: &KeyboardState) -> Option<char> {
        let modifiers = state.modifiers();

        if modifiers.ctrl {
            return control_char(key);
        }

        if key.is_letter() {
            let c = key.0 as char;
            return Some(if modifiers.shift != state.caps_lock() {
                c
            } else {
                c.to_ascii_lowercase()
            });
        }
        if key.is_digit() {
            let c = key.0 as char;
            return Some(if modifiers.shift {
                SHIFTED_DIGITS[(key.0 - b'0') as usize]
            } else {
                c
            });
        }
        if key == KeyCode::SPACE {
            return Some(' ');
        }

        PUNCTUATION
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|&(_, plain, shifted)| if modifiers.shift { shifted } else { plain })
    }

    fn key_for_char(&self, ch: char) -> Option<(KeyCode, bool)> {
        if let Some(key) = KeyCode::letter(ch) {
            return Some((key, ch.is_ascii_uppercase()));
        }
        if let Some(key) = KeyCode::digit(ch) {
            return Some((key, false));
        }
        if let Some(d) = SHIFTED_DIGITS.iter().position(|&c| c == ch) {
            return Some((KeyCode(b'0' + d as u8), true));
        }
        match ch {
            ' ' => return Some((KeyCode::SPACE, false)),
            '\t' => return Some((KeyCode::TAB, false)),
            '\n' | '\r' => return Some((KeyCode::RETURN, false)),
            _ => {}
        }
        PUNCTUATION.iter().find_map(|&(key, plain, shifted)| {
            if ch == plain {
                Some((key, false))
            } else if ch == shifted {
                Some((key, true))
            } else {
                None
            }
        })
    }
}

/// C0 control character typed by Control+`key`
fn control_char(key: KeyCode) -> Option<char> {
    if key.is_letter() {
        return Some((key.0 - b'A' + 1) as char);
    }
    match key {
        KeyCode::OEM_4 => Some('\x1b'),
        KeyCode::OEM_5 => Some('\x1c'),
        KeyCode::OEM_6 => Some('\x1d'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(key: KeyCode, modifiers: Modifiers) -> Option<char> {
        UsLayout.translate(key, &KeyboardState::with_modifiers(modifiers))
    }

    #[test]
    fn test_with_modifiers_sets_generic_and_left_entries() {
        let state = KeyboardState::with_modifiers(Modifiers::SHIFT);
        assert_eq!(state.as_bytes()[0x10], KeyboardState::ACTIVE);
        assert_eq!(state.as_bytes()[0xA0], KeyboardState::ACTIVE);
        assert_eq!(state.as_bytes().iter().filter(|&&b| b != 0).count(), 2);
        assert_eq!(KeyboardState::new().as_bytes(), &[0u8; 256]);
    }

    #[test]
    fn test_letters_follow_shift_and_caps_lock() {
        let a = KeyCode::letter('a').unwrap();
        assert_eq!(translate(a, Modifiers::NONE), Some('a'));
        assert_eq!(translate(a, Modifiers::SHIFT), Some('A'));

        let mut state = KeyboardState::new();
        state.set_caps_lock(true);
        assert_eq!(UsLayout.translate(a, &state), Some('A'));
        state.press(KeyCode::RSHIFT);
        assert_eq!(UsLayout.translate(a, &state), Some('a'));
    }

    #[test]
    fn test_digits_and_punctuation() {
        assert_eq!(translate(KeyCode(b'5'), Modifiers::NONE), Some('5'));
        assert_eq!(translate(KeyCode(b'5'), Modifiers::SHIFT), Some('%'));
        assert_eq!(translate(KeyCode::OEM_4, Modifiers::SHIFT), Some('{'));
        assert_eq!(translate(KeyCode::OEM_COMMA, Modifiers::NONE), Some(','));
        assert_eq!(translate(KeyCode::SPACE, Modifiers::NONE), Some(' '));
    }

    #[test]
    fn test_control_letters_give_c0() {
        let c = KeyCode::letter('c').unwrap();
        assert_eq!(translate(c, Modifiers::CTRL), Some('\x03'));
        assert_eq!(translate(c, Modifiers::CTRL | Modifiers::SHIFT), Some('\x03'));
        assert_eq!(translate(KeyCode::OEM_4, Modifiers::CTRL), Some('\x1b'));
        assert_eq!(translate(KeyCode(b'1'), Modifiers::CTRL), None);
    }

    #[test]
    fn test_non_printable_keys_type_nothing() {
        for key in [
            KeyCode::ESCAPE,
            KeyCode::RETURN,
            KeyCode::TAB,
            KeyCode::BACK,
            KeyCode::UP,
            KeyCode::F1,
            KeyCode::SHIFT,
        ] {
            assert_eq!(translate(key, Modifiers::NONE), None, "{:?}", key);
        }
    }

    #[test]
    fn test_key_for_char_inverts_translate() {
        for ch in "aZ09)~{|\"? ".chars() {
            let (key, shift) = UsLayout.key_for_char(ch).unwrap();
            let modifiers = if shift { Modifiers::SHIFT } else { Modifiers::NONE };
            assert_eq!(translate(key, modifiers), Some(ch), "{:?}", ch);
        }
        assert_eq!(UsLayout.key_for_char('é'), None);
    }
}
