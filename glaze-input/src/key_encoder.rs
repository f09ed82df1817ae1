//! Key press encoding
//!
//! Turns a physical key plus modifier state into the editor's input notation:
//! a single literal character for keys that type something, a bracketed name
//! such as `<Esc>` or `<C-a>` for the rest, and nothing for unmapped keys.

use crate::keycode::{KeyCode, Modifiers};
use crate::layout::{KeyboardLayout, KeyboardState, UsLayout};

/// One unit of editor input: a literal character or a bracketed key name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedInput(String);

impl EncodedInput {
    pub fn literal(ch: char) -> Self {
        Self(ch.to_string())
    }

    /// `<name>`
    pub fn symbolic(name: &str) -> Self {
        Self(format!("<{}>", name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_symbolic(&self) -> bool {
        self.0.len() > 1 && self.0.starts_with('<') && self.0.ends_with('>')
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EncodedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for EncodedInput {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A key press with the modifiers held at that moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Names of keys that type nothing but have a bracketed form
const SYMBOLIC_KEYS: &[(KeyCode, &str)] = &[
    (KeyCode::ESCAPE, "Esc"),
    (KeyCode::BACK, "BS"),
    (KeyCode::TAB, "Tab"),
    (KeyCode::RETURN, "Enter"),
    (KeyCode::UP, "Up"),
    (KeyCode::DOWN, "Down"),
    (KeyCode::LEFT, "Left"),
    (KeyCode::RIGHT, "Right"),
    (KeyCode::SPACE, "Space"),
    (KeyCode::DELETE, "Del"),
    (KeyCode::HOME, "Home"),
    (KeyCode::END, "End"),
    (KeyCode::PRIOR, "PageUp"),
    (KeyCode::NEXT, "PageDown"),
    (KeyCode::INSERT, "Insert"),
];

fn symbolic_name(code: KeyCode) -> Option<String> {
    if let Some(n) = code.function_number() {
        return Some(format!("F{}", n));
    }
    SYMBOLIC_KEYS
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, name)| (*name).to_string())
}

/// Whether typing `ch` needs Shift on a standard layout
pub fn is_shift_required(ch: char) -> bool {
    ch.is_uppercase() || "~!@#$%^&*()_+{}|:\"<>?".contains(ch)
}

/// Key press encoder over a keyboard layout
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEncoder<L = UsLayout> {
    layout: L,
}

impl<L: KeyboardLayout> KeyEncoder<L> {
    pub fn new(layout: L) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Encode a key press; `None` for keys the editor has no input for
    pub fn encode(&self, event: KeyEvent) -> Option<EncodedInput> {
        if event.code.is_modifier() {
            return None;
        }
        self.encode_with_state(event.code, &KeyboardState::with_modifiers(event.modifiers))
    }

    /// Encode `code` under an explicit keyboard state
    pub fn encode_with_state(&self, code: KeyCode, state: &KeyboardState) -> Option<EncodedInput> {
        let modifiers = state.modifiers();

        match self.layout.translate(code, state) {
            Some(ch) if ch.is_ascii_control() => {
                let key = ((ch as u8) ^ 0x40) as char;
                let alt = if modifiers.alt { "A-" } else { "" };
                Some(EncodedInput::symbolic(&format!(
                    "C-{}{}",
                    alt,
                    key.to_ascii_lowercase()
                )))
            }
            Some(ch) if modifiers.alt => Some(EncodedInput::symbolic(&format!(
                "A-{}",
                literal_name(ch)
            ))),
            Some('<') => Some(EncodedInput::symbolic("lt")),
            Some(ch) => Some(EncodedInput::literal(ch)),
            None => {
                let Some(name) = symbolic_name(code) else {
                    log::trace!("No input for {:?} with {:?}", code, modifiers);
                    return None;
                };
                Some(EncodedInput::symbolic(&format!(
                    "{}{}",
                    modifiers.prefix(),
                    name
                )))
            }
        }
    }

    /// Key and keyboard state that type `ch` on this layout
    ///
    /// Shift is asserted exactly when `is_shift_required(ch)`.
    pub fn synthesize(&self, ch: char) -> Option<(KeyCode, KeyboardState)> {
        let (code, _) = self.layout.key_for_char(ch)?;
        let modifiers = if is_shift_required(ch) {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        Some((code, KeyboardState::with_modifiers(modifiers)))
    }

    /// Encode a character as typed text
    ///
    /// Characters with no key on the layout are sent unchanged.
    pub fn encode_char(&self, ch: char) -> EncodedInput {
        self.synthesize(ch)
            .and_then(|(code, state)| self.encode_with_state(code, &state))
            .unwrap_or_else(|| EncodedInput::literal(ch))
    }
}

fn literal_name(ch: char) -> String {
    match ch {
        '<' => "lt".to_string(),
        ' ' => "Space".to_string(),
        _ => ch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> KeyEncoder {
        KeyEncoder::default()
    }

    fn key(c: char) -> KeyCode {
        UsLayout.key_for_char(c).unwrap().0
    }

    fn encode(code: KeyCode, modifiers: Modifiers) -> Option<String> {
        encoder()
            .encode(KeyEvent::new(code, modifiers))
            .map(EncodedInput::into_string)
    }

    #[test]
    fn test_printable_keys_are_literal() {
        assert_eq!(encode(key('a'), Modifiers::NONE).as_deref(), Some("a"));
        assert_eq!(encode(key('a'), Modifiers::SHIFT).as_deref(), Some("A"));
        assert_eq!(encode(key('9'), Modifiers::SHIFT).as_deref(), Some("("));
        assert_eq!(encode(KeyCode::SPACE, Modifiers::NONE).as_deref(), Some(" "));
    }

    #[test]
    fn test_less_than_is_escaped() {
        assert_eq!(
            encode(KeyCode::OEM_COMMA, Modifiers::SHIFT).as_deref(),
            Some("<lt>")
        );
        assert_eq!(encoder().encode_char('<'), "<lt>");
    }

    #[test]
    fn test_control_letter_is_one_input() {
        assert_eq!(encode(key('a'), Modifiers::CTRL).as_deref(), Some("<C-a>"));
        assert_eq!(
            encode(key('w'), Modifiers::CTRL | Modifiers::ALT).as_deref(),
            Some("<C-A-w>")
        );
        assert_eq!(
            encode(KeyCode::OEM_4, Modifiers::CTRL).as_deref(),
            Some("<C-[>")
        );
    }

    #[test]
    fn test_alt_printable() {
        assert_eq!(encode(key('x'), Modifiers::ALT).as_deref(), Some("<A-x>"));
        assert_eq!(
            encode(KeyCode::SPACE, Modifiers::ALT).as_deref(),
            Some("<A-Space>")
        );
    }

    #[test]
    fn test_symbolic_keys() {
        assert_eq!(encode(KeyCode::ESCAPE, Modifiers::NONE).as_deref(), Some("<Esc>"));
        assert_eq!(encode(KeyCode::RETURN, Modifiers::NONE).as_deref(), Some("<Enter>"));
        assert_eq!(encode(KeyCode::BACK, Modifiers::NONE).as_deref(), Some("<BS>"));
        assert_eq!(encode(KeyCode(0x7A), Modifiers::NONE).as_deref(), Some("<F11>"));
        assert_eq!(encode(KeyCode::TAB, Modifiers::SHIFT).as_deref(), Some("<S-Tab>"));
        assert_eq!(encode(KeyCode::UP, Modifiers::CTRL).as_deref(), Some("<C-Up>"));
    }

    #[test]
    fn test_unmapped_keys_produce_nothing() {
        assert_eq!(encode(KeyCode::SHIFT, Modifiers::SHIFT), None);
        assert_eq!(encode(KeyCode(0x91), Modifiers::NONE), None);
        assert_eq!(encode(key('1'), Modifiers::CTRL), None);
    }

    #[test]
    fn test_shift_required() {
        for ch in "AZ()%{}$^<?".chars() {
            assert!(is_shift_required(ch), "{:?}", ch);
        }
        for ch in "az09[]-=,. ".chars() {
            assert!(!is_shift_required(ch), "{:?}", ch);
        }
    }

    #[test]
    fn test_synthesized_state_differs_by_case() {
        let enc = encoder();
        let (upper_key, upper_state) = enc.synthesize('A').unwrap();
        let (lower_key, lower_state) = enc.synthesize('a').unwrap();
        assert_eq!(upper_key, lower_key);
        assert_ne!(upper_state, lower_state);
        assert!(upper_state.is_active(KeyCode::SHIFT));
        assert!(upper_state.is_active(KeyCode::LSHIFT));
        assert_eq!(lower_state, KeyboardState::new());
    }

    #[test]
    fn test_off_layout_characters_pass_through() {
        assert_eq!(encoder().encode_char('é'), "é");
        assert_eq!(encoder().encode_char('\t'), "<Tab>");
    }
}
