//! Mapping from winit keys to virtual key codes

use glaze_input::{KeyCode, Modifiers};
use winit::keyboard::{KeyCode as WinitKey, ModifiersState, PhysicalKey};

/// Virtual key code for a physical key, if it has one
pub fn map_physical_key(key: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let mapped = match code {
        WinitKey::KeyA => KeyCode(b'A'),
        WinitKey::KeyB => KeyCode(b'B'),
        WinitKey::KeyC => KeyCode(b'C'),
        WinitKey::KeyD => KeyCode(b'D'),
        WinitKey::KeyE => KeyCode(b'E'),
        WinitKey::KeyF => KeyCode(b'F'),
        WinitKey::KeyG => KeyCode(b'G'),
        WinitKey::KeyH => KeyCode(b'H'),
        WinitKey::KeyI => KeyCode(b'I'),
        WinitKey::KeyJ => KeyCode(b'J'),
        WinitKey::KeyK => KeyCode(b'K'),
        WinitKey::KeyL => KeyCode(b'L'),
        WinitKey::KeyM => KeyCode(b'M'),
        WinitKey::KeyN => KeyCode(b'N'),
        WinitKey::KeyO => KeyCode(b'O'),
        WinitKey::KeyP => KeyCode(b'P'),
        WinitKey::KeyQ => KeyCode(b'Q'),
        WinitKey::KeyR => KeyCode(b'R'),
        WinitKey::KeyS => KeyCode(b'S'),
        WinitKey::KeyT => KeyCode(b'T'),
        WinitKey::KeyU => KeyCode(b'U'),
        WinitKey::KeyV => KeyCode(b'V'),
        WinitKey::KeyW => KeyCode(b'W'),
        WinitKey::KeyX => KeyCode(b'X'),
        WinitKey::KeyY => KeyCode(b'Y'),
        WinitKey::KeyZ => KeyCode(b'Z'),
        WinitKey::Digit0 => KeyCode(b'0'),
        WinitKey::Digit1 => KeyCode(b'1'),
        WinitKey::Digit2 => KeyCode(b'2'),
        WinitKey::Digit3 => KeyCode(b'3'),
        WinitKey::Digit4 => KeyCode(b'4'),
        WinitKey::Digit5 => KeyCode(b'5'),
        WinitKey::Digit6 => KeyCode(b'6'),
        WinitKey::Digit7 => KeyCode(b'7'),
        WinitKey::Digit8 => KeyCode(b'8'),
        WinitKey::Digit9 => KeyCode(b'9'),
        WinitKey::F1 => KeyCode(0x70),
        WinitKey::F2 => KeyCode(0x71),
        WinitKey::F3 => KeyCode(0x72),
        WinitKey::F4 => KeyCode(0x73),
        WinitKey::F5 => KeyCode(0x74),
        WinitKey::F6 => KeyCode(0x75),
        WinitKey::F7 => KeyCode(0x76),
        WinitKey::F8 => KeyCode(0x77),
        WinitKey::F9 => KeyCode(0x78),
        WinitKey::F10 => KeyCode(0x79),
        WinitKey::F11 => KeyCode(0x7A),
        WinitKey::F12 => KeyCode(0x7B),
        WinitKey::Escape => KeyCode::ESCAPE,
        WinitKey::Enter | WinitKey::NumpadEnter => KeyCode::RETURN,
        WinitKey::Tab => KeyCode::TAB,
        WinitKey::Backspace => KeyCode::BACK,
        WinitKey::Space => KeyCode::SPACE,
        WinitKey::Delete => KeyCode::DELETE,
        WinitKey::Insert => KeyCode::INSERT,
        WinitKey::Home => KeyCode::HOME,
        WinitKey::End => KeyCode::END,
        WinitKey::PageUp => KeyCode::PRIOR,
        WinitKey::PageDown => KeyCode::NEXT,
        WinitKey::ArrowUp => KeyCode::UP,
        WinitKey::ArrowDown => KeyCode::DOWN,
        WinitKey::ArrowLeft => KeyCode::LEFT,
        WinitKey::ArrowRight => KeyCode::RIGHT,
        WinitKey::Semicolon => KeyCode::OEM_1,
        WinitKey::Equal => KeyCode::OEM_PLUS,
        WinitKey::Comma => KeyCode::OEM_COMMA,
        WinitKey::Minus => KeyCode::OEM_MINUS,
        WinitKey::Period => KeyCode::OEM_PERIOD,
        WinitKey::Slash => KeyCode::OEM_2,
        WinitKey::Backquote => KeyCode::OEM_3,
        WinitKey::BracketLeft => KeyCode::OEM_4,
        WinitKey::Backslash => KeyCode::OEM_5,
        WinitKey::BracketRight => KeyCode::OEM_6,
        WinitKey::Quote => KeyCode::OEM_7,
        WinitKey::ShiftLeft => KeyCode::LSHIFT,
        WinitKey::ShiftRight => KeyCode::RSHIFT,
        WinitKey::ControlLeft => KeyCode::LCONTROL,
        WinitKey::ControlRight => KeyCode::RCONTROL,
        WinitKey::AltLeft => KeyCode::LMENU,
        WinitKey::AltRight => KeyCode::RMENU,
        WinitKey::CapsLock => KeyCode::CAPITAL,
        _ => return None,
    };
    Some(mapped)
}

pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
    }
}

/// Lowercase character a letter or digit key is labelled with
pub fn key_label(code: KeyCode) -> Option<char> {
    (code.is_letter() || code.is_digit()).then(|| (code.0 as char).to_ascii_lowercase())
}
