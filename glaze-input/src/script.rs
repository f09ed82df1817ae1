//! Command scripts
//!
//! A script is a line of text such as `ihello<Esc>:w<CR>`. Characters outside
//! angle brackets are typed literally; `<name>` and `<name-key>` name a key or
//! a modifier held together with a key, matched case-insensitively.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::ScriptError;
use crate::key_encoder::{EncodedInput, KeyEncoder};
use crate::keycode::{KeyCode, Modifiers};
use crate::layout::{KeyboardLayout, KeyboardState};

/// One unit of a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandToken {
    Literal(char),
    /// Text between `<` and `>`, brackets removed
    Symbolic(String),
}

/// Split a script into tokens
///
/// A `<` with no closing `>` is typed literally along with everything after
/// it. A second `<` before the closing `>` makes the first one literal.
pub fn tokenize(script: &str) -> Tokens<'_> {
    Tokens {
        chars: script.chars().peekable(),
        pending: Vec::new(),
    }
}

/// Iterator returned by `tokenize`
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    chars: Peekable<Chars<'a>>,
    /// Literals queued from an abandoned `<...`, in reverse
    pending: Vec<char>,
}

impl Iterator for Tokens<'_> {
    type Item = CommandToken;

    fn next(&mut self) -> Option<CommandToken> {
        if let Some(ch) = self.pending.pop() {
            return Some(CommandToken::Literal(ch));
        }

        let ch = self.chars.next()?;
        if ch != '<' {
            return Some(CommandToken::Literal(ch));
        }

        let mut body = String::new();
        loop {
            match self.chars.peek() {
                Some('>') => {
                    self.chars.next();
                    return Some(CommandToken::Symbolic(body));
                }
                Some('<') | None => {
                    self.pending = body.chars().rev().collect();
                    return Some(CommandToken::Literal('<'));
                }
                Some(&c) => {
                    body.push(c);
                    self.chars.next();
                }
            }
        }
    }
}

/// What a script command name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Modifier(Modifiers),
    Key(KeyCode),
    Char(char),
}

fn lookup_command(name: &str) -> Option<Command> {
    let name = name.to_ascii_lowercase();
    let command = match name.as_str() {
        "c" => Command::Modifier(Modifiers::CTRL),
        "s" => Command::Modifier(Modifiers::SHIFT),
        "a" | "m" => Command::Modifier(Modifiers::ALT),
        "cr" | "enter" | "return" => Command::Key(KeyCode::RETURN),
        "esc" => Command::Key(KeyCode::ESCAPE),
        "space" => Command::Key(KeyCode::SPACE),
        "tab" => Command::Key(KeyCode::TAB),
        "bs" => Command::Key(KeyCode::BACK),
        "del" => Command::Key(KeyCode::DELETE),
        "up" => Command::Key(KeyCode::UP),
        "down" => Command::Key(KeyCode::DOWN),
        "left" => Command::Key(KeyCode::LEFT),
        "right" => Command::Key(KeyCode::RIGHT),
        "home" => Command::Key(KeyCode::HOME),
        "end" => Command::Key(KeyCode::END),
        "lt" => Command::Char('<'),
        _ => {
            let n = name.strip_prefix('f')?.parse::<u8>().ok()?;
            Command::Key(KeyCode::function(n)?)
        }
    };
    Some(command)
}

/// Split `command[-key]`
fn parse_symbolic(body: &str) -> Option<(&str, Option<char>)> {
    let (name, key) = match body.split_once('-') {
        Some((name, rest)) => {
            let mut chars = rest.chars();
            let key = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            (name, Some(key))
        }
        None => (body, None),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some((name, key))
}

/// Lazy encoder of one script
///
/// Yields one `EncodedInput` per token, or the error for a token that cannot
/// be encoded. Later tokens are still available after an error; callers that
/// treat a script as all-or-nothing collect into a `Result`.
pub struct CommandScriptEncoder<'a, L> {
    encoder: &'a KeyEncoder<L>,
    tokens: Tokens<'a>,
}

impl<'a, L: KeyboardLayout> CommandScriptEncoder<'a, L> {
    pub fn new(encoder: &'a KeyEncoder<L>, script: &'a str) -> Self {
        Self {
            encoder,
            tokens: tokenize(script),
        }
    }

    fn encode_symbolic(&self, body: &str) -> Result<EncodedInput, ScriptError> {
        let (name, key) =
            parse_symbolic(body).ok_or_else(|| ScriptError::InvalidToken(body.to_string()))?;
        let command =
            lookup_command(name).ok_or_else(|| ScriptError::UnknownCommand(name.to_string()))?;

        let encoded = match (command, key) {
            (Command::Modifier(modifiers), Some(key)) => {
                let key = key.to_ascii_uppercase();
                let (code, _) = self
                    .encoder
                    .layout()
                    .key_for_char(key)
                    .ok_or_else(|| ScriptError::Untranslatable(body.to_string()))?;
                self.encoder
                    .encode_with_state(code, &KeyboardState::with_modifiers(modifiers))
            }
            (_, Some(_)) => return Err(ScriptError::NotAModifier(name.to_string())),
            (Command::Key(code), None) => self
                .encoder
                .encode_with_state(code, &KeyboardState::new()),
            (Command::Char(ch), None) => Some(self.encoder.encode_char(ch)),
            (Command::Modifier(_), None) => None,
        };
        encoded.ok_or_else(|| ScriptError::Untranslatable(body.to_string()))
    }
}

impl<L: KeyboardLayout> Iterator for CommandScriptEncoder<'_, L> {
    type Item = Result<EncodedInput, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.next()?;
        Some(match token {
            CommandToken::Literal(ch) => Ok(self.encoder.encode_char(ch)),
            CommandToken::Symbolic(body) => self.encode_symbolic(&body),
        })
    }
}

impl<L: KeyboardLayout> KeyEncoder<L> {
    /// Encode a command script lazily
    pub fn encode_script<'a>(&'a self, script: &'a str) -> CommandScriptEncoder<'a, L> {
        CommandScriptEncoder::new(self, script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::UsLayout;
    use proptest::prelude::*;

    fn tokens(script: &str) -> Vec<CommandToken> {
        tokenize(script).collect()
    }

    fn encode(script: &str) -> Result<Vec<String>, ScriptError> {
        KeyEncoder::new(UsLayout)
            .encode_script(script)
            .map(|r| r.map(EncodedInput::into_string))
            .collect()
    }

    #[test]
    fn test_tokenize_mixed() {
        assert_eq!(
            tokens("ab<Esc>"),
            vec![
                CommandToken::Literal('a'),
                CommandToken::Literal('b'),
                CommandToken::Symbolic("Esc".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_unterminated_is_literal() {
        assert_eq!(
            tokens("x<ab"),
            vec![
                CommandToken::Literal('x'),
                CommandToken::Literal('<'),
                CommandToken::Literal('a'),
                CommandToken::Literal('b'),
            ]
        );
        assert_eq!(
            tokens("<a<cr>"),
            vec![
                CommandToken::Literal('<'),
                CommandToken::Literal('a'),
                CommandToken::Symbolic("cr".into()),
            ]
        );
    }

    #[test]
    fn test_parse_symbolic() {
        assert_eq!(parse_symbolic("c-a"), Some(("c", Some('a'))));
        assert_eq!(parse_symbolic("esc"), Some(("esc", None)));
        assert_eq!(parse_symbolic("c--"), Some(("c", Some('-'))));
        assert_eq!(parse_symbolic("c-ab"), None);
        assert_eq!(parse_symbolic(""), None);
        assert_eq!(parse_symbolic("c-"), None);
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert_eq!(encode("<ESC><Cr><space>").unwrap(), ["<Esc>", "<Enter>", " "]);
        assert_eq!(encode("<F5><lt>").unwrap(), ["<F5>", "<lt>"]);
    }

    #[test]
    fn test_modifier_with_key() {
        assert_eq!(encode("<c-a>").unwrap(), ["<C-a>"]);
        assert_eq!(encode("<C-A>").unwrap(), ["<C-a>"]);
        assert_eq!(encode("<s-a>").unwrap(), ["A"]);
        assert_eq!(encode("<a-x>").unwrap(), ["<A-x>"]);
    }

    #[test]
    fn test_literal_shift_punctuation() {
        assert_eq!(encode("%{").unwrap(), ["%", "{"]);
        assert_eq!(encode("x<y").unwrap(), ["x", "<lt>", "y"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            encode("<bogus>"),
            Err(ScriptError::UnknownCommand("bogus".into()))
        );
        assert_eq!(
            encode("<esc-a>"),
            Err(ScriptError::NotAModifier("esc".into()))
        );
        assert_eq!(encode("<c>"), Err(ScriptError::Untranslatable("c".into())));
        assert_eq!(encode("<>"), Err(ScriptError::InvalidToken("".into())));
    }

    #[test]
    fn test_encoder_continues_after_error() {
        let encoder = KeyEncoder::new(UsLayout);
        let results: Vec<_> = encoder.encode_script("a<nope>b").collect();
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());
        assert_eq!(results[2], Ok(EncodedInput::literal('b')));
    }

    proptest! {
        #[test]
        fn tokenize_never_loses_characters(script in "[a-z<>-]{0,40}") {
            let rebuilt: String = tokenize(&script)
                .map(|t| match t {
                    CommandToken::Literal(c) => c.to_string(),
                    CommandToken::Symbolic(s) => format!("<{}>", s),
                })
                .collect();
            prop_assert_eq!(rebuilt, script);
        }

        #[test]
        fn plain_text_encodes_one_input_per_char(text in "[ -;=?-~]{0,40}") {
            let encoded = encode(&text).unwrap();
            prop_assert_eq!(encoded.len(), text.chars().count());
        }
    }
}
