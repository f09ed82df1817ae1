//! Decoding raw redraw calls into typed commands

use crate::color::Rgb;
use crate::command::{HighlightAttrs, RedrawCall, RedrawCommand};
use crate::error::{DecodeError, Result};
use crate::value::Value;

/// Commands the editor sends that have no visual effect on this front-end
const INERT_COMMANDS: &[&str] = &[
    "busy_start",
    "busy_stop",
    "mouse_on",
    "mouse_off",
    "bell",
    "visual_bell",
    "update_sp",
    "set_icon",
];

/// Decode a whole batch, skipping calls that fail to decode
///
/// Order is preserved. A bad call never affects the calls around it.
pub fn decode_batch(calls: &[RedrawCall]) -> Vec<RedrawCommand> {
    let mut commands = Vec::with_capacity(calls.len());
    for call in calls {
        match decode_call(call) {
            Ok(decoded) => commands.extend(decoded),
            Err(e) => log::debug!("Skipping redraw call: {}", e),
        }
    }
    commands
}

/// Decode one call into zero or more commands
///
/// `put` treats all of its argument lists as chunks of one invocation.
/// `highlight_set` merges its argument lists into one attribute change.
/// Every other command yields one command per argument list.
pub fn decode_call(call: &RedrawCall) -> Result<Vec<RedrawCommand>> {
    let name = call.name.as_str();
    match name {
        "put" => decode_put(call).map(|cmd| vec![cmd]),
        "highlight_set" => decode_highlight(call).map(|cmd| vec![cmd]),
        "insert_mode" => Ok(vec![RedrawCommand::ModeChange("insert".to_string())]),
        "normal_mode" => Ok(vec![RedrawCommand::ModeChange("normal".to_string())]),
        _ if INERT_COMMANDS.contains(&name) => Ok(Vec::new()),
        _ => {
            let decode_one: fn(&Args<'_>) -> Result<RedrawCommand> = match name {
                "clear" => |_| Ok(RedrawCommand::Clear),
                "eol_clear" => |_| Ok(RedrawCommand::EolClear),
                "resize" => |a| {
                    Ok(RedrawCommand::Resize {
                        cols: a.u32(0)?,
                        rows: a.u32(1)?,
                    })
                },
                "update_fg" => |a| Ok(RedrawCommand::SetForeground(Rgb::from_packed(a.i64(0)?))),
                "update_bg" => |a| Ok(RedrawCommand::SetBackground(Rgb::from_packed(a.i64(0)?))),
                "set_title" => |a| Ok(RedrawCommand::SetTitle(a.text(0)?)),
                "cursor_goto" => |a| {
                    Ok(RedrawCommand::CursorGoto {
                        row: a.u32(0)?,
                        col: a.u32(1)?,
                    })
                },
                "scroll" => |a| {
                    let count = a.i64(0)?;
                    let count = i32::try_from(count).map_err(|_| a.invalid(0, "32-bit count"))?;
                    Ok(RedrawCommand::Scroll(count))
                },
                "set_scroll_region" => |a| {
                    Ok(RedrawCommand::SetScrollRegion {
                        top: a.u32(0)?,
                        bottom: a.u32(1)?,
                        left: a.u32(2)?,
                        right: a.u32(3)?,
                    })
                },
                "mode_change" => |a| Ok(RedrawCommand::ModeChange(a.text(0)?)),
                _ => return Err(DecodeError::UnknownCommand(call.name.clone())),
            };

            // Argument-less commands may arrive with no argument list at all
            if call.args.is_empty() {
                return decode_one(&Args::new(name, &[])).map(|cmd| vec![cmd]);
            }
            call.args
                .iter()
                .map(|list| decode_one(&Args::new(name, list)))
                .collect()
        }
    }
}

fn decode_put(call: &RedrawCall) -> Result<RedrawCommand> {
    let mut bytes = Vec::new();
    for list in &call.args {
        let args = Args::new("put", list);
        bytes.extend_from_slice(args.bytes(0)?);
    }
    Ok(RedrawCommand::Put(bytes))
}

fn decode_highlight(call: &RedrawCall) -> Result<RedrawCommand> {
    let mut attrs = HighlightAttrs::default();
    for list in &call.args {
        let args = Args::new("highlight_set", list);
        let entries = args
            .get(0)?
            .as_map()
            .ok_or_else(|| args.invalid(0, "attribute map"))?;
        attrs.merge(parse_attrs(entries));
    }
    Ok(RedrawCommand::HighlightSet(attrs))
}

fn parse_attrs(entries: &[(Value, Value)]) -> HighlightAttrs {
    let mut attrs = HighlightAttrs::default();
    for (key, value) in entries {
        let Some(key) = key.as_str() else {
            continue;
        };
        match key {
            "foreground" => attrs.foreground = value.as_i64().and_then(Rgb::from_packed),
            "background" => attrs.background = value.as_i64().and_then(Rgb::from_packed),
            "bold" => attrs.bold = value.as_bool(),
            "italic" => attrs.italic = value.as_bool(),
            "underline" => attrs.underline = value.as_bool(),
            "reverse" => attrs.reverse = value.as_bool(),
            other => log::trace!("Ignoring highlight attribute '{}'", other),
        }
    }
    attrs
}

/// Positional view over one argument list
struct Args<'a> {
    command: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn new(command: &'a str, values: &'a [Value]) -> Self {
        Self { command, values }
    }

    fn get(&self, index: usize) -> Result<&'a Value> {
        self.values
            .get(index)
            .ok_or_else(|| DecodeError::MissingArgument {
                command: self.command.to_string(),
                index,
            })
    }

    fn invalid(&self, index: usize, expected: &'static str) -> DecodeError {
        DecodeError::InvalidArgument {
            command: self.command.to_string(),
            index,
            expected,
        }
    }

    fn i64(&self, index: usize) -> Result<i64> {
        self.get(index)?
            .as_i64()
            .ok_or_else(|| self.invalid(index, "integer"))
    }

    fn u32(&self, index: usize) -> Result<u32> {
        let n = self.i64(index)?;
        u32::try_from(n).map_err(|_| self.invalid(index, "non-negative integer"))
    }

    fn bytes(&self, index: usize) -> Result<&'a [u8]> {
        self.get(index)?
            .as_bytes()
            .ok_or_else(|| self.invalid(index, "string or binary"))
    }

    fn text(&self, index: usize) -> Result<String> {
        Ok(String::from_utf8_lossy(self.bytes(index)?).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Vec<Value>>) -> RedrawCall {
        RedrawCall::new(name, args)
    }

    #[test]
    fn test_put_concatenates_chunks() {
        // "€" split across two chunks
        let c = call(
            "put",
            vec![
                vec![Value::Binary(vec![b'a', 0xE2])],
                vec![Value::Binary(vec![0x82, 0xAC])],
            ],
        );
        let cmds = decode_call(&c).unwrap();
        assert_eq!(cmds, vec![RedrawCommand::Put("a€".as_bytes().to_vec())]);
    }

    #[test]
    fn test_cursor_goto_per_argument_list() {
        let c = call(
            "cursor_goto",
            vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]],
        );
        assert_eq!(
            decode_call(&c).unwrap(),
            vec![
                RedrawCommand::CursorGoto { row: 1, col: 2 },
                RedrawCommand::CursorGoto { row: 3, col: 4 },
            ]
        );
    }

    #[test]
    fn test_resize_argument_order() {
        let c = call("resize", vec![vec![100.into(), 30.into()]]);
        assert_eq!(
            decode_call(&c).unwrap(),
            vec![RedrawCommand::Resize { cols: 100, rows: 30 }]
        );
    }

    #[test]
    fn test_clear_without_arguments() {
        assert_eq!(
            decode_call(&call("clear", vec![])).unwrap(),
            vec![RedrawCommand::Clear]
        );
        assert_eq!(
            decode_call(&call("clear", vec![vec![]])).unwrap(),
            vec![RedrawCommand::Clear]
        );
    }

    #[test]
    fn test_colors() {
        let c = call("update_fg", vec![vec![0xFF0000.into()]]);
        assert_eq!(
            decode_call(&c).unwrap(),
            vec![RedrawCommand::SetForeground(Some(Rgb::new(255, 0, 0)))]
        );
        let c = call("update_bg", vec![vec![(-1).into()]]);
        assert_eq!(
            decode_call(&c).unwrap(),
            vec![RedrawCommand::SetBackground(None)]
        );
    }

    #[test]
    fn test_highlight_set_merges_maps() {
        let c = call(
            "highlight_set",
            vec![
                vec![Value::Map(vec![
                    ("foreground".into(), 0x00FF00.into()),
                    ("bold".into(), true.into()),
                ])],
                vec![Value::Map(vec![
                    ("bold".into(), false.into()),
                    ("blink".into(), true.into()),
                ])],
            ],
        );
        let cmds = decode_call(&c).unwrap();
        assert_eq!(
            cmds,
            vec![RedrawCommand::HighlightSet(HighlightAttrs {
                foreground: Some(Rgb::new(0, 255, 0)),
                bold: Some(false),
                ..Default::default()
            })]
        );
    }

    #[test]
    fn test_scroll_and_region() {
        assert_eq!(
            decode_call(&call("scroll", vec![vec![(-2).into()]])).unwrap(),
            vec![RedrawCommand::Scroll(-2)]
        );
        let c = call(
            "set_scroll_region",
            vec![vec![0.into(), 22.into(), 0.into(), 79.into()]],
        );
        assert_eq!(
            decode_call(&c).unwrap(),
            vec![RedrawCommand::SetScrollRegion {
                top: 0,
                bottom: 22,
                left: 0,
                right: 79
            }]
        );
    }

    #[test]
    fn test_mode_change_and_legacy_names() {
        assert_eq!(
            decode_call(&call("mode_change", vec![vec!["insert".into()]])).unwrap(),
            vec![RedrawCommand::ModeChange("insert".into())]
        );
        assert_eq!(
            decode_call(&call("normal_mode", vec![vec![]])).unwrap(),
            vec![RedrawCommand::ModeChange("normal".into())]
        );
    }

    #[test]
    fn test_unknown_and_inert_commands() {
        assert_eq!(
            decode_call(&call("grid_line", vec![])),
            Err(DecodeError::UnknownCommand("grid_line".into()))
        );
        assert_eq!(decode_call(&call("busy_start", vec![vec![]])).unwrap(), vec![]);
    }

    #[test]
    fn test_argument_errors() {
        assert_eq!(
            decode_call(&call("cursor_goto", vec![vec![1.into()]])),
            Err(DecodeError::MissingArgument {
                command: "cursor_goto".into(),
                index: 1
            })
        );
        assert!(matches!(
            decode_call(&call("cursor_goto", vec![vec![(-1).into(), 0.into()]])),
            Err(DecodeError::InvalidArgument { index: 0, .. })
        ));
        assert!(matches!(
            decode_call(&call("put", vec![vec![5.into()]])),
            Err(DecodeError::InvalidArgument { .. })
        ));
    }

    proptest::proptest! {
        #[test]
        fn prop_put_chunking_is_transparent(text in "\\PC{0,40}", cuts in proptest::collection::vec(0usize..160, 0..6)) {
            let bytes = text.as_bytes();
            let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c % (bytes.len() + 1)).collect();
            cuts.sort_unstable();
            let mut chunks = Vec::new();
            let mut start = 0;
            for cut in cuts.into_iter().chain(std::iter::once(bytes.len())) {
                chunks.push(vec![Value::Binary(bytes[start..cut].to_vec())]);
                start = cut;
            }
            let cmds = decode_call(&call("put", chunks)).unwrap();
            proptest::prop_assert_eq!(cmds, vec![RedrawCommand::Put(bytes.to_vec())]);
        }
    }

    #[test]
    fn test_batch_skips_bad_calls_in_order() {
        let batch = vec![
            call("clear", vec![vec![]]),
            call("no_such_thing", vec![vec![]]),
            call("cursor_goto", vec![vec![]]),
            call("put", vec![vec!["x".into()]]),
        ];
        assert_eq!(
            decode_batch(&batch),
            vec![RedrawCommand::Clear, RedrawCommand::Put(b"x".to_vec())]
        );
    }
}
