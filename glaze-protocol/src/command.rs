//! Raw redraw calls and the typed commands decoded from them

use crate::color::Rgb;
use crate::value::Value;

/// One `(command name, argument lists)` pair as delivered by the editor
///
/// A batch is an ordered `Vec<RedrawCall>`.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawCall {
    pub name: String,
    pub args: Vec<Vec<Value>>,
}

impl RedrawCall {
    pub fn new(name: impl Into<String>, args: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Highlight attribute changes
///
/// Every field is optional: only the attributes present in the call are
/// applied, the rest keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightAttrs {
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub reverse: Option<bool>,
}

impl HighlightAttrs {
    /// Overlay `other` on top of `self`
    pub fn merge(&mut self, other: HighlightAttrs) {
        self.foreground = other.foreground.or(self.foreground);
        self.background = other.background.or(self.background);
        self.bold = other.bold.or(self.bold);
        self.italic = other.italic.or(self.italic);
        self.underline = other.underline.or(self.underline);
        self.reverse = other.reverse.or(self.reverse);
    }

    pub fn is_empty(&self) -> bool {
        *self == HighlightAttrs::default()
    }
}

/// A typed redraw command
///
/// Grid coordinates are in cells; the interpreter converts them to pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedrawCommand {
    Clear,
    Resize { cols: u32, rows: u32 },
    /// `None` restores the default foreground
    SetForeground(Option<Rgb>),
    /// `None` restores the default background
    SetBackground(Option<Rgb>),
    HighlightSet(HighlightAttrs),
    EolClear,
    SetTitle(String),
    /// Undecoded text; all chunks of one invocation already concatenated
    Put(Vec<u8>),
    CursorGoto { row: u32, col: u32 },
    /// Positive scrolls content up, negative down
    Scroll(i32),
    SetScrollRegion {
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    },
    ModeChange(String),
}

impl RedrawCommand {
    /// Whether applying the command changes visible pixels
    pub fn is_visual(&self) -> bool {
        matches!(
            self,
            RedrawCommand::Clear
                | RedrawCommand::EolClear
                | RedrawCommand::Put(_)
                | RedrawCommand::CursorGoto { .. }
                | RedrawCommand::Scroll(_)
                | RedrawCommand::ModeChange(_)
        )
    }
}
