//! Messages delivered to clients through the output sink.
//!
//! The wire shape is adjacently tagged:
//! `{"type": "PlainText" | "RichText" | "List", "content": ...}`, with
//! colors encoded as terminal color numbers 0-7.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight basic terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Color {
    /// Color 0.
    Black,
    /// Color 1.
    Red,
    /// Color 2.
    Green,
    /// Color 3.
    Yellow,
    /// Color 4.
    Blue,
    /// Color 5.
    Magenta,
    /// Color 6.
    Cyan,
    /// Color 7, the default foreground.
    #[default]
    White,
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::Black),
            1 => Ok(Self::Red),
            2 => Ok(Self::Green),
            3 => Ok(Self::Yellow),
            4 => Ok(Self::Blue),
            5 => Ok(Self::Magenta),
            6 => Ok(Self::Cyan),
            7 => Ok(Self::White),
            other => Err(format!("color out of range: {other}")),
        }
    }
}

/// A run of text with a color and style flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyledText {
    /// The text itself.
    pub text: String,
    /// Foreground color.
    pub color: Color,
    /// Standout (highlight) mode.
    pub standout: bool,
    /// Bold weight.
    pub bold: bool,
    /// Blinking text.
    pub blink: bool,
    /// Dimmed text.
    pub dim: bool,
    /// Reversed foreground and background.
    pub reverse: bool,
    /// Underlined text.
    pub underline: bool,
}

impl StyledText {
    /// Create unstyled text in the given color.
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            ..Self::default()
        }
    }

    /// Set bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set underline.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Set blink.
    pub fn blink(mut self) -> Self {
        self.blink = true;
        self
    }

    /// Set dim.
    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    /// Set reverse.
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Set standout.
    pub fn standout(mut self) -> Self {
        self.standout = true;
        self
    }
}

/// A message for a client: plain text, styled text, or a composite line
/// built from an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum Message {
    /// Unstyled text.
    #[serde(rename = "PlainText")]
    Plain(String),
    /// A single styled run.
    #[serde(rename = "RichText")]
    Styled(StyledText),
    /// Parts rendered one after another on the same line.
    #[serde(rename = "List")]
    List(Vec<Message>),
}

impl Message {
    /// The message text with all styling stripped.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Plain(s) => s.clone(),
            Self::Styled(st) => st.text.clone(),
            Self::List(parts) => parts.iter().map(Message::plain_text).collect(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plain_text())
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}

impl From<StyledText> for Message {
    fn from(st: StyledText) -> Self {
        Self::Styled(st)
    }
}

impl From<Vec<Message>> for Message {
    fn from(parts: Vec<Message>) -> Self {
        Self::List(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_wire_shape() {
        let json = serde_json::to_value(Message::from("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "PlainText", "content": "hello"})
        );
    }

    #[test]
    fn styled_text_wire_shape() {
        let msg = Message::from(StyledText::new("Room", Color::Yellow).bold().underline());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "RichText");
        assert_eq!(json["content"]["color"], 3);
        assert_eq!(json["content"]["bold"], true);
        assert_eq!(json["content"]["blink"], false);
    }

    #[test]
    fn missing_style_fields_default() {
        let msg: Message =
            serde_json::from_str(r#"{"type": "RichText", "content": {"text": "hi"}}"#).unwrap();
        assert_eq!(msg, Message::Styled(StyledText::new("hi", Color::White)));
    }

    #[test]
    fn out_of_range_color_rejected() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"type": "RichText", "content": {"text": "hi", "color": 9}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn list_plain_text_concatenates() {
        let msg = Message::List(vec![
            StyledText::new("Hero: ", Color::Yellow).into(),
            "hello".into(),
        ]);
        assert_eq!(msg.plain_text(), "Hero: hello");
    }
}
