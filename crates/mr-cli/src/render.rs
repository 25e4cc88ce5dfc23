//! Terminal rendering of engine messages.

use colored::{ColoredString, Colorize};
use mr_core::{Color, Message, StyledText};

fn paint(styled: &StyledText) -> ColoredString {
    let text = styled.text.as_str();
    let mut out = match styled.color {
        Color::Black => text.black(),
        Color::Red => text.red(),
        Color::Green => text.green(),
        Color::Yellow => text.yellow(),
        Color::Blue => text.blue(),
        Color::Magenta => text.magenta(),
        Color::Cyan => text.cyan(),
        Color::White => text.normal(),
    };
    if styled.bold {
        out = out.bold();
    }
    if styled.underline {
        out = out.underline();
    }
    if styled.blink {
        out = out.blink();
    }
    if styled.dim {
        out = out.dimmed();
    }
    if styled.reverse || styled.standout {
        out = out.reversed();
    }
    out
}

/// Render a message as one terminal line.
pub fn render(message: &Message) -> String {
    match message {
        Message::Plain(text) => text.clone(),
        Message::Styled(styled) => paint(styled).to_string(),
        Message::List(parts) => parts.iter().map(render).collect(),
    }
}
