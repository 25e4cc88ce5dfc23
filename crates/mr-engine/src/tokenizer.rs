//! Command tokenizer.

use crate::error::{EngineError, EngineResult};

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Split command text into tokens.
///
/// Whitespace separates tokens. A `"` or `'` opens a quoted run in which
/// whitespace is literal; any quote character closes it. Quote characters
/// are stripped, and text touching a quote joins the same token, so
/// `say "hello there"` gives `["say", "hello there"]`. An explicit `""`
/// yields an empty token. An unclosed quote is an error.
pub fn split_args(raw: &str) -> EngineResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    // A token is pending once it has content or contained a quote.
    let mut pending = false;
    let mut quote_start: Option<usize> = None;

    for (i, c) in raw.char_indices() {
        if quote_start.is_some() {
            if is_quote(c) {
                quote_start = None;
            } else {
                buffer.push(c);
            }
        } else if is_quote(c) {
            quote_start = Some(i);
            pending = true;
        } else if c.is_whitespace() {
            if pending {
                tokens.push(std::mem::take(&mut buffer));
                pending = false;
            }
        } else {
            buffer.push(c);
            pending = true;
        }
    }

    if let Some(position) = quote_start {
        return Err(EngineError::UnterminatedQuote { position });
    }
    if pending {
        tokens.push(buffer);
    }
    Ok(tokens)
}
