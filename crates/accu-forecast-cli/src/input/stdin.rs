use serde_json::Value;
use std::io::{self, Read};

/// Attempt to read a JSON forecast request being piped on stdin.
/// Returns None when stdin is a TTY (interactive), so the caller can
/// fall back to `--input` or report the missing request.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    Ok(Some(value))
}
