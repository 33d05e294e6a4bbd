//! Command definitions
//!
//! Textual commands accepted by the CLI shell.
//!
//! ```text
//! SET <key> <value...>
//! GET <key>
//! PING
//! ```

use crate::error::{CooperError, Result};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Vec<u8> },

    /// Set a key-value pair
    Set { key: Vec<u8>, value: Vec<u8> },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Parse one input line
    ///
    /// The command name is case-insensitive. For `SET`, everything after
    /// the key (minus the separating whitespace) is the value.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };

        match name.to_ascii_uppercase().as_str() {
            "GET" => {
                let key = single_arg(rest, "GET <key>")?;
                Ok(Command::Get {
                    key: key.as_bytes().to_vec(),
                })
            }
            "SET" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| usage("SET <key> <value>"))?;
                Ok(Command::Set {
                    key: key.as_bytes().to_vec(),
                    value: value.trim_start().as_bytes().to_vec(),
                })
            }
            "PING" if rest.is_empty() => Ok(Command::Ping),
            "PING" => Err(usage("PING")),
            "" => Err(CooperError::InvalidCommand("empty input".to_string())),
            other => Err(CooperError::InvalidCommand(format!(
                "unknown command '{}'",
                other
            ))),
        }
    }
}

fn single_arg<'a>(rest: &'a str, form: &str) -> Result<&'a str> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(usage(form));
    }
    Ok(rest)
}

fn usage(form: &str) -> CooperError {
    CooperError::InvalidCommand(format!("usage: {}", form))
}
