use serde::{Deserialize, Serialize};
use std::fmt;

/// Explorer commands that can be run without a terminal.
///
/// Targets name a node by id or, failing that, by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Back,
    Forward,
    CloseDocument,
    /// Resolve the node's action and apply it, as pressing Enter does
    Activate(String),
    ToggleExpand(String),
    /// Descend into a folder without going through the resolver
    Enter(String),
    Sequence(Vec<Command>),
}

impl Command {
    /// Parse a command from a string representation
    pub fn from_string(s: &str) -> Result<Self, String> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "back" | "[" => return Ok(Command::Back),
            "forward" | "]" => return Ok(Command::Forward),
            "close" | "escape" => return Ok(Command::CloseDocument),
            _ => {}
        }

        if let Some(inner) = s.strip_prefix("sequence:[").and_then(|rest| rest.strip_suffix(']')) {
            if inner.trim().is_empty() {
                return Ok(Command::Sequence(vec![]));
            }

            let mut commands = Vec::new();
            for cmd_str in split_top_level(inner) {
                match Command::from_string(cmd_str) {
                    Ok(cmd) => commands.push(cmd),
                    Err(e) => return Err(format!("Invalid command in sequence '{}': {}", cmd_str.trim(), e)),
                }
            }
            return Ok(Command::Sequence(commands));
        }

        let (verb, target) = s
            .split_once(':')
            .ok_or_else(|| format!("Unknown command: {}", s))?;
        let target = target.trim();
        if target.is_empty() {
            return Err(format!("Missing target in command: {}", s));
        }

        match verb.to_lowercase().as_str() {
            "activate" | "open" => Ok(Command::Activate(target.to_string())),
            "toggle" => Ok(Command::ToggleExpand(target.to_string())),
            "enter" => Ok(Command::Enter(target.to_string())),
            _ => Err(format!("Unknown command: {}", s)),
        }
    }
}

// Commas inside a nested `sequence:[...]` belong to the inner sequence
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Back => write!(f, "back"),
            Command::Forward => write!(f, "forward"),
            Command::CloseDocument => write!(f, "close"),
            Command::Activate(target) => write!(f, "activate:{}", target),
            Command::ToggleExpand(target) => write!(f, "toggle:{}", target),
            Command::Enter(target) => write!(f, "enter:{}", target),
            Command::Sequence(commands) => write!(
                f,
                "sequence:[{}]",
                commands
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }
}
