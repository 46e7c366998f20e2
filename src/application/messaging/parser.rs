//! Message parser - splits prefixed text into a command name and arguments

/// A prefixed message split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// First token, lowercased
    pub name: String,
    pub args: Vec<String>,
    /// Text after the prefix, trimmed
    body: String,
}

impl ParsedCommand {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// All arguments joined by single spaces
    pub fn query(&self) -> String {
        self.args.join(" ")
    }

    /// Raw text after the command name and the first `skip` arguments, with
    /// the original spacing and line breaks preserved
    pub fn rest(&self, skip: usize) -> &str {
        let mut remaining = self.body.as_str();
        for _ in 0..=skip {
            remaining = remaining.trim_start();
            let end = remaining
                .find(char::is_whitespace)
                .unwrap_or(remaining.len());
            remaining = &remaining[end..];
        }
        remaining.trim()
    }
}

/// Parses incoming text against the active prefix
pub struct MessageParser;

impl MessageParser {
    /// `None` when `text` does not start with `prefix`. An empty prefix
    /// accepts every message.
    pub fn parse(prefix: &str, text: &str) -> Option<ParsedCommand> {
        let body = text.strip_prefix(prefix)?.trim();

        let mut parts = body.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args = parts.map(str::to_string).collect();

        Some(ParsedCommand {
            name,
            args,
            body: body.to_string(),
        })
    }
}
