//! Parsed form of one parallel command.

/// A command ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The command name followed by its arguments. Never empty.
    pub args: Vec<String>,

    /// File receiving both output and error streams, if redirected.
    pub redirect: Option<String>,
}

impl ParsedCommand {
    /// The command name.
    pub fn name(&self) -> &str {
        &self.args[0]
    }

    /// Arguments after the command name.
    pub fn operands(&self) -> &[String] {
        &self.args[1..]
    }
}
