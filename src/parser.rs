//! Turns a raw line into the commands to dispatch.

use crate::{
    ast::ParsedCommand,
    error::ShellError,
    scanner::{pad_operator, split_parallel, tokenize, REDIRECT_OPERATOR},
};

/// Parses every parallel command of a line.
///
/// Blank segments are skipped. A malformed redirection in any segment
/// rejects the whole line, so nothing on it gets to run.
pub fn parse_line(line: &str) -> Result<Vec<ParsedCommand>, ShellError> {
    let padded = pad_operator(line);
    let mut commands = Vec::new();
    for segment in split_parallel(&padded) {
        let args = tokenize(segment);
        if args.is_empty() {
            continue;
        }
        let command = set_redirection(args)
            .ok_or_else(|| ShellError::MalformedRedirection(segment.trim().to_string()))?;
        commands.push(command);
    }
    log::debug!("parsed {} command(s): {:?}", commands.len(), commands);
    Ok(commands)
}

/// Extracts the redirection target from a segment's words.
///
/// The first `>` must have at least one word before it and exactly one word,
/// the filename, after it. Returns `None` when that does not hold.
pub fn set_redirection(mut args: Vec<String>) -> Option<ParsedCommand> {
    let operator = REDIRECT_OPERATOR.to_string();
    let Some(position) = args.iter().position(|arg| *arg == operator) else {
        return Some(ParsedCommand {
            args,
            redirect: None,
        });
    };

    if position == 0 || args.len() < 3 || args.len() - position - 1 != 1 {
        return None;
    }

    let filename = args.pop()?;
    args.truncate(position);
    Some(ParsedCommand {
        args,
        redirect: Some(filename),
    })
}
