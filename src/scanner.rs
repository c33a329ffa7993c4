//! Splits a raw command line into parallel segments and words.

use std::str::Chars;

/// Redirects a command's output and error streams to a file.
pub const REDIRECT_OPERATOR: char = '>';

/// Separates commands that run in parallel.
pub const PARALLEL_SEPARATOR: char = '&';

/// Surrounds every redirection operator with a space so it scans as a word
/// of its own, e.g. `ls>out` becomes `ls > out`.
pub fn pad_operator(line: &str) -> String {
    let mut padded = String::with_capacity(line.len() * 2);
    for c in line.chars() {
        if c == REDIRECT_OPERATOR {
            padded.push(' ');
            padded.push(c);
            padded.push(' ');
        } else {
            padded.push(c);
        }
    }
    padded
}

/// Splits a line into its parallel segments. Empty segments are kept.
pub fn split_parallel(line: &str) -> Vec<&str> {
    line.split(PARALLEL_SEPARATOR).collect()
}

/// Splits a segment into whitespace separated words.
pub fn tokenize(segment: &str) -> Vec<String> {
    let mut scanner = Scanner::new(segment);
    let mut words = Vec::new();
    while let Some(word) = scanner.next_word() {
        words.push(word);
    }
    words
}

/// Converts a segment's text into a stream of words.
struct Scanner<'a> {
    /// An iterator over the segment text.
    chars: Chars<'a>,

    /// Current value from the segment text being considered.
    current: Option<char>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Scanner<'a> {
        let mut scanner = Scanner {
            chars: text.chars(),
            current: None,
        };
        scanner.advance();
        scanner
    }

    /// Returns the next word, or `None` at the end of the text.
    fn next_word(&mut self) -> Option<String> {
        self.skip_whitespace();
        self.current?;

        let mut word = String::new();
        while let Some(c) = self.current {
            if is_whitespace(c) {
                break;
            }
            word.push(c);
            self.advance();
        }
        Some(word)
    }

    /// Advances the scanner past any whitespace.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current {
            if !is_whitespace(c) {
                break;
            }
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.current = self.chars.next();
    }
}

/// Determines if the given character separates words.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_operator_isolates_redirection() {
        assert_eq!(pad_operator("ls>out"), "ls > out");
        assert_eq!(pad_operator("ls -l"), "ls -l");
        assert_eq!(pad_operator(">>"), " >  > ");
    }

    #[test]
    fn split_parallel_keeps_empty_segments() {
        assert_eq!(split_parallel("ls"), vec!["ls"]);
        assert_eq!(split_parallel("a & b & c"), vec!["a ", " b ", " c"]);
        assert_eq!(split_parallel("&a&&"), vec!["", "a", "", ""]);
    }

    #[test]
    fn tokenize_splits_on_every_whitespace_kind() {
        assert_eq!(
            tokenize(" ls\t-l \x0b/tmp\x0c\r\n"),
            vec!["ls", "-l", "/tmp"]
        );
    }

    #[test]
    fn tokenize_blank_segment_is_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }
}
