//! Line sources: the rustyline editor for terminals and plain readers for
//! batch files and pipes.

use std::io::BufRead;

use rustyline::completion::Candidate;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{
    Completer, CompletionType, Config, Context, Editor, Helper, Highlighter, Hinter, Validator,
};
use trie_rs::{Trie, TrieBuilder};

use crate::builtin::BuiltIn;
use crate::scanner::PARALLEL_SEPARATOR;
use crate::system::SearchPath;

/// Supplies the shell with one raw line at a time.
pub trait LineSource {
    /// Reads the next line, or `None` at the end of input.
    ///
    /// `search_path` is the registry as it stands before the line is read.
    fn read_line(&mut self, search_path: &SearchPath) -> anyhow::Result<Option<String>>;
}

/// Reads lines from a file or a non-terminal standard input, no prompt.
pub struct Batch<R> {
    reader: R,
}

impl<R: BufRead> Batch<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for Batch<R> {
    fn read_line(&mut self, _search_path: &SearchPath) -> anyhow::Result<Option<String>> {
        let mut buffer = Vec::new();
        if self.reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }
}

/// Reads lines from a terminal with editing, history and command completion.
pub struct Interactive {
    editor: Editor<ShellHelper, FileHistory>,
    prompt: String,
}

impl Interactive {
    pub fn new(prompt: &str) -> anyhow::Result<Self> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(ShellHelper::new(ShellCompleter::default())));
        Ok(Self {
            editor,
            prompt: prompt.to_string(),
        })
    }
}

impl LineSource for Interactive {
    fn read_line(&mut self, search_path: &SearchPath) -> anyhow::Result<Option<String>> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.refresh(search_path);
        }

        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C drops the line being edited.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Helper, Completer, Hinter, Highlighter, Validator)]
pub struct ShellHelper {
    #[rustyline(Completer)]
    completer: ShellCompleter,
}

impl ShellHelper {
    fn new(completer: ShellCompleter) -> Self {
        Self { completer }
    }
}

/// Completes command names from the built-ins and the search path.
pub struct ShellCompleter {
    commands: Trie<u8>,

    /// The search path `commands` was built from.
    search_path: SearchPath,
}

impl Default for ShellCompleter {
    fn default() -> Self {
        Self::new(SearchPath::default())
    }
}

impl ShellCompleter {
    fn new(search_path: SearchPath) -> Self {
        Self {
            commands: command_trie(&search_path),
            search_path,
        }
    }

    /// Rebuilds the known commands if the search path has changed.
    fn refresh(&mut self, search_path: &SearchPath) {
        if self.search_path != *search_path {
            *self = Self::new(search_path.clone());
        }
    }

    /// Returns the completions for the command name being typed at `pos`.
    fn candidates(&self, line: &str, pos: usize) -> Vec<ShellCompletionCandidate> {
        let before = &line[..pos];
        let segment = before
            .rsplit(PARALLEL_SEPARATOR)
            .next()
            .unwrap_or(before)
            .trim_start();

        // Only the first word of a command is completed.
        if segment.is_empty() || segment.contains(char::is_whitespace) {
            return Vec::new();
        }

        let mut candidates: Vec<ShellCompletionCandidate> = self
            .commands
            .postfix_search(segment)
            .map(|completion: String| ShellCompletionCandidate::new(segment, completion))
            .collect();
        candidates.sort_by(|a, b| a.display.cmp(&b.display));
        candidates
    }
}

impl rustyline::completion::Completer for ShellCompleter {
    type Candidate = ShellCompletionCandidate;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<ShellCompletionCandidate>)> {
        Ok((pos, self.candidates(line, pos)))
    }
}

/// Builds a trie of every built-in and every executable in `search_path`.
fn command_trie(search_path: &SearchPath) -> Trie<u8> {
    let mut trie_builder = TrieBuilder::new();
    for built_in in BuiltIn::ALL {
        trie_builder.push(built_in.name());
    }
    for name in search_path.executable_names() {
        trie_builder.push(name);
    }
    trie_builder.build()
}

pub struct ShellCompletionCandidate {
    display: String,
    replacement: String,
}

impl ShellCompletionCandidate {
    fn new(prefix: &str, completion: String) -> Self {
        let mut display = String::new();
        display.push_str(prefix);
        display.push_str(&completion);

        let mut replacement = completion;
        replacement.push(' ');

        Self {
            display,
            replacement,
        }
    }
}

impl Candidate for ShellCompletionCandidate {
    fn display(&self) -> &str {
        &self.display
    }

    fn replacement(&self) -> &str {
        &self.replacement
    }
}
