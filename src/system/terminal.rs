// src/system/terminal.rs

use crate::constants::INSECURE_INPUT_WARNING;
use dialoguer::console::Term;
use std::{
    collections::VecDeque,
    io::{self, BufRead, IsTerminal},
};

/// The interactive channels a prompt talks to: a diagnostic stream for the
/// prompt text, a line reader, and a line reader that does not echo.
///
/// Prompt text never goes to standard output, so piping a program's output
/// does not capture its questions.
pub trait Terminal {
    /// Writes prompt text to the diagnostic stream, without a trailing newline.
    fn write_prompt(&mut self, text: &str) -> io::Result<()>;

    /// Reads one line, without its line terminator. End of input reads as an empty line.
    fn read_line(&mut self) -> io::Result<String>;

    /// Like [`Terminal::read_line`], but the typed characters are not echoed.
    fn read_secure_line(&mut self) -> io::Result<String>;
}

/// The real terminal: prompts on stderr, answers from stdin.
///
/// Answers are read from stdin whether or not it is a terminal, so they can be
/// piped in. Hidden input goes through the tty when both stdin and stderr are one.
#[derive(Debug)]
pub struct ConsoleTerminal {
    term: Term,
}

impl ConsoleTerminal {
    /// A terminal writing its prompts to stderr.
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Terminal for ConsoleTerminal {
    fn write_prompt(&mut self, text: &str) -> io::Result<()> {
        self.term.write_str(text)?;
        self.term.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        read_answer(&mut io::stdin().lock())
    }

    fn read_secure_line(&mut self) -> io::Result<String> {
        if io::stdin().is_terminal() && self.term.is_term() {
            return self.term.read_secure_line();
        }
        // Piped input has no echo to suppress, and a redirected stderr
        // leaves no tty to hide it on.
        log::warn!("{}", INSECURE_INPUT_WARNING);
        self.read_line()
    }
}

/// Reads one line from `reader`, dropping the `\n` or `\r\n` terminator.
/// End of input yields an empty string.
fn read_answer(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(line)
}

/// Which reader served an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    /// [`Terminal::read_line`]
    Plain,
    /// [`Terminal::read_secure_line`]
    Secure,
}

/// A terminal that replays queued answers and records everything it was
/// asked. Once the queue is exhausted every read behaves like end of input.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    transcript: String,
    reads: Vec<InputChannel>,
}

impl ScriptedTerminal {
    /// Queues `answers`, served in order by both readers.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything written to the diagnostic stream so far.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// The channel used by each read, in order.
    pub fn reads(&self) -> &[InputChannel] {
        &self.reads
    }

    /// Answers that were never consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, channel: InputChannel) -> String {
        self.reads.push(channel);
        self.answers.pop_front().unwrap_or_default()
    }
}

impl Terminal for ScriptedTerminal {
    fn write_prompt(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        let answer = self.next_answer(InputChannel::Plain);
        // An interactive user sees their own answer echoed.
        self.transcript.push_str(&answer);
        self.transcript.push('\n');
        Ok(answer)
    }

    fn read_secure_line(&mut self) -> io::Result<String> {
        let answer = self.next_answer(InputChannel::Secure);
        self.transcript.push('\n');
        Ok(answer)
    }
}
