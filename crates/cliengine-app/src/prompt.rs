//! Line-oriented console I/O used by the loops and by interactive handlers.

use std::io::{self, BufRead, Write};

/// Prompt shown for answers to a handler's question.
pub const ANSWER_PROMPT: &str = ":> ";

/// A source of input lines and a sink for output lines.
pub trait Prompt {
    /// Show `prompt` and read one line without its terminator. `None` at end
    /// of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Print one line.
    fn say(&mut self, line: &str);
}

/// Console on the process's stdin and stdout.
pub struct StdinPrompt {
    input: io::StdinLock<'static>,
    output: io::Stdout,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for StdinPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // Keep the shell's next prompt off our prompt line.
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}") {
            log::warn!("failed to write to stdout: {e}");
        }
    }
}

/// Ask until the answer contains a non-whitespace character. Returns the
/// trimmed answer, or `None` at end of input.
pub fn ask_nonblank(prompt: &mut dyn Prompt) -> io::Result<Option<String>> {
    loop {
        let Some(answer) = prompt.read_line(ANSWER_PROMPT)? else {
            return Ok(None);
        };
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(Some(answer.to_string()));
        }
        prompt.say("Invalid format, try again.");
    }
}

/// Ask a `(y/N)` question. An empty answer is "no".
pub fn ask_yes_no(prompt: &mut dyn Prompt) -> io::Result<Option<bool>> {
    loop {
        let Some(answer) = prompt.read_line(ANSWER_PROMPT)? else {
            return Ok(None);
        };
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "" | "n" | "no" => return Ok(Some(false)),
            _ => prompt.say("Invalid format, try again."),
        }
    }
}

#[cfg(test)]
pub mod scripted {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;

    /// Replays canned input lines and records everything said.
    pub struct ScriptedPrompt {
        input: VecDeque<String>,
        output: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedPrompt {
        /// The prompt plus a handle on its transcript.
        pub fn new(lines: &[&str]) -> (Self, Rc<RefCell<Vec<String>>>) {
            let output = Rc::new(RefCell::new(Vec::new()));
            let prompt = Self {
                input: lines.iter().map(|l| l.to_string()).collect(),
                output: Rc::clone(&output),
            };
            (prompt, output)
        }
    }

    impl Prompt for ScriptedPrompt {
        fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.input.pop_front())
        }

        fn say(&mut self, line: &str) {
            self.output.borrow_mut().push(line.to_string());
        }
    }
}
