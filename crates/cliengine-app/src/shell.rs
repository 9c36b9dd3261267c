//! The read-dispatch-render loop shared by the launcher and the session.

use std::io;

use cliengine_terminal::{CommandRegistry, Dispatcher};

use crate::prompt::Prompt;
use crate::render::render;

/// A dispatch context that owns the console the loop talks through.
pub trait Console {
    fn console(&mut self) -> &mut dyn Prompt;
}

/// Why a loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEnd {
    Exit,
    EndOfInput,
}

/// Read a line, dispatch it, print the rendered result, repeat until `exit`
/// or end of input.
pub fn run<C: Console>(registry: &CommandRegistry<C>, ctx: &mut C, prompt: &str) -> io::Result<LoopEnd> {
    let dispatcher = Dispatcher::new(registry);
    loop {
        let Some(line) = ctx.console().read_line(prompt)? else {
            log::debug!("end of input");
            return Ok(LoopEnd::EndOfInput);
        };
        let result = dispatcher.dispatch(&line, ctx);
        let console = ctx.console();
        for out in render(&result) {
            console.say(&out);
        }
        if result.is_exit() {
            return Ok(LoopEnd::Exit);
        }
    }
}
