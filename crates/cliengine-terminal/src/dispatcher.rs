//! Line dispatch: tokenize, resolve, bind, invoke, normalize.
//!
//! Every outcome becomes a [`ResultObject`]; nothing a handler does (error
//! or panic) propagates out of [`Dispatcher::dispatch`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use cliengine_types::args::{ArgumentSpec, Arguments, ValueType};
use cliengine_types::result::ResultObject;

use crate::binder::bind;
use crate::registry::{CommandRegistry, CommandSpec, normalize};
use crate::tokenizer::tokenize;

/// Names answered by the dispatcher itself. They cannot be registered.
pub const BUILTIN_NAMES: &[&str] = &["help", "exit", "quit"];

/// Resolves input lines against a registry and invokes handlers.
///
/// Stateless per call; holds only a shared borrow of the registry, so a
/// dispatch can never alter registered commands.
pub struct Dispatcher<'r, C> {
    registry: &'r CommandRegistry<C>,
}

impl<'r, C> Dispatcher<'r, C> {
    pub fn new(registry: &'r CommandRegistry<C>) -> Self {
        Self { registry }
    }

    /// Dispatch one input line.
    ///
    /// - empty line: `{type: "empty"}`
    /// - `help [command]`, `exit`/`quit`: built-in results
    /// - unregistered name: `{type: "unknown_command", input}`, plus
    ///   `suggestions` when registered names start with the input
    /// - bind failure: `{type: "invalid_argument", command, reason, message}`
    /// - handler error or panic: `{type: "failed", reason: "internal_error"}`
    /// - otherwise the handler's own result, unmodified
    pub fn dispatch(&self, line: &str, ctx: &mut C) -> ResultObject {
        let line = tokenize(line);
        if line.is_empty() {
            return ResultObject::empty();
        }

        let name = normalize(&line.command);
        match name.as_str() {
            "help" => return self.help(&line.args),
            "exit" | "quit" => return exit(&name, &line.args),
            _ => {},
        }

        let Some(spec) = self.registry.lookup(&name) else {
            log::debug!("unknown command '{}'", line.command);
            let suggestions = self.registry.completions(&name);
            let result = ResultObject::unknown_command(line.command);
            if suggestions.is_empty() {
                return result;
            }
            return result.with("suggestions", suggestions);
        };

        match bind(spec.arguments(), &line.args) {
            Ok(args) => {
                log::debug!("dispatching '{}' with {} argument(s)", spec.name(), args.len());
                invoke(spec, &args, ctx)
            },
            Err(e) => {
                log::warn!("invalid arguments for '{}': {e}", spec.name());
                ResultObject::invalid_argument(spec.name(), &e)
            },
        }
    }

    /// Built-in `help [command]`.
    fn help(&self, tokens: &[String]) -> ResultObject {
        let specs = [ArgumentSpec::optional("command", ValueType::String)];
        let args = match bind(&specs, tokens) {
            Ok(args) => args,
            Err(e) => return ResultObject::invalid_argument("help", &e),
        };

        match args.string("command") {
            None => ResultObject::help(self.listing()),
            Some(name) => {
                let content = self
                    .details(name)
                    .unwrap_or_else(|| format!("No such command '{name}'"));
                ResultObject::help(content).with("command", name)
            },
        }
    }

    fn listing(&self) -> String {
        let mut out = String::from("Available commands:\n");
        for spec in self.registry.all() {
            push_entry(&mut out, &spec.usage(), spec.summary());
        }
        push_entry(&mut out, "help [command:str]", "Show commands or details for one command");
        push_entry(&mut out, "exit", "Leave the current loop (alias: quit)");
        out.push_str("\nType 'help <command>' for details.");
        out
    }

    fn details(&self, name: &str) -> Option<String> {
        match normalize(name).as_str() {
            "help" => Some(
                "Help for command 'help':\n  Usage: help [command:str]\n\n\
                 List the available commands or show help for one command."
                    .to_string(),
            ),
            "exit" | "quit" => Some(
                "Help for command 'exit':\n  Usage: exit\n  Aliases: quit\n\n\
                 Leave the current loop."
                    .to_string(),
            ),
            _ => self.registry.lookup(name).map(describe),
        }
    }
}

fn describe<C>(spec: &CommandSpec<C>) -> String {
    let mut out = format!("Help for command '{}':\n  Usage: {}", spec.name(), spec.usage());
    if !spec.aliases().is_empty() {
        out.push_str(&format!("\n  Aliases: {}", spec.aliases().join(", ")));
    }
    if !spec.summary().is_empty() {
        out.push_str("\n\n");
        out.push_str(spec.summary());
    }
    out
}

fn push_entry(out: &mut String, usage: &str, summary: &str) {
    if summary.is_empty() {
        out.push_str(&format!("  - {usage}\n"));
    } else {
        out.push_str(&format!("  - {usage:28} {summary}\n"));
    }
}

/// Built-in `exit`; takes no arguments.
fn exit(name: &str, tokens: &[String]) -> ResultObject {
    match bind(&[], tokens) {
        Ok(_) => ResultObject::exit(),
        Err(e) => ResultObject::invalid_argument(name, &e),
    }
}

/// Run a handler, turning errors and panics into an internal-error result.
fn invoke<C>(spec: &CommandSpec<C>, args: &Arguments, ctx: &mut C) -> ResultObject {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| spec.handler().invoke(args, ctx)));
    match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            log::error!("command '{}' failed: {e}", spec.name());
            ResultObject::internal_error(spec.name())
        },
        Err(payload) => {
            log::error!(
                "command '{}' panicked: {}",
                spec.name(),
                panic_message(payload.as_ref())
            );
            ResultObject::internal_error(spec.name())
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
