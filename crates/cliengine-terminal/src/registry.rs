//! Command definitions, the handler capability, and the command registry.

use std::collections::{HashMap, HashSet};
use std::fmt;

use cliengine_types::args::{ArgumentSpec, Arguments};
use cliengine_types::config::OverlapPolicy;
use cliengine_types::error::{RegistrationError, Result};
use cliengine_types::result::ResultObject;

use crate::dispatcher::BUILTIN_NAMES;

/// Host-defined command logic.
///
/// `C` is the host context handed to every invocation (game state, launcher
/// state, ...). An `Err` return is treated as an internal fault by the
/// dispatcher, not as a user-facing failure; handlers report expected
/// failures with a `failed` result instead.
pub trait Handler<C> {
    /// Run the command with bound arguments.
    fn invoke(&self, args: &Arguments, ctx: &mut C) -> Result<ResultObject>;
}

impl<C, F> Handler<C> for F
where
    F: Fn(&Arguments, &mut C) -> Result<ResultObject>,
{
    fn invoke(&self, args: &Arguments, ctx: &mut C) -> Result<ResultObject> {
        self(args, ctx)
    }
}

/// Lowercase and trim a command name for storage and comparison.
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// A named command with ordered argument specs and a handler.
pub struct CommandSpec<C> {
    name: String,
    aliases: Vec<String>,
    description: String,
    args: Vec<ArgumentSpec>,
    handler: Box<dyn Handler<C>>,
}

impl<C> CommandSpec<C> {
    /// A command with no arguments. The name is case-normalized.
    pub fn new(name: &str, handler: impl Handler<C> + 'static) -> Self {
        Self {
            name: normalize(name),
            aliases: Vec::new(),
            description: String::new(),
            args: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, spec: ArgumentSpec) -> Self {
        self.args.push(spec);
        self
    }

    /// Append several positional arguments.
    pub fn args(mut self, specs: impl IntoIterator<Item = ArgumentSpec>) -> Self {
        self.args.extend(specs);
        self
    }

    /// Add an alternative name.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(normalize(alias));
        self
    }

    /// One-line description for `help`.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn summary(&self) -> &str {
        &self.description
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.args
    }

    pub fn handler(&self) -> &dyn Handler<C> {
        self.handler.as_ref()
    }

    /// Usage string, e.g. `give <amount:int> [note:str]`.
    pub fn usage(&self) -> String {
        let mut out = self.name.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.usage());
        }
        out
    }

    /// Comma-separated value-type names, `()` when there are no arguments.
    pub fn signature(&self) -> String {
        if self.args.is_empty() {
            return "()".to_string();
        }
        self.args
            .iter()
            .map(|a| a.value_type.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Name followed by aliases.
    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Same ordered sequence of value-type kinds. Names and defaults are
    /// not compared.
    fn overlaps(&self, other: &CommandSpec<C>) -> bool {
        self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .zip(&other.args)
                .all(|(a, b)| a.value_type.same_kind(&b.value_type))
    }

    /// Check the per-command invariants: non-empty names, unique argument
    /// names, type-matching defaults, no required argument after an optional.
    fn validate(&self) -> std::result::Result<(), RegistrationError> {
        if self.names().any(str::is_empty) {
            return Err(RegistrationError::EmptyName);
        }
        let mut seen = HashSet::new();
        let mut saw_optional = false;
        for arg in &self.args {
            if !seen.insert(arg.name.as_str()) {
                return Err(RegistrationError::DuplicateArgument {
                    command: self.name.clone(),
                    argument: arg.name.clone(),
                });
            }
            if !arg.default_is_valid() {
                return Err(RegistrationError::InvalidDefault {
                    command: self.name.clone(),
                    argument: arg.name.clone(),
                });
            }
            if arg.required && saw_optional {
                return Err(RegistrationError::RequiredAfterOptional {
                    command: self.name.clone(),
                    argument: arg.name.clone(),
                });
            }
            saw_optional |= !arg.required;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for CommandSpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Registry configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    pub overlap_policy: OverlapPolicy,
}

/// Registry of available commands.
///
/// Commands are kept in insertion order; names and aliases are indexed
/// case-insensitively. Registration happens before dispatch begins.
pub struct CommandRegistry<C> {
    commands: Vec<CommandSpec<C>>,
    index: HashMap<String, usize>,
    options: RegistryOptions,
}

impl<C> CommandRegistry<C> {
    /// Create an empty registry that rejects overlapping signatures.
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    /// Register a command.
    ///
    /// Fails with `DuplicateName` when the name or an alias is taken, and
    /// with `OverlappingSignature` when an existing command has the same
    /// ordered argument types (subject to the overlap policy). The registry
    /// is unchanged on failure.
    pub fn register(&mut self, spec: CommandSpec<C>) -> std::result::Result<(), RegistrationError> {
        spec.validate()?;

        let mut names = HashSet::new();
        for name in spec.names() {
            if BUILTIN_NAMES.contains(&name) {
                return Err(RegistrationError::ReservedName(name.to_string()));
            }
            if self.index.contains_key(name) || !names.insert(name) {
                return Err(RegistrationError::DuplicateName(name.to_string()));
            }
        }

        if self.options.overlap_policy != OverlapPolicy::Allow
            && let Some(existing) = self.commands.iter().find(|c| c.overlaps(&spec))
        {
            if self.options.overlap_policy == OverlapPolicy::Reject {
                return Err(RegistrationError::OverlappingSignature {
                    command: spec.name.clone(),
                    existing: existing.name.clone(),
                    signature: spec.signature(),
                });
            }
            log::warn!(
                "command '{}' overlaps signature ({}) of command '{}'",
                spec.name,
                spec.signature(),
                existing.name
            );
        }

        let pos = self.commands.len();
        for name in spec.names() {
            self.index.insert(name.to_string(), pos);
        }
        log::debug!("registered command '{}' ({})", spec.name, spec.usage());
        self.commands.push(spec);
        Ok(())
    }

    /// Find a command by name or alias, case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&CommandSpec<C>> {
        self.index
            .get(&normalize(name))
            .map(|&pos| &self.commands[pos])
    }

    /// All commands in registration order.
    pub fn all(&self) -> &[CommandSpec<C>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Sorted command names and aliases starting with `partial`.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let lower = normalize(partial);
        let mut out: Vec<String> = self
            .index
            .keys()
            .filter(|name| name.starts_with(&lower))
            .cloned()
            .collect();
        out.sort();
        out
    }
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
