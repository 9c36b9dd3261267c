//! Command engine.
//!
//! The engine is a registry-based dispatch system. Hosts register
//! [`CommandSpec`]s carrying typed argument descriptors and a [`Handler`].
//! The [`Dispatcher`] tokenizes an input line, resolves the command name,
//! binds the argument tokens, and invokes the handler, normalizing every
//! outcome into a [`ResultObject`].

mod binder;
mod dispatcher;
mod registry;
mod tokenizer;

/// Bind argument tokens to a command's argument specs.
pub use binder::{bind, coerce};
/// Line dispatcher and built-in command names.
pub use dispatcher::{BUILTIN_NAMES, Dispatcher};
/// Command definitions, handlers, and the registry.
pub use registry::{CommandRegistry, CommandSpec, Handler, RegistryOptions};
/// Lexical splitting of an input line.
pub use tokenizer::{TokenizedLine, tokenize};

pub use cliengine_types::args::{ArgumentSpec, ArgumentValue, Arguments, ValueType};
pub use cliengine_types::config::OverlapPolicy;
pub use cliengine_types::error::{BindError, EngineError, RegistrationError, Result};
pub use cliengine_types::result::{ResultObject, kind};
