//! Game launcher: the top-level `>` loop for managing and starting profiles.

use cliengine_profile::allocator::strip_extension;
use cliengine_profile::profile::{self, suggest_id};
use cliengine_profile::store::validate_identifier;
use cliengine_profile::RecordStore;
use cliengine_terminal::{
    ArgumentSpec, Arguments, CommandRegistry, CommandSpec, EngineError, OverlapPolicy,
    RegistrationError, RegistryOptions, Result, ResultObject, ValueType,
};
use cliengine_types::config::Settings;

use crate::prompt::{self, ANSWER_PROMPT, Prompt};
use crate::render::MESSAGE;
use crate::session;
use crate::shell::{self, Console, LoopEnd};

/// Outcome of choosing an id for a new or renamed profile.
enum IdAnswer {
    Accepted(String),
    /// An id given as an argument that cannot be used.
    Rejected(&'static str),
    Interrupted,
}

/// Launcher state shared by every launcher command.
pub struct Launcher {
    store: Box<dyn RecordStore>,
    prompt: Box<dyn Prompt>,
    settings: Settings,
}

impl Launcher {
    pub fn new(store: Box<dyn RecordStore>, prompt: Box<dyn Prompt>, settings: Settings) -> Self {
        Self {
            store,
            prompt,
            settings,
        }
    }

    /// Run the launcher loop until `exit` or end of input.
    pub fn run(&mut self) -> Result<LoopEnd> {
        let registry = registry(self.settings.overlap_policy)?;
        let prompt = self.settings.prompt.clone();
        self.prompt.say("Game Launcher Running.");
        let end = shell::run(&registry, self, &prompt)?;
        if end == LoopEnd::EndOfInput {
            self.prompt.say("Process interrupted.");
        }
        Ok(end)
    }

    /// The profile id named by the `profile_id` argument, with a typed-out
    /// record extension removed.
    fn profile_id(&self, args: &Arguments) -> Result<String> {
        let input = args
            .string("profile_id")
            .ok_or_else(|| EngineError::Handler("profile_id was not bound".to_string()))?;
        let id = strip_extension(input, &self.settings.record_extension).unwrap_or(input);
        Ok(id.to_string())
    }

    /// Why `id` cannot be used for a new or renamed profile. `current` is
    /// the id being renamed, which may be kept.
    fn id_problem(&self, id: &str, current: Option<&str>) -> Result<Option<&'static str>> {
        if validate_identifier(id).is_err() {
            return Ok(Some(
                "Profile ID must be non-empty and must not contain path separators.",
            ));
        }
        if current != Some(id) && self.store.exists(id)? {
            return Ok(Some("Profile ID taken, please choose another one."));
        }
        Ok(None)
    }

    /// The profile id from the `key` argument, or asked for with `suggested`
    /// offered for an empty answer.
    fn new_profile_id(
        &mut self,
        args: &Arguments,
        key: &str,
        suggested: &str,
        current: Option<&str>,
    ) -> Result<IdAnswer> {
        if let Some(id) = args.string(key).map(str::trim) {
            return Ok(match self.id_problem(id, current)? {
                Some(problem) => IdAnswer::Rejected(problem),
                None => IdAnswer::Accepted(id.to_string()),
            });
        }
        self.prompt.say("Please enter the ID of the profile.");
        self.prompt
            .say(&format!("Leave empty for auto-generated one: '{suggested}'"));
        loop {
            let Some(answer) = self.prompt.read_line(ANSWER_PROMPT)? else {
                return Ok(IdAnswer::Interrupted);
            };
            let answer = answer.trim();
            let id = if answer.is_empty() { suggested } else { answer };
            match self.id_problem(id, current)? {
                Some(problem) => self.prompt.say(problem),
                None => return Ok(IdAnswer::Accepted(id.to_string())),
            }
        }
    }

    /// A profile name from the `name` argument, or asked for.
    fn profile_name(&mut self, args: &Arguments, question: &str) -> Result<Option<String>> {
        if let Some(name) = args.string("name").map(str::trim)
            && !name.is_empty()
        {
            return Ok(Some(name.to_string()));
        }
        self.prompt.say(question);
        Ok(prompt::ask_nonblank(&mut *self.prompt)?)
    }
}

impl Console for Launcher {
    fn console(&mut self) -> &mut dyn Prompt {
        &mut *self.prompt
    }
}

/// Launcher commands.
pub fn registry(
    policy: OverlapPolicy,
) -> std::result::Result<CommandRegistry<Launcher>, RegistrationError> {
    let mut reg = CommandRegistry::with_options(RegistryOptions {
        overlap_policy: policy,
    });
    reg.register(
        CommandSpec::new("list", list_profiles)
            .alias("ls")
            .description("List the available profiles."),
    )?;
    reg.register(
        CommandSpec::new("new", new_profile)
            .alias("init")
            .arg(ArgumentSpec::optional("name", ValueType::String))
            .arg(ArgumentSpec::optional("id", ValueType::String))
            .description("Create a new profile. Missing name or ID is prompted for."),
    )?;
    reg.register(
        CommandSpec::new("run", run_profile)
            .alias("play")
            .arg(ArgumentSpec::required("profile_id", ValueType::String))
            .description("Play the selected profile by ID."),
    )?;
    reg.register(
        CommandSpec::new("rm", remove_profile)
            .alias("del")
            .arg(ArgumentSpec::required("profile_id", ValueType::String))
            .arg(ArgumentSpec::optional("confirm", ValueType::Boolean))
            .description("Delete the selected profile by ID."),
    )?;
    reg.register(
        CommandSpec::new("mv", rename_profile)
            .alias("rename")
            .arg(ArgumentSpec::required("profile_id", ValueType::String))
            .arg(ArgumentSpec::optional("name", ValueType::String))
            .arg(ArgumentSpec::optional("new_id", ValueType::String))
            .description("Rename the selected profile by ID. Missing name or ID is prompted for."),
    )?;
    Ok(reg)
}

fn failed(message: impl Into<String>) -> Result<ResultObject> {
    Ok(ResultObject::failed().with(MESSAGE, message.into()))
}

fn list_profiles(_args: &Arguments, ctx: &mut Launcher) -> Result<ResultObject> {
    let profiles = profile::list(&*ctx.store)?;
    if profiles.is_empty() {
        return Ok(ResultObject::success().with(MESSAGE, "No profile available."));
    }
    let mut text = String::from("Available profiles:");
    for p in &profiles {
        text.push_str(&format!("\n - {} ({})", p.name, p.id));
    }
    Ok(ResultObject::success()
        .with(MESSAGE, text)
        .with("count", profiles.len()))
}

fn new_profile(args: &Arguments, ctx: &mut Launcher) -> Result<ResultObject> {
    let Some(name) = ctx.profile_name(args, "Please enter the name of the profile.")? else {
        return Ok(ResultObject::interrupted());
    };
    let suggested = suggest_id(&*ctx.store, &name)?;
    let id = match ctx.new_profile_id(args, "id", &suggested, None)? {
        IdAnswer::Accepted(id) => id,
        IdAnswer::Rejected(problem) => return failed(problem),
        IdAnswer::Interrupted => return Ok(ResultObject::interrupted()),
    };

    match profile::create(&mut *ctx.store, &id, &name) {
        Ok(_) => Ok(ResultObject::success()
            .with(MESSAGE, format!("Successfully created profile '{id}'."))
            .with("profile_id", id)),
        Err(e) => {
            log::warn!("creating profile {id} failed: {e}");
            failed(format!("Failed to create profile: {e}"))
        },
    }
}

fn run_profile(args: &Arguments, ctx: &mut Launcher) -> Result<ResultObject> {
    let id = ctx.profile_id(args)?;
    if validate_identifier(&id).is_err() || !ctx.store.exists(&id)? {
        return failed(format!("Failed to load: profile not found: {id}."));
    }
    let loaded = match profile::load(&*ctx.store, &id) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("loading profile {id} failed: {e}");
            return failed(format!("Failed to load: profile has invalid data ({e})."));
        },
    };

    session::play(loaded, &mut *ctx.store, &mut *ctx.prompt, &ctx.settings)?;
    Ok(ResultObject::success().with("profile_id", id))
}

fn remove_profile(args: &Arguments, ctx: &mut Launcher) -> Result<ResultObject> {
    let id = ctx.profile_id(args)?;
    if validate_identifier(&id).is_err() || !ctx.store.exists(&id)? {
        return failed(format!("Failed to remove: profile not found: {id}."));
    }

    let confirmed = match args.boolean("confirm") {
        Some(confirmed) => confirmed,
        None => {
            ctx.prompt
                .say(&format!("Are you sure you want to delete profile '{id}'?"));
            ctx.prompt.say(
                "This profile will be deleted immediately. You can't undo this action. (y/N)",
            );
            match prompt::ask_yes_no(&mut *ctx.prompt)? {
                Some(answer) => answer,
                None => return Ok(ResultObject::interrupted()),
            }
        },
    };
    if !confirmed {
        return failed("Canceled.");
    }

    profile::remove(&mut *ctx.store, &id)?;
    Ok(ResultObject::success()
        .with(MESSAGE, format!("Deleted profile '{id}'!"))
        .with("profile_id", id))
}

fn rename_profile(args: &Arguments, ctx: &mut Launcher) -> Result<ResultObject> {
    let old_id = ctx.profile_id(args)?;
    if validate_identifier(&old_id).is_err() || !ctx.store.exists(&old_id)? {
        return failed(format!("Failed to rename: profile not found: {old_id}."));
    }
    let old = match profile::load(&*ctx.store, &old_id) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("loading profile {old_id} failed: {e}");
            return failed(format!("Failed to rename: profile has invalid data ({e})."));
        },
    };

    ctx.prompt
        .say(&format!("Original profile name: '{}'", old.name));
    ctx.prompt.say(&format!("Original profile ID: '{old_id}'"));
    let Some(new_name) = ctx.profile_name(args, "Please enter the new name for this profile.")?
    else {
        return Ok(ResultObject::interrupted());
    };
    let suggested = suggest_id(&*ctx.store, &new_name)?;
    let new_id = match ctx.new_profile_id(args, "new_id", &suggested, Some(&old_id))? {
        IdAnswer::Accepted(id) => id,
        IdAnswer::Rejected(problem) => return failed(problem),
        IdAnswer::Interrupted => return Ok(ResultObject::interrupted()),
    };

    match profile::rename(&mut *ctx.store, &old_id, &new_id, &new_name) {
        Ok(_) => Ok(ResultObject::success()
            .with(
                MESSAGE,
                format!(
                    "Renamed profile '{}' ({old_id}) to '{new_name}' ({new_id}).",
                    old.name
                ),
            )
            .with("profile_id", new_id)),
        Err(e) => {
            log::warn!("renaming profile {old_id} to {new_id} failed: {e}");
            failed(format!("Failed to rename profile: {e}"))
        },
    }
}
